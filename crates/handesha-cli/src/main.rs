//! `handesha` binary entrypoint.

#[tokio::main]
async fn main() {
    let code = handesha_cli::run().await;
    std::process::exit(code);
}
