#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
//! Handesha site wasm entry point and native stub fallback.

#[cfg(target_arch = "wasm32")]
fn main() -> Result<(), std::io::Error> {
    handesha_site::run_app();
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), std::io::Error> {
    use std::io::{self, Write};

    let mut stderr = io::stderr().lock();
    stderr.write_all(
        b"The handesha-site binary is intended for wasm32; build with `cargo build --target wasm32-unknown-unknown`. Use the `handesha` CLI to inspect content natively.\n",
    )?;
    Ok(())
}
