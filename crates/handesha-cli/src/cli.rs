//! Argument parsing and command dispatch for the `handesha` CLI.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use handesha_site::{LocaleCode, SiteSettings};
use handesha_telemetry::{LogFormat, LoggingConfig, init_logging};

use crate::commands::active::handle_active;
use crate::commands::content::handle_content;
use crate::commands::membership::handle_membership;
use crate::commands::translations::handle_check_translations;
use crate::error::{CliError, CliResult};

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: cli.log_level.as_deref().unwrap_or(handesha_telemetry::DEFAULT_LOG_LEVEL),
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: logging unavailable: {err}");
    }

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let settings = load_settings(cli.settings.as_ref()).await?;
    tracing::debug!(command = command_label(&cli.command), "dispatching");

    match cli.command {
        Command::CheckTranslations(args) => handle_check_translations(&args, cli.output).await,
        Command::Active(args) => handle_active(&settings, &args, cli.output),
        Command::Membership(args) => handle_membership(&settings, &args, cli.output),
        Command::Content(args) => handle_content(&args, cli.output).await,
    }
}

pub(crate) async fn load_settings(path: Option<&PathBuf>) -> CliResult<SiteSettings> {
    let Some(path) = path else {
        return Ok(SiteSettings::default());
    };
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| CliError::failure(anyhow::anyhow!("failed to read {}: {err}", path.display())))?;
    SiteSettings::from_json(&raw).map_err(|err| {
        let detail = match &err {
            handesha_site::SettingsError::Parse { source } => source.to_string(),
            handesha_site::SettingsError::WindowOrder { opens_at, closes_at } => {
                format!("closes at {closes_at} before opening at {opens_at}")
            }
        };
        CliError::validation(format!("invalid settings in {}: {err} ({detail})", path.display()))
    })
}

#[derive(Parser)]
#[command(
    name = "handesha",
    about = "Maintenance tools for the Handesha Sah site content"
)]
pub(crate) struct Cli {
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "HANDESHA_SETTINGS",
        help = "Site settings JSON overriding the built-in defaults"
    )]
    pub(crate) settings: Option<PathBuf>,
    #[arg(long, global = true)]
    pub(crate) log_level: Option<String>,
    #[arg(long, global = true, value_parser = parse_log_format)]
    pub(crate) log_format: Option<LogFormat>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Report translation keys missing from any locale.
    CheckTranslations(CheckTranslationsArgs),
    /// Show the "active since" counter.
    Active(ActiveArgs),
    /// Show whether membership registration is open.
    Membership(MembershipArgs),
    /// Preview a content override document.
    Content(ContentArgs),
}

#[derive(Args, Debug, Clone)]
pub(crate) struct CheckTranslationsArgs {
    /// Translation document to check.
    pub(crate) file: PathBuf,
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ActiveArgs {
    /// Override the first active day (YYYY-MM-DD).
    #[arg(long)]
    pub(crate) since: Option<NaiveDate>,
    /// Day to compute the counter for; defaults to the local date.
    #[arg(long)]
    pub(crate) today: Option<NaiveDate>,
    /// Locale for the label.
    #[arg(long, value_parser = parse_locale)]
    pub(crate) locale: Option<LocaleCode>,
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct MembershipArgs {
    /// Instant to evaluate (YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD); defaults to now.
    #[arg(long, value_parser = parse_instant)]
    pub(crate) at: Option<NaiveDateTime>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ContentArgs {
    /// JSON object of content overrides, as the host would deliver it.
    pub(crate) file: PathBuf,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::CheckTranslations(_) => "check_translations",
        Command::Active(_) => "active",
        Command::Membership(_) => "membership",
        Command::Content(_) => "content",
    }
}

pub(crate) fn parse_locale(value: &str) -> Result<LocaleCode, String> {
    LocaleCode::from_lang_tag(value).ok_or_else(|| format!("unsupported locale '{value}' (use en or ar)"))
}

pub(crate) fn parse_instant(value: &str) -> Result<NaiveDateTime, String> {
    let trimmed = value.trim();
    if let Ok(instant) = trimmed.parse::<NaiveDateTime>() {
        return Ok(instant);
    }
    trimmed
        .parse::<NaiveDate>()
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid instant '{value}' (expected YYYY-MM-DDTHH:MM:SS)"))
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse::<LogFormat>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn locale_parser_accepts_language_tags() {
        assert_eq!(parse_locale("ar"), Ok(LocaleCode::Ar));
        assert_eq!(parse_locale("en-GB"), Ok(LocaleCode::En));
        assert!(parse_locale("fr").is_err());
    }

    #[test]
    fn instant_parser_accepts_dates_and_datetimes() {
        let midnight = parse_instant("2026-09-21").expect("date");
        assert_eq!(midnight.to_string(), "2026-09-21 00:00:00");
        let exact = parse_instant("2026-09-30T23:59:59").expect("datetime");
        assert_eq!(exact.to_string(), "2026-09-30 23:59:59");
        assert!(parse_instant("next tuesday").is_err());
    }

    #[test]
    fn cli_parses_global_output_after_subcommand() {
        let cli = Cli::try_parse_from(["handesha", "active", "--locale", "ar", "--format", "json"])
            .expect("parse");
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Command::Active(ActiveArgs {
                locale: Some(LocaleCode::Ar),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn settings_default_without_a_file() {
        let settings = load_settings(None).await.expect("defaults");
        assert_eq!(settings, SiteSettings::default());
    }

    #[tokio::test]
    async fn inverted_window_is_a_validation_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"membership": {{"opens_at": "2026-10-01T00:00:00", "closes_at": "2026-09-01T00:00:00"}}}}"#
        )
        .expect("write settings");
        let path = file.path().to_path_buf();
        let err = load_settings(Some(&path)).await.expect_err("inverted");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn missing_settings_file_is_a_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");
        let err = load_settings(Some(&path)).await.expect_err("missing");
        assert_eq!(err.exit_code(), 3);
    }
}
