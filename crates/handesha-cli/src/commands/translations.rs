use anyhow::anyhow;
use handesha_site::i18n::{CoverageReport, coverage_report};
use handesha_site::{DEFAULT_LOCALE, LoadError, TranslationStore};

use crate::cli::{CheckTranslationsArgs, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output::render_coverage;

pub(crate) async fn handle_check_translations(
    args: &CheckTranslationsArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let bytes = tokio::fs::read(&args.file)
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to read {}: {err}", args.file.display())))?;
    let report = check_document(&bytes)?;
    render_coverage(&report, format)?;

    if report.is_complete() {
        Ok(())
    } else {
        let gaps: usize = report.locales.iter().map(|locale| locale.missing.len()).sum();
        Err(CliError::validation(format!(
            "{gaps} translation key(s) missing across locales"
        )))
    }
}

/// Load `bytes` the way the page does, then report key parity.
pub(crate) fn check_document(bytes: &[u8]) -> CliResult<CoverageReport> {
    let mut store = TranslationStore::new(DEFAULT_LOCALE);
    store.load_bytes(bytes).map_err(|err| {
        let detail = match &err {
            LoadError::Parse { source } => source.to_string(),
            LoadError::Shape { found } => format!("top level is {found}"),
            LoadError::Fetch { location, detail } => format!("{location}: {detail}"),
        };
        CliError::validation(format!("{err}: {detail}"))
    })?;
    let tree = store
        .tree()
        .ok_or_else(|| CliError::failure(anyhow!("translation document was not retained")))?;
    Ok(coverage_report(tree))
}
