use chrono::Local;
use handesha_site::SiteSettings;
use handesha_site::activity::{ActiveDisplay, months_active_since};
use serde::Serialize;

use crate::cli::{ActiveArgs, OutputFormat};
use crate::error::CliResult;
use crate::output::render_active;

/// Counter as the about section would show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ActiveSummary {
    pub(crate) since: String,
    pub(crate) today: String,
    pub(crate) locale: &'static str,
    pub(crate) years: u32,
    pub(crate) months: u32,
    pub(crate) number: u32,
    pub(crate) label: &'static str,
    pub(crate) key: &'static str,
}

pub(crate) fn handle_active(
    settings: &SiteSettings,
    args: &ActiveArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let summary = summarize(settings, args);
    render_active(&summary, format)
}

pub(crate) fn summarize(settings: &SiteSettings, args: &ActiveArgs) -> ActiveSummary {
    let since = args.since.unwrap_or(settings.active_since);
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let locale = args.locale.unwrap_or(settings.default_locale);
    let period = months_active_since(since, today);
    let display = ActiveDisplay::for_period(period, locale);
    ActiveSummary {
        since: since.to_string(),
        today: today.to_string(),
        locale: locale.code(),
        years: period.years,
        months: period.months,
        number: display.number,
        label: display.label,
        key: display.key,
    }
}
