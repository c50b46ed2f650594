use chrono::{Local, NaiveDateTime};
use handesha_site::SiteSettings;
use handesha_site::membership::MembershipGate;
use serde::Serialize;

use crate::cli::{MembershipArgs, OutputFormat};
use crate::error::CliResult;
use crate::output::render_membership;

/// Registration window evaluated at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct MembershipStatus {
    pub(crate) at: NaiveDateTime,
    pub(crate) open: bool,
    pub(crate) opens_at: NaiveDateTime,
    pub(crate) closes_at: NaiveDateTime,
    pub(crate) form_url: String,
}

pub(crate) fn handle_membership(
    settings: &SiteSettings,
    args: &MembershipArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let at = args.at.unwrap_or_else(|| Local::now().naive_local());
    render_membership(&evaluate(settings, at), format)
}

pub(crate) fn evaluate(settings: &SiteSettings, at: NaiveDateTime) -> MembershipStatus {
    let gate = MembershipGate::new(settings.membership.clone(), settings.timings);
    MembershipStatus {
        at,
        open: gate.is_open(at),
        opens_at: settings.membership.opens_at,
        closes_at: settings.membership.closes_at,
        form_url: settings.membership.form_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> NaiveDateTime {
        text.parse().expect("valid datetime")
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let settings = SiteSettings::default();
        assert!(evaluate(&settings, settings.membership.opens_at).open);
        assert!(evaluate(&settings, settings.membership.closes_at).open);
        assert!(!evaluate(&settings, at("2026-10-01T00:00:00")).open);
    }

    #[test]
    fn custom_window_is_honoured() {
        let raw = r#"{"membership": {"opens_at": "2027-01-01T00:00:00", "closes_at": "2027-01-31T23:59:59", "form_url": "https://example.org/join"}}"#;
        let settings = SiteSettings::from_json(raw).expect("settings");
        let status = evaluate(&settings, at("2027-01-15T08:30:00"));
        assert!(status.open);
        assert_eq!(status.form_url, "https://example.org/join");
        let args = MembershipArgs {
            at: Some(at("2027-02-01T00:00:00")),
        };
        assert!(handle_membership(&settings, &args, OutputFormat::Json).is_ok());
    }
}
