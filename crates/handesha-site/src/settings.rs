//! Site settings with baked-in defaults.
//!
//! Every field is optional in the JSON form; omitted fields keep the values the
//! site ships with.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::i18n::{DEFAULT_LOCALE, LocaleCode};

/// Membership signup form opened while registration is open.
pub const DEFAULT_FORM_URL: &str = "https://docs.google.com/forms/d/e/1FAIpQLSev7pXZutFCqne3u9GGefEN26efqq_EMd3-RnRcOiucF7Cy_g/viewform";

/// Top-level settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Locale used when no preference is stored.
    pub default_locale: LocaleCode,
    /// Location of the translation document.
    pub translations_url: String,
    /// First day the club counts as active.
    pub active_since: NaiveDate,
    /// Membership registration window.
    pub membership: MembershipSettings,
    /// Timer delays.
    pub timings: Timings,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE,
            translations_url: "translations.json".to_string(),
            active_since: date(2025, 4, 1),
            membership: MembershipSettings::default(),
            timings: Timings::default(),
        }
    }
}

impl SiteSettings {
    /// Parse settings from JSON and validate them.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed JSON and
    /// [`SettingsError::WindowOrder`] when the window closes before it opens.
    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(raw).map_err(|source| SettingsError::Parse { source })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::WindowOrder`] for an inverted window.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.membership.closes_at < self.membership.opens_at {
            return Err(SettingsError::WindowOrder {
                opens_at: self.membership.opens_at.to_string(),
                closes_at: self.membership.closes_at.to_string(),
            });
        }
        Ok(())
    }
}

/// Membership registration window, inclusive at both ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipSettings {
    /// First instant registration is open.
    pub opens_at: NaiveDateTime,
    /// Last instant registration is open.
    pub closes_at: NaiveDateTime,
    /// External signup form.
    pub form_url: String,
}

impl Default for MembershipSettings {
    fn default() -> Self {
        Self {
            opens_at: midnight(2026, 9, 21),
            closes_at: midnight(2026, 9, 30),
            form_url: DEFAULT_FORM_URL.to_string(),
        }
    }
}

/// Delays, in milliseconds, for fire-and-forget timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Grace period before the loading overlay is hidden.
    pub overlay_grace_ms: u64,
    /// Lifetime of the membership-closed notice before it fades.
    pub notice_ttl_ms: u64,
    /// Fade-out duration before the notice is removed.
    pub notice_fade_ms: u64,
    /// How long the contact form success message stays visible.
    pub form_success_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            overlay_grace_ms: 500,
            notice_ttl_ms: 8_000,
            notice_fade_ms: 500,
            form_success_ms: 5_000,
        }
    }
}

impl Timings {
    /// Overlay grace delay.
    #[must_use]
    pub const fn overlay_grace(&self) -> Duration {
        Duration::from_millis(self.overlay_grace_ms)
    }

    /// Notice lifetime.
    #[must_use]
    pub const fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    /// Notice fade duration.
    #[must_use]
    pub const fn notice_fade(&self) -> Duration {
        Duration::from_millis(self.notice_fade_ms)
    }

    /// Contact success visibility.
    #[must_use]
    pub const fn form_success(&self) -> Duration {
        Duration::from_millis(self.form_success_ms)
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    date(year, month, day).and_time(chrono::NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_site() {
        let settings = SiteSettings::default();
        assert_eq!(settings.default_locale, LocaleCode::En);
        assert_eq!(settings.active_since.to_string(), "2025-04-01");
        assert_eq!(
            settings.membership.opens_at.to_string(),
            "2026-09-21 00:00:00"
        );
        assert_eq!(settings.timings.overlay_grace(), Duration::from_millis(500));
        assert_eq!(settings.timings.notice_ttl(), Duration::from_secs(8));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = SiteSettings::from_json(
            r#"{"default_locale": "ar", "membership": {"closes_at": "2026-10-01T12:00:00"}}"#,
        )
        .expect("valid settings");
        assert_eq!(settings.default_locale, LocaleCode::Ar);
        assert_eq!(settings.membership.form_url, DEFAULT_FORM_URL);
        assert_eq!(
            settings.membership.closes_at.to_string(),
            "2026-10-01 12:00:00"
        );
        assert_eq!(settings.timings, Timings::default());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = SiteSettings::from_json(
            r#"{"membership": {"opens_at": "2026-10-01T00:00:00", "closes_at": "2026-09-01T00:00:00"}}"#,
        )
        .expect_err("inverted window");
        assert!(matches!(err, SettingsError::WindowOrder { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            SiteSettings::from_json("{"),
            Err(SettingsError::Parse { .. })
        ));
    }
}
