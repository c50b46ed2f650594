//! "Active since" counter shown in the about section.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::dom::{Document, I18N_ATTR, ids};
use crate::i18n::LocaleCode;

/// Whole calendar time elapsed since the club started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivePeriod {
    /// Whole years.
    pub years: u32,
    /// Months past the last whole year.
    pub months: u32,
}

impl ActivePeriod {
    /// Total whole months.
    #[must_use]
    pub const fn total_months(self) -> u32 {
        self.years * 12 + self.months
    }
}

/// Whole calendar months between `epoch` and `now`, less one when `now`'s day
/// of month precedes `epoch`'s. Clamped at zero when `now` is before `epoch`.
#[must_use]
pub fn months_active_since(epoch: NaiveDate, now: NaiveDate) -> ActivePeriod {
    let mut months = (i64::from(now.year()) - i64::from(epoch.year())) * 12
        + i64::from(now.month0())
        - i64::from(epoch.month0());
    if now.day() < epoch.day() {
        months -= 1;
    }
    let total = u32::try_from(months).unwrap_or(0);
    ActivePeriod {
        years: total / 12,
        months: total % 12,
    }
}

/// Text written into the counter elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveDisplay {
    /// Value for `active-number`.
    pub number: u32,
    /// Value for `active-text`.
    pub label: &'static str,
    /// Translation key recorded on `active-text`.
    pub key: &'static str,
}

impl ActiveDisplay {
    /// Months below one year (shown as at least 1), whole years otherwise.
    #[must_use]
    pub fn for_period(period: ActivePeriod, locale: LocaleCode) -> Self {
        if period.years < 1 {
            let number = period.months.max(1);
            let label = match (locale, number == 1) {
                (LocaleCode::Ar, true) => "شهر نشط",
                (LocaleCode::Ar, false) => "أشهر نشطة",
                (LocaleCode::En, true) => "month Active",
                (LocaleCode::En, false) => "months Active",
            };
            Self {
                number,
                label,
                key: "about.stats.months",
            }
        } else {
            let number = period.years;
            let label = match (locale, number == 1) {
                (LocaleCode::Ar, true) => "سنة نشط",
                (LocaleCode::Ar, false) => "سنوات نشطة",
                (LocaleCode::En, true) => "year Active",
                (LocaleCode::En, false) => "years Active",
            };
            Self {
                number,
                label,
                key: "about.stats.years",
            }
        }
    }
}

/// Write the counter for `today`. Skipped when either element is missing.
/// Returns what was written.
pub fn refresh_active_period<D: Document>(
    doc: &mut D,
    epoch: NaiveDate,
    today: NaiveDate,
    locale: LocaleCode,
) -> Option<ActiveDisplay> {
    let (Some(number), Some(text)) = (
        doc.element_by_id(ids::ACTIVE_NUMBER),
        doc.element_by_id(ids::ACTIVE_TEXT),
    ) else {
        debug!("active period elements not found");
        return None;
    };
    let period = months_active_since(epoch, today);
    let display = ActiveDisplay::for_period(period, locale);
    doc.set_text(&number, &display.number.to_string());
    doc.set_text(&text, display.label);
    doc.set_attribute(&text, I18N_ATTR, display.key);
    debug!(
        years = period.years,
        months = period.months,
        "active period updated"
    );
    Some(display)
}
