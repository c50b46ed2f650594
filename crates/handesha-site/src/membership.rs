//! Membership call-to-action gated by the registration window.
//!
//! # Design
//! - The window check is a pure predicate; the page effects (redirect or
//!   notice) are decided by [`MembershipGate::on_click`].
//! - The closed notice is a single element reused across clicks; it fades
//!   after the configured lifetime and is removed once the fade completes.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::dom::{Document, ids};
use crate::i18n::{LocaleCode, TranslationStore};
use crate::schedule::{DeferredTask, Scheduler};
use crate::settings::{MembershipSettings, Timings};

/// Id of the closed-registration notice.
pub const NOTICE_ID: &str = "membership-message";
/// Id of the notice's dismiss button.
pub const NOTICE_DISMISS_ID: &str = "membership-message-close";

const NOTICE_CLASSES: &str = "fixed top-4 right-4 bg-red-500 text-white px-6 py-4 rounded-xl shadow-xl z-[9999] transform transition-all duration-500 animate-slide-in";
const MEMBER_BUTTON_KEY: &str = "contact.social.memberButton";

/// Whether `now` falls inside `[start, end]`.
#[must_use]
pub fn is_registration_open<T: Ord>(now: &T, start: &T, end: &T) -> bool {
    start <= now && now <= end
}

/// What a click on the membership button resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MembershipOutcome {
    /// Registration is open; the host should open this URL in a new tab.
    Redirect(String),
    /// Registration is closed; the notice was shown.
    Closed,
}

/// Title and body of the closed notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoticeText {
    /// Bold heading.
    pub title: String,
    /// Explanation.
    pub message: String,
}

impl NoticeText {
    /// Text from `footer.membership` in the current locale, or the built-in
    /// pair when either string is missing.
    #[must_use]
    pub fn for_locale(store: &TranslationStore, locale: LocaleCode) -> Self {
        match (
            store.resolve(locale, "footer.membership.title"),
            store.resolve(locale, "footer.membership.message"),
        ) {
            (Some(title), Some(message)) => Self {
                title: title.to_string(),
                message: message.to_string(),
            },
            _ => Self::fallback(locale),
        }
    }

    /// Built-in text used when the dictionary lacks the notice.
    #[must_use]
    pub fn fallback(locale: LocaleCode) -> Self {
        let (title, message) = match locale {
            LocaleCode::Ar => (
                "التسجيل مغلق",
                "التسجيل لعضوية النادي غير متاح حالياً. يرجى المتابعة معنا على وسائل التواصل لمعرفة مواعيد فتح باب العضوية.",
            ),
            LocaleCode::En => (
                "Membership Closed",
                "Membership registration is not open at this time. Please follow us on social media for updates on when membership opens.",
            ),
        };
        Self {
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

/// Decides what a membership button click does.
#[derive(Clone, Debug)]
pub struct MembershipGate {
    window: MembershipSettings,
    timings: Timings,
}

impl MembershipGate {
    /// Gate over the configured window.
    #[must_use]
    pub const fn new(window: MembershipSettings, timings: Timings) -> Self {
        Self { window, timings }
    }

    /// Whether registration is open at `now`.
    #[must_use]
    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        is_registration_open(&now, &self.window.opens_at, &self.window.closes_at)
    }

    /// Handle a click at `now`: redirect while open, otherwise show the notice.
    pub fn on_click<D: Document>(
        &self,
        now: NaiveDateTime,
        store: &TranslationStore,
        doc: &mut D,
        scheduler: &mut dyn Scheduler,
    ) -> MembershipOutcome {
        if self.is_open(now) {
            info!(url = %self.window.form_url, "membership open; redirecting");
            return MembershipOutcome::Redirect(self.window.form_url.clone());
        }
        let text = NoticeText::for_locale(store, store.locale());
        show_closed_notice(doc, &text);
        scheduler.schedule(
            self.timings.notice_ttl(),
            DeferredTask::FadeNotice {
                remove_after: self.timings.notice_fade(),
            },
        );
        MembershipOutcome::Closed
    }
}

/// Create the notice (or reuse the existing one) and fill it with `text`.
pub fn show_closed_notice<D: Document>(doc: &mut D, text: &NoticeText) -> Option<D::Node> {
    let notice = match doc.element_by_id(NOTICE_ID) {
        Some(existing) => {
            doc.clear_children(&existing);
            existing
        }
        None => {
            let body = doc.body()?;
            let created = doc.create_element(&body, "div")?;
            doc.set_attribute(&created, "id", NOTICE_ID);
            doc.set_attribute(&created, "class", NOTICE_CLASSES);
            doc.set_style(&created, "max-width", "300px");
            created
        }
    };
    doc.set_style(&notice, "opacity", "1");
    doc.set_style(&notice, "transform", "none");

    let title = doc.create_element(&notice, "p")?;
    doc.set_attribute(&title, "class", "font-bold mb-1");
    doc.set_text(&title, &text.title);
    let message = doc.create_element(&notice, "p")?;
    doc.set_attribute(&message, "class", "text-sm opacity-90");
    doc.set_text(&message, &text.message);
    let dismiss = doc.create_element(&notice, "button")?;
    doc.set_attribute(&dismiss, "id", NOTICE_DISMISS_ID);
    doc.set_attribute(&dismiss, "class", "text-white/80 hover:text-white");
    doc.set_attribute(&dismiss, "aria-label", "Dismiss");
    Some(notice)
}

/// Remove the notice immediately. Returns whether one was present.
pub fn dismiss_notice<D: Document>(doc: &mut D) -> bool {
    match doc.element_by_id(NOTICE_ID) {
        Some(notice) => {
            doc.remove(&notice);
            true
        }
        None => false,
    }
}

/// Rewrite the membership button label for the current locale. The authored
/// label stays when the dictionary lacks the key.
pub fn refresh_member_button<D: Document>(doc: &mut D, store: &TranslationStore) {
    let Some(button) = doc.element_by_id(ids::MEMBER_BTN) else {
        debug!("membership button missing");
        return;
    };
    let Some(span) = doc.descendants_by_tag(&button, "span").into_iter().next() else {
        debug!("membership button has no label span");
        return;
    };
    match store.resolve(store.locale(), MEMBER_BUTTON_KEY) {
        Some(label) => doc.set_text(&span, label),
        None => debug!("membership button label unresolved; keeping authored text"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use crate::schedule::ManualScheduler;
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    fn gate() -> MembershipGate {
        MembershipGate::new(MembershipSettings::default(), Timings::default())
    }

    fn at(text: &str) -> NaiveDateTime {
        text.parse().expect("valid datetime")
    }

    #[test]
    fn window_is_inclusive_at_both_ends() {
        let settings = MembershipSettings::default();
        let (start, end) = (settings.opens_at, settings.closes_at);
        let tick = ChronoDuration::seconds(1);
        assert!(is_registration_open(&start, &start, &end));
        assert!(is_registration_open(&end, &start, &end));
        assert!(!is_registration_open(&(start - tick), &start, &end));
        assert!(!is_registration_open(&(end + tick), &start, &end));
        assert!(is_registration_open(&5, &1, &9));
    }

    #[test]
    fn open_window_redirects_without_touching_the_page() {
        let mut doc = MemoryDocument::new();
        let mut scheduler = ManualScheduler::new();
        let store = TranslationStore::bundled(LocaleCode::En).expect("bundled");
        let outcome = gate().on_click(at("2026-09-25T12:00:00"), &store, &mut doc, &mut scheduler);
        assert!(matches!(outcome, MembershipOutcome::Redirect(url) if url.contains("docs.google.com")));
        assert_eq!(doc.writes(), 0);
        assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn repeated_closed_clicks_keep_one_notice() {
        let mut doc = MemoryDocument::new();
        let mut scheduler = ManualScheduler::new();
        let store = TranslationStore::bundled(LocaleCode::En).expect("bundled");
        let gate = gate();
        let now = at("2026-01-01T09:00:00");
        assert_eq!(gate.on_click(now, &store, &mut doc, &mut scheduler), MembershipOutcome::Closed);
        assert_eq!(gate.on_click(now, &store, &mut doc, &mut scheduler), MembershipOutcome::Closed);
        assert_eq!(doc.count_with_id(NOTICE_ID), 1);
        let notice = doc.element_by_id(NOTICE_ID).expect("notice");
        assert_eq!(doc.descendants_by_tag(&notice, "p").len(), 2);

        scheduler.advance(Duration::from_millis(8_500), &mut doc);
        assert_eq!(doc.count_with_id(NOTICE_ID), 0);
    }

    #[test]
    fn notice_text_falls_back_when_dictionary_lacks_it() {
        let empty = TranslationStore::new(LocaleCode::Ar);
        assert_eq!(NoticeText::for_locale(&empty, LocaleCode::Ar).title, "التسجيل مغلق");
        let store = TranslationStore::bundled(LocaleCode::En).expect("bundled");
        let text = NoticeText::for_locale(&store, LocaleCode::En);
        assert_eq!(
            Some(text.title.as_str()),
            store.resolve(LocaleCode::En, "footer.membership.title")
        );
    }

    #[test]
    fn reshown_notice_is_fully_visible_again() {
        let mut doc = MemoryDocument::new();
        let text = NoticeText::fallback(LocaleCode::En);
        let notice = show_closed_notice(&mut doc, &text).expect("body present");
        doc.set_style(&notice, "opacity", "0");
        show_closed_notice(&mut doc, &text);
        assert_eq!(doc.style(notice, "opacity"), Some("1"));
        assert!(dismiss_notice(&mut doc));
        assert!(!dismiss_notice(&mut doc));
    }

    #[test]
    fn member_button_label_follows_locale() {
        let mut doc = MemoryDocument::new();
        let body = doc.body_node();
        let button = doc.element_with_id(body, "button", ids::MEMBER_BTN);
        let span = doc.element(button, "span");
        let mut store = TranslationStore::bundled(LocaleCode::Ar).expect("bundled");
        refresh_member_button(&mut doc, &store);
        assert_eq!(
            Some(doc.text(&span).as_str()),
            store.resolve(LocaleCode::Ar, MEMBER_BUTTON_KEY)
        );
        let mut prefs = crate::preferences::MemoryPreferences::default();
        store.set_locale(LocaleCode::En, &mut prefs);
        refresh_member_button(&mut doc, &store);
        assert_eq!(
            Some(doc.text(&span).as_str()),
            store.resolve(LocaleCode::En, MEMBER_BUTTON_KEY)
        );
    }

    #[test]
    fn member_button_keeps_authored_label_without_dictionary() {
        let mut doc = MemoryDocument::new();
        let body = doc.body_node();
        let button = doc.element_with_id(body, "button", ids::MEMBER_BTN);
        let span = doc.element(button, "span");
        doc.seed_text(span, "Become a Member");
        refresh_member_button(&mut doc, &TranslationStore::new(LocaleCode::En));
        assert_eq!(doc.text(&span), "Become a Member");
        assert_eq!(doc.writes(), 0);
    }
}
