//! Single owner of the runtime state for one page.
//!
//! # Design
//! - [`Site`] is created once at startup and mutated only through its methods;
//!   hosts forward page events to it.
//! - Locale-dependent derived text (activity counter, membership button) is
//!   refreshed by observers registered on the locale controller.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::activity::refresh_active_period;
use crate::content::ContentBridge;
use crate::dom::Document;
use crate::error::{ConfigError, LoadError, LocaleError};
use crate::i18n::{LocaleCode, TranslationSource};
use crate::locale::{LocaleController, LocaleSwitch};
use crate::membership::{MembershipGate, MembershipOutcome, dismiss_notice, refresh_member_button};
use crate::page;
use crate::preferences::PreferenceStore;
use crate::schedule::Scheduler;
use crate::settings::SiteSettings;

/// Source of the current local time.
pub trait Clock {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Current local date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock in the host's local timezone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to an adjustable instant.
#[derive(Debug)]
pub struct FixedClock(Cell<NaiveDateTime>);

impl FixedClock {
    /// Clock reading `at`.
    #[must_use]
    pub const fn new(at: NaiveDateTime) -> Self {
        Self(Cell::new(at))
    }

    /// Move the clock to `at`.
    pub fn set(&self, at: NaiveDateTime) {
        self.0.set(at);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0.get()
    }
}

/// Runtime state for one page.
pub struct Site<D: Document> {
    settings: SiteSettings,
    controller: LocaleController<D>,
    bridge: ContentBridge,
    gate: MembershipGate,
    clock: Rc<dyn Clock>,
}

impl<D: Document + 'static> Site<D> {
    /// Wire the controller, observers and membership gate.
    #[must_use]
    pub fn new(settings: SiteSettings, preferences: Box<dyn PreferenceStore>, clock: Rc<dyn Clock>) -> Self {
        let mut controller = LocaleController::new(
            preferences,
            settings.default_locale,
            settings.timings.overlay_grace(),
        );

        let epoch = settings.active_since;
        let activity_clock = Rc::clone(&clock);
        controller.subscribe(move |event, doc: &mut D| {
            refresh_active_period(doc, epoch, activity_clock.today(), event.locale);
        });
        controller.subscribe(|event, doc: &mut D| refresh_member_button(doc, event.store));

        let gate = MembershipGate::new(settings.membership.clone(), settings.timings);
        Self {
            settings,
            controller,
            bridge: ContentBridge::default(),
            gate,
            clock,
        }
    }

    /// Replace the content bridge (to attach a host channel).
    #[must_use]
    pub fn with_content_bridge(mut self, bridge: ContentBridge) -> Self {
        self.bridge = bridge;
        self
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    /// Locale controller.
    #[must_use]
    pub const fn controller(&self) -> &LocaleController<D> {
        &self.controller
    }

    /// Locale controller, for registering extra surfaces or observers.
    pub fn controller_mut(&mut self) -> &mut LocaleController<D> {
        &mut self.controller
    }

    /// Content bridge.
    #[must_use]
    pub const fn bridge(&self) -> &ContentBridge {
        &self.bridge
    }

    /// Content bridge, for capability setters.
    pub fn bridge_mut(&mut self) -> &mut ContentBridge {
        &mut self.bridge
    }

    /// Current locale.
    #[must_use]
    pub const fn locale(&self) -> LocaleCode {
        self.controller.locale()
    }

    /// First half of startup; see [`LocaleController::begin_loading`].
    pub fn begin_loading(&mut self) -> bool {
        self.controller.begin_loading()
    }

    /// Second half of startup: apply translations, then fill the activity
    /// counter and membership label.
    pub fn finish_loading(
        &mut self,
        fetched: Result<Vec<u8>, LoadError>,
        doc: &mut D,
        scheduler: &mut dyn Scheduler,
    ) {
        self.controller.finish_loading(fetched, doc, scheduler);
        self.refresh_derived(doc);
    }

    /// Fetch translations from `source` and run the full startup sequence.
    pub async fn initialize(
        &mut self,
        source: &dyn TranslationSource,
        doc: &mut D,
        scheduler: &mut dyn Scheduler,
    ) {
        if !self.begin_loading() {
            return;
        }
        let fetched = source.fetch().await;
        self.finish_loading(fetched, doc, scheduler);
    }

    /// Switch language; observers refresh derived text.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::NotReady`] before startup completes.
    pub fn change_language(&mut self, locale: LocaleCode, doc: &mut D) -> Result<LocaleSwitch, LocaleError> {
        self.controller.change_language(locale, doc)
    }

    /// Resolve `key` with `{{name}}` substitution.
    #[must_use]
    pub fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.controller.translate(key, params)
    }

    /// Membership button clicked.
    pub fn on_member_click(&self, doc: &mut D, scheduler: &mut dyn Scheduler) -> MembershipOutcome {
        self.gate
            .on_click(self.clock.now(), self.controller.store(), doc, scheduler)
    }

    /// Notice dismiss button clicked.
    pub fn on_notice_dismiss(&self, doc: &mut D) {
        dismiss_notice(doc);
    }

    /// Mobile menu button clicked.
    pub fn on_menu_toggle(&self, doc: &mut D) {
        page::toggle_mobile_menu(doc);
    }

    /// A link inside the mobile menu was followed.
    pub fn on_menu_link(&self, doc: &mut D) {
        page::close_mobile_menu(doc);
    }

    /// Contact form submitted.
    pub fn on_contact_submit(&self, doc: &mut D, scheduler: &mut dyn Scheduler) {
        page::on_contact_submit(doc, scheduler, self.settings.timings.form_success());
    }

    /// Window scrolled (also called once at startup).
    pub fn on_scroll(&self, doc: &mut D, scroll_y: f64, viewport_height: f64) {
        page::update_navbar_shadow(doc, scroll_y);
        page::reveal_sections(doc, viewport_height);
    }

    /// Host delivered a new content config.
    pub fn on_config_change(&mut self, payload: &Value, doc: &mut D) -> Vec<ConfigError> {
        self.bridge.on_config_change(payload, doc)
    }

    fn refresh_derived(&self, doc: &mut D) {
        refresh_active_period(
            doc,
            self.settings.active_since,
            self.clock.today(),
            self.controller.locale(),
        );
        refresh_member_button(doc, self.controller.store());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, ids};
    use crate::i18n::BUNDLED_TRANSLATIONS;
    use crate::preferences::MemoryPreferences;
    use crate::schedule::ManualScheduler;

    fn clock(at: &str) -> Rc<FixedClock> {
        Rc::new(FixedClock::new(at.parse().expect("valid datetime")))
    }

    #[test]
    fn startup_fills_counter_and_switch_refreshes_it() {
        let mut doc = MemoryDocument::new();
        let body = doc.body_node();
        doc.element_with_id(body, "span", ids::ACTIVE_NUMBER);
        let text = doc.element_with_id(body, "span", ids::ACTIVE_TEXT);
        let mut scheduler = ManualScheduler::new();
        let mut site: Site<MemoryDocument> = Site::new(
            SiteSettings::default(),
            Box::new(MemoryPreferences::default()),
            clock("2025-10-15T10:00:00"),
        );

        assert!(site.begin_loading());
        site.finish_loading(Ok(BUNDLED_TRANSLATIONS.as_bytes().to_vec()), &mut doc, &mut scheduler);
        assert_eq!(doc.text(&text), "months Active");

        site.change_language(LocaleCode::Ar, &mut doc).expect("ready");
        assert_eq!(doc.text(&text), "أشهر نشطة");
    }

    #[test]
    fn member_click_uses_the_clock() {
        let mut doc = MemoryDocument::new();
        let mut scheduler = ManualScheduler::new();
        let fixed = clock("2026-09-30T00:00:00");
        let site: Site<MemoryDocument> = Site::new(
            SiteSettings::default(),
            Box::new(MemoryPreferences::default()),
            Rc::clone(&fixed) as Rc<dyn Clock>,
        );
        assert!(matches!(
            site.on_member_click(&mut doc, &mut scheduler),
            MembershipOutcome::Redirect(_)
        ));
        fixed.set("2026-09-30T00:00:01".parse().expect("valid datetime"));
        assert_eq!(
            site.on_member_click(&mut doc, &mut scheduler),
            MembershipOutcome::Closed
        );
    }
}
