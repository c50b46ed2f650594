//! Locale lifecycle: load, apply, switch, notify.
//!
//! # Design
//! - `Uninitialized → Loading → Ready`, then `Ready → Ready` on every switch.
//! - A failed load still reaches `Ready`; the page keeps its authored text.
//! - Listeners run synchronously, in registration order, after a switch commits.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::dom::{Document, DomApplier, classes, update_document_direction};
use crate::error::{LoadError, LocaleError};
use crate::i18n::{LocaleCode, TranslationSource, TranslationStore};
use crate::preferences::{PreferenceStore, load_locale};
use crate::schedule::{DeferredTask, Scheduler};

/// Lifecycle state of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// Constructed; nothing fetched yet.
    Uninitialized,
    /// Translation fetch in flight.
    Loading,
    /// Dictionary applied (or load failed); switches accepted.
    Ready,
}

/// Result of a language switch request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocaleSwitch {
    /// Requested locale was already current; nothing happened.
    Unchanged,
    /// Locale changed and listeners were notified.
    Switched {
        /// Previous locale.
        from: LocaleCode,
        /// New locale.
        to: LocaleCode,
    },
}

/// Notification delivered to listeners after a switch.
#[derive(Debug)]
pub struct LocaleChanged<'a> {
    /// Newly selected locale.
    pub locale: LocaleCode,
    /// Store positioned on the new locale.
    pub store: &'a TranslationStore,
}

/// Callback invoked after each committed switch.
pub type Listener<D> = Box<dyn FnMut(&LocaleChanged<'_>, &mut D)>;

/// Orchestrates the translation store, DOM applier and preference slot.
pub struct LocaleController<D: Document> {
    state: LoadState,
    store: TranslationStore,
    applier: DomApplier<D::Node>,
    preferences: Box<dyn PreferenceStore>,
    listeners: Vec<Listener<D>>,
    overlay_grace: Duration,
}

impl<D: Document> LocaleController<D> {
    /// Read the stored preference (falling back to `default_locale`) and wait
    /// in `Uninitialized`.
    #[must_use]
    pub fn new(
        preferences: Box<dyn PreferenceStore>,
        default_locale: LocaleCode,
        overlay_grace: Duration,
    ) -> Self {
        let locale = load_locale(preferences.as_ref(), default_locale);
        Self {
            state: LoadState::Uninitialized,
            store: TranslationStore::new(locale),
            applier: DomApplier::new(),
            preferences,
            listeners: Vec::new(),
            overlay_grace,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    /// Current locale.
    #[must_use]
    pub const fn locale(&self) -> LocaleCode {
        self.store.locale()
    }

    /// Underlying translation store.
    #[must_use]
    pub const fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// Registration list, for surfaces added programmatically.
    pub fn applier_mut(&mut self) -> &mut DomApplier<D::Node> {
        &mut self.applier
    }

    /// Preference slot.
    #[must_use]
    pub fn preferences(&self) -> &dyn PreferenceStore {
        self.preferences.as_ref()
    }

    /// Register a listener for committed switches.
    pub fn subscribe(&mut self, listener: impl FnMut(&LocaleChanged<'_>, &mut D) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Move to `Loading`. Returns `false` if initialization already started.
    pub fn begin_loading(&mut self) -> bool {
        if self.state != LoadState::Uninitialized {
            return false;
        }
        self.state = LoadState::Loading;
        true
    }

    /// Finish initialization with the fetched bytes (or the fetch failure):
    /// register tagged surfaces, apply, set direction, mark language buttons,
    /// become `Ready` and schedule the overlay removal.
    pub fn finish_loading(
        &mut self,
        fetched: Result<Vec<u8>, LoadError>,
        doc: &mut D,
        scheduler: &mut dyn Scheduler,
    ) {
        if self.state == LoadState::Ready {
            warn!("locale controller already initialized");
            return;
        }
        match fetched {
            Ok(bytes) => {
                if let Err(err) = self.store.load_bytes(&bytes) {
                    debug!(error = %err, "translations rejected; keeping authored text");
                }
            }
            Err(err) => warn!(error = %err, "translations unavailable; keeping authored text"),
        }
        self.applier.register_tagged(doc);
        self.mark_buttons(doc);
        self.apply(doc);
        self.state = LoadState::Ready;
        scheduler.schedule(self.overlay_grace, DeferredTask::HideLoadingOverlay);
        info!(locale = self.locale().code(), "locale controller ready");
    }

    /// Fetch from `source` and run the whole startup sequence.
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

    /// Switch to `locale`: persist it, mark buttons, re-apply translations and
    /// direction, then notify listeners. Switching to the current locale is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::NotReady`] before initialization completes.
    pub fn change_language(
        &mut self,
        locale: LocaleCode,
        doc: &mut D,
    ) -> Result<LocaleSwitch, LocaleError> {
        if self.state != LoadState::Ready {
            return Err(LocaleError::NotReady {
                operation: "change_language",
            });
        }
        let from = self.store.locale();
        if !self.store.set_locale(locale, self.preferences.as_mut()) {
            return Ok(LocaleSwitch::Unchanged);
        }
        self.mark_buttons(doc);
        self.apply(doc);

        let event = LocaleChanged {
            locale,
            store: &self.store,
        };
        for listener in &mut self.listeners {
            listener(&event, &mut *doc);
        }
        info!(from = from.code(), to = locale.code(), "language changed");
        Ok(LocaleSwitch::Switched { from, to: locale })
    }

    /// Resolve `key` for programmatic use with `{{name}}` substitution.
    #[must_use]
    pub fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.store.translate(key, params)
    }

    fn apply(&self, doc: &mut D) {
        let locale = self.store.locale();
        self.applier.apply_all(&self.store, locale, doc);
        update_document_direction(doc, locale);
    }

    fn mark_buttons(&self, doc: &mut D) {
        let current = self.store.locale();
        for locale in LocaleCode::all() {
            if let Some(button) = doc.element_by_id(locale.button_id()) {
                doc.set_class(&button, classes::ACTIVE, locale == current);
            }
        }
    }
}
