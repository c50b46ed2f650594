//! Durable key-value preferences.
//!
//! The site keeps a single slot, [`PREFERRED_LANGUAGE_KEY`]. It is read once at
//! startup, overwritten on every user-initiated change, and never deleted.

use std::collections::HashMap;

use crate::i18n::LocaleCode;

/// Storage key for the preferred locale.
pub const PREFERRED_LANGUAGE_KEY: &str = "preferredLanguage";

/// Minimal string key-value storage.
pub trait PreferenceStore {
    /// Read a stored value.
    fn load(&self, key: &str) -> Option<String>;

    /// Overwrite a stored value. Failures are logged by the implementation.
    fn save(&mut self, key: &str, value: &str);
}

/// Process-local storage for native hosts and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    /// Seed storage with a preferred locale.
    #[must_use]
    pub fn with_locale(locale: LocaleCode) -> Self {
        let mut prefs = Self::default();
        prefs.save(PREFERRED_LANGUAGE_KEY, locale.code());
        prefs
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Stored locale, or `fallback` when absent or unrecognised.
#[must_use]
pub fn load_locale(preferences: &dyn PreferenceStore, fallback: LocaleCode) -> LocaleCode {
    preferences
        .load(PREFERRED_LANGUAGE_KEY)
        .and_then(|value| LocaleCode::from_lang_tag(&value))
        .unwrap_or(fallback)
}
