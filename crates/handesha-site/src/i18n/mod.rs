//! JSON-backed translation dictionary with per-locale trees.
//!
//! # Design
//! - One document holds every locale: `{ "en": { ... }, "ar": { ... } }`.
//! - Lookups never fall back to another locale; a miss is `None`.
//! - The store stays empty after a failed load and every lookup degrades.

mod coverage;
mod source;

pub use coverage::{CoverageReport, LocaleCoverage, coverage_report, key_paths};
pub use source::{BUNDLED_TRANSLATIONS, StaticSource, TranslationSource};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::error::LoadError;
use crate::preferences::{PREFERRED_LANGUAGE_KEY, PreferenceStore};

/// Locales the site ships buttons for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleCode {
    /// English.
    En,
    /// Arabic.
    Ar,
}

impl LocaleCode {
    /// All supported locales in button order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::En, Self::Ar]
    }

    /// Two-letter code used as the dictionary key and `<html lang>` value.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// Human-friendly label for the language toggle.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ar => "العربية",
        }
    }

    /// Id of the toggle button bound to this locale.
    #[must_use]
    pub const fn button_id(self) -> &'static str {
        match self {
            Self::En => "lang-en",
            Self::Ar => "lang-ar",
        }
    }

    /// Whether the locale lays out right-to-left.
    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Ar)
    }

    /// Map a stored preference or language tag to a supported locale.
    #[must_use]
    pub fn from_lang_tag(tag: &str) -> Option<Self> {
        let lowered = tag.trim().to_ascii_lowercase();
        let base = lowered.split(['-', '_']).next().unwrap_or_default();
        Self::all()
            .iter()
            .copied()
            .find(|locale| locale.code() == base)
    }
}

/// Default locale when no preference has been stored.
pub const DEFAULT_LOCALE: LocaleCode = LocaleCode::En;

/// Loaded dictionary plus the current locale.
#[derive(Clone, Debug)]
pub struct TranslationStore {
    tree: Option<Value>,
    locale: LocaleCode,
}

impl TranslationStore {
    /// Create an empty store positioned on `locale`.
    #[must_use]
    pub const fn new(locale: LocaleCode) -> Self {
        Self { tree: None, locale }
    }

    /// Build a store from the dictionary compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled document is malformed.
    pub fn bundled(locale: LocaleCode) -> Result<Self, LoadError> {
        let mut store = Self::new(locale);
        store.load_bytes(BUNDLED_TRANSLATIONS.as_bytes())?;
        Ok(store)
    }

    /// Fetch and parse the dictionary from `source`.
    ///
    /// A failure is logged and leaves the store as it was.
    ///
    /// # Errors
    ///
    /// Returns the fetch or parse failure.
    pub async fn load(&mut self, source: &dyn TranslationSource) -> Result<(), LoadError> {
        let bytes = source.fetch().await?;
        self.load_bytes(&bytes)
    }

    /// Parse a dictionary document and replace the current tree.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] for invalid JSON and [`LoadError::Shape`]
    /// when the top level is not an object.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        match parse_dictionary(bytes) {
            Ok(tree) => {
                let locales = tree.as_object().map_or(0, serde_json::Map::len);
                info!(locales, "translations loaded");
                self.tree = Some(tree);
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "failed to load translations");
                Err(err)
            }
        }
    }

    /// Whether a dictionary has been loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.tree.is_some()
    }

    /// Currently selected locale.
    #[must_use]
    pub const fn locale(&self) -> LocaleCode {
        self.locale
    }

    /// Raw dictionary tree, if loaded.
    #[must_use]
    pub const fn tree(&self) -> Option<&Value> {
        self.tree.as_ref()
    }

    /// Resolve a dotted key path in `locale`'s tree.
    ///
    /// Returns `None` as soon as a segment is absent, when the leaf is not a
    /// string, or when the leaf is empty.
    #[must_use]
    pub fn resolve(&self, locale: LocaleCode, key: &str) -> Option<&str> {
        let tree = self.tree.as_ref()?.get(locale.code())?;
        resolve_path(tree, key)
    }

    /// Switch the current locale and persist it.
    ///
    /// Returns `false` without touching the preference when `locale` is
    /// already current.
    pub fn set_locale(&mut self, locale: LocaleCode, preferences: &mut dyn PreferenceStore) -> bool {
        if locale == self.locale {
            return false;
        }
        self.locale = locale;
        preferences.save(PREFERRED_LANGUAGE_KEY, locale.code());
        true
    }

    /// Resolve `key` in the current locale and substitute `{{name}}` params.
    ///
    /// Falls back to `key` itself when nothing is loaded or the key misses.
    #[must_use]
    pub fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        if !self.is_loaded() {
            return key.to_string();
        }
        let text = self.resolve(self.locale, key).unwrap_or(key);
        interpolate(text, params)
    }
}

fn parse_dictionary(bytes: &[u8]) -> Result<Value, LoadError> {
    let tree: Value = serde_json::from_slice(bytes).map_err(|source| LoadError::Parse { source })?;
    if tree.is_object() {
        Ok(tree)
    } else {
        Err(LoadError::Shape {
            found: json_type(&tree),
        })
    }
}

pub(crate) fn resolve_path<'a>(tree: &'a Value, path: &str) -> Option<&'a str> {
    let mut node = tree;
    for segment in path.split('.') {
        node = node.get(segment)?;
    }
    node.as_str().filter(|text| !text.is_empty())
}

/// Replace every `{{name}}` whose name appears in `params`.
///
/// Placeholders without a matching param stay in the output verbatim.
#[must_use]
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            result.push_str(&rest[start..]);
            return result;
        };
        let name = &after[..end];
        match params.iter().find(|(param, _)| *param == name) {
            Some((_, value)) => result.push_str(value),
            None => {
                result.push_str("{{");
                result.push_str(name);
                result.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    result.push_str(rest);
    result
}

pub(crate) const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferences;

    fn store() -> TranslationStore {
        let mut store = TranslationStore::new(LocaleCode::En);
        store
            .load_bytes(
                r#"{
                    "en": {"common": {"siteName": "Site", "empty": "", "hello": "Hi {{name}}, {{name}}! {{other}}"},
                           "about": {"stats": {"months": "months Active"}}},
                    "ar": {"common": {"siteName": "موقع"}}
                }"#
                .as_bytes(),
            )
            .expect("valid dictionary");
        store
    }

    #[test]
    fn resolve_returns_exact_leaf() {
        let store = store();
        assert_eq!(store.resolve(LocaleCode::En, "common.siteName"), Some("Site"));
        assert_eq!(
            store.resolve(LocaleCode::En, "about.stats.months"),
            Some("months Active")
        );
        assert_eq!(store.resolve(LocaleCode::Ar, "common.siteName"), Some("موقع"));
    }

    #[test]
    fn resolve_misses_are_none_without_locale_fallback() {
        let store = store();
        assert_eq!(store.resolve(LocaleCode::En, "common.missing"), None);
        assert_eq!(store.resolve(LocaleCode::En, "about.stats"), None);
        assert_eq!(store.resolve(LocaleCode::En, "common.empty"), None);
        assert_eq!(store.resolve(LocaleCode::Ar, "about.stats.months"), None);
    }

    #[test]
    fn failed_load_keeps_store_empty() {
        let mut store = TranslationStore::new(LocaleCode::En);
        assert!(matches!(
            store.load_bytes(b"not json"),
            Err(LoadError::Parse { .. })
        ));
        assert!(matches!(
            store.load_bytes(b"[1, 2]"),
            Err(LoadError::Shape { found: "array" })
        ));
        assert!(!store.is_loaded());
        assert_eq!(store.resolve(LocaleCode::En, "common.siteName"), None);
        assert_eq!(store.translate("common.siteName", &[]), "common.siteName");
    }

    #[test]
    fn set_locale_is_idempotent_and_persists_changes() {
        let mut store = store();
        let mut prefs = MemoryPreferences::default();
        assert!(!store.set_locale(LocaleCode::En, &mut prefs));
        assert_eq!(prefs.load(PREFERRED_LANGUAGE_KEY), None);
        assert!(store.set_locale(LocaleCode::Ar, &mut prefs));
        assert_eq!(store.locale(), LocaleCode::Ar);
        assert_eq!(prefs.load(PREFERRED_LANGUAGE_KEY).as_deref(), Some("ar"));
    }

    #[test]
    fn translate_substitutes_known_params_only() {
        let store = store();
        assert_eq!(
            store.translate("common.hello", &[("name", "Sara")]),
            "Hi Sara, Sara! {{other}}"
        );
        assert_eq!(store.translate("nav.missing", &[]), "nav.missing");
    }

    #[test]
    fn interpolate_keeps_unterminated_braces() {
        assert_eq!(interpolate("a {{b", &[("b", "x")]), "a {{b");
        assert_eq!(interpolate("plain", &[]), "plain");
    }

    #[test]
    fn lang_tags_map_to_supported_locales() {
        assert_eq!(LocaleCode::from_lang_tag("ar-SA"), Some(LocaleCode::Ar));
        assert_eq!(LocaleCode::from_lang_tag(" EN "), Some(LocaleCode::En));
        assert_eq!(LocaleCode::from_lang_tag("fr"), None);
        assert!(LocaleCode::Ar.is_rtl());
        assert!(!LocaleCode::En.is_rtl());
    }

    #[test]
    fn bundled_dictionary_covers_required_keys() {
        for locale in LocaleCode::all() {
            let store = TranslationStore::bundled(locale).expect("bundled dictionary parses");
            assert!(store.resolve(locale, "common.siteName").is_some());
            assert!(store.resolve(locale, "contact.social.memberButton").is_some());
        }
    }
}
