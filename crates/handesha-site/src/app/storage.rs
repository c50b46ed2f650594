//! `localStorage`-backed preferences.

use gloo::console;
use gloo::storage::{LocalStorage, Storage};

use crate::preferences::PreferenceStore;

/// Browser local storage.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LocalPreferences;

impl PreferenceStore for LocalPreferences {
    fn load(&self, key: &str) -> Option<String> {
        LocalStorage::get::<String>(key).ok()
    }

    fn save(&mut self, key: &str, value: &str) {
        if let Err(err) = LocalStorage::set(key, value) {
            console::error!(format!("failed to persist {key}: {err}"));
        }
    }
}
