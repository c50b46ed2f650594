#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(
    missing_docs,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Handesha Sah site runtime.
//!
//! Loads the bilingual dictionary, applies it to the page, switches language
//! and direction, applies host content overrides, and drives the activity
//! counter and membership call-to-action. Everything runs over the
//! [`dom::Document`] abstraction; the browser binding lives behind
//! `wasm32`.

pub mod activity;
pub mod content;
pub mod dom;
pub mod error;
pub mod i18n;
pub mod locale;
pub mod membership;
pub mod page;
pub mod preferences;
pub mod schedule;
pub mod settings;
pub mod site;

#[cfg(target_arch = "wasm32")]
mod app;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;

pub use error::{ConfigError, LoadError, LocaleError, SettingsError};
pub use i18n::{DEFAULT_LOCALE, LocaleCode, TranslationStore};
pub use locale::{LoadState, LocaleController, LocaleSwitch};
pub use settings::SiteSettings;
pub use site::{Clock, FixedClock, Site, SystemClock};
