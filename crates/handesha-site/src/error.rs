//! Error types for the site runtime.
//!
//! # Design
//! - Keep error messages constant while carrying context fields for debugging.
//! - Resolution misses and absent DOM nodes are not errors; they surface as
//!   `None` or a silent skip at the call site.

use thiserror::Error;

/// Failure while fetching or parsing the translation resource.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The resource could not be retrieved.
    #[error("translation fetch failed")]
    Fetch {
        /// Location the resource was requested from.
        location: String,
        /// Transport-level detail.
        detail: String,
    },
    /// The resource was not valid JSON.
    #[error("translation resource is not valid json")]
    Parse {
        /// Source parse error.
        source: serde_json::Error,
    },
    /// The resource parsed but its top level is not a locale map.
    #[error("translation resource must be an object keyed by locale")]
    Shape {
        /// JSON type found at the top level.
        found: &'static str,
    },
}

/// Failure while driving the locale controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    /// A language switch was requested before initialization completed.
    #[error("locale controller is not ready")]
    NotReady {
        /// Operation identifier.
        operation: &'static str,
    },
}

/// Failure while validating a host-supplied content override.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Field value did not match its semantic type.
    #[error("invalid content configuration value")]
    InvalidValue {
        /// Field that failed validation.
        field: &'static str,
        /// Offending value rendered as JSON.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// Field is not part of the content schema.
    #[error("unknown content configuration field")]
    UnknownField {
        /// Name supplied by the host.
        field: String,
    },
    /// Override payload was not a JSON object.
    #[error("content configuration must be an object")]
    NotAnObject,
}

/// Failure while loading site settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings document was not valid JSON for the schema.
    #[error("failed to parse site settings")]
    Parse {
        /// Source parse error.
        source: serde_json::Error,
    },
    /// Membership window closes before it opens.
    #[error("membership window is inverted")]
    WindowOrder {
        /// Configured opening instant.
        opens_at: String,
        /// Configured closing instant.
        closes_at: String,
    },
}
