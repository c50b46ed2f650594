//! Editable page content: schema, baked-in defaults and override validation.
//!
//! # Design
//! - Every field has a semantic kind; host overrides are validated at the
//!   boundary and rejected values fall back to the default.
//! - Falsy overrides (`null`, `""`, `0`, `false`) count as absent.

mod bridge;

pub use bridge::{Capabilities, CapabilityDescriptor, ContentBridge, HostChannel};

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::ConfigError;

/// Smallest accepted root font size, in pixels.
pub const MIN_FONT_SIZE_PX: u32 = 8;
/// Largest accepted root font size, in pixels.
pub const MAX_FONT_SIZE_PX: u32 = 72;

/// Semantic type of a content field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text written into a page element.
    Text,
    /// Hex color (`#rgb`, `#rrggbb`, `#rrggbbaa`).
    Color,
    /// Font family name.
    FontFamily,
    /// Integer pixel size.
    PixelSize,
}

/// Fields the host may edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    /// Hero banner slogan.
    HeroSlogan,
    /// About section heading.
    AboutTitle,
    /// About section body.
    AboutDescription,
    /// Contact section heading.
    ContactTitle,
    /// `--primary` color.
    PrimaryColor,
    /// `--secondary` color.
    SecondaryColor,
    /// Body text color (kept for the host; not applied to the page).
    TextColor,
    /// `--background` color.
    BackgroundColor,
    /// `--accent` color.
    AccentColor,
    /// Body font family.
    FontFamily,
    /// Root font size in pixels.
    FontSize,
}

impl ConfigField {
    /// Every field in schema order.
    #[must_use]
    pub const fn all() -> [Self; 11] {
        [
            Self::HeroSlogan,
            Self::AboutTitle,
            Self::AboutDescription,
            Self::ContactTitle,
            Self::PrimaryColor,
            Self::SecondaryColor,
            Self::TextColor,
            Self::BackgroundColor,
            Self::AccentColor,
            Self::FontFamily,
            Self::FontSize,
        ]
    }

    /// Wire name used by the host.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::HeroSlogan => "hero_slogan",
            Self::AboutTitle => "about_title",
            Self::AboutDescription => "about_description",
            Self::ContactTitle => "contact_title",
            Self::PrimaryColor => "primary_color",
            Self::SecondaryColor => "secondary_color",
            Self::TextColor => "text_color",
            Self::BackgroundColor => "background_color",
            Self::AccentColor => "accent_color",
            Self::FontFamily => "font_family",
            Self::FontSize => "font_size",
        }
    }

    /// Semantic kind.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::HeroSlogan | Self::AboutTitle | Self::AboutDescription | Self::ContactTitle => {
                FieldKind::Text
            }
            Self::PrimaryColor
            | Self::SecondaryColor
            | Self::TextColor
            | Self::BackgroundColor
            | Self::AccentColor => FieldKind::Color,
            Self::FontFamily => FieldKind::FontFamily,
            Self::FontSize => FieldKind::PixelSize,
        }
    }

    /// Look a field up by wire name.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().into_iter().find(|field| field.key() == key)
    }
}

/// A validated field value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Text, color or font family.
    Text(String),
    /// Pixel size.
    Pixels(u32),
}

impl ConfigValue {
    /// Value rendered for display or the DOM.
    #[must_use]
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => formatter.write_str(text),
            Self::Pixels(px) => write!(formatter, "{px}"),
        }
    }
}

/// Fully populated content configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContentConfig {
    /// Hero banner slogan.
    pub hero_slogan: String,
    /// About section heading.
    pub about_title: String,
    /// About section body.
    pub about_description: String,
    /// Contact section heading.
    pub contact_title: String,
    /// `--primary` color.
    pub primary_color: String,
    /// `--secondary` color.
    pub secondary_color: String,
    /// Body text color.
    pub text_color: String,
    /// `--background` color.
    pub background_color: String,
    /// `--accent` color.
    pub accent_color: String,
    /// Body font family.
    pub font_family: String,
    /// Root font size in pixels.
    pub font_size: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            hero_slogan: "Empowering Future Engineers".to_string(),
            about_title: "About Our Club".to_string(),
            about_description: "Handesha Sah is a dynamic engineering club dedicated to fostering innovation, collaboration, and excellence among aspiring engineers. We believe in learning by doing, where every project is an opportunity to grow and every challenge is a stepping stone to success.".to_string(),
            contact_title: "Contact Us".to_string(),
            primary_color: "#092b56".to_string(),
            secondary_color: "#a3ddfd".to_string(),
            text_color: "#092b56".to_string(),
            background_color: "#ffffff".to_string(),
            accent_color: "#0a4d8c".to_string(),
            font_family: "Poppins".to_string(),
            font_size: 16,
        }
    }
}

impl ContentConfig {
    /// Value of `field`.
    #[must_use]
    pub fn get(&self, field: ConfigField) -> ConfigValue {
        let text = match field {
            ConfigField::HeroSlogan => &self.hero_slogan,
            ConfigField::AboutTitle => &self.about_title,
            ConfigField::AboutDescription => &self.about_description,
            ConfigField::ContactTitle => &self.contact_title,
            ConfigField::PrimaryColor => &self.primary_color,
            ConfigField::SecondaryColor => &self.secondary_color,
            ConfigField::TextColor => &self.text_color,
            ConfigField::BackgroundColor => &self.background_color,
            ConfigField::AccentColor => &self.accent_color,
            ConfigField::FontFamily => &self.font_family,
            ConfigField::FontSize => return ConfigValue::Pixels(self.font_size),
        };
        ConfigValue::Text(text.clone())
    }

    fn set(&mut self, field: ConfigField, value: ConfigValue) {
        let slot = match field {
            ConfigField::HeroSlogan => &mut self.hero_slogan,
            ConfigField::AboutTitle => &mut self.about_title,
            ConfigField::AboutDescription => &mut self.about_description,
            ConfigField::ContactTitle => &mut self.contact_title,
            ConfigField::PrimaryColor => &mut self.primary_color,
            ConfigField::SecondaryColor => &mut self.secondary_color,
            ConfigField::TextColor => &mut self.text_color,
            ConfigField::BackgroundColor => &mut self.background_color,
            ConfigField::AccentColor => &mut self.accent_color,
            ConfigField::FontFamily => &mut self.font_family,
            ConfigField::FontSize => {
                if let ConfigValue::Pixels(px) = value {
                    self.font_size = px;
                }
                return;
            }
        };
        if let ConfigValue::Text(text) = value {
            *slot = text;
        }
    }
}

/// Host-supplied values layered over the defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    values: BTreeMap<ConfigField, ConfigValue>,
}

impl ConfigOverrides {
    /// Validate a host payload. Rejected and unknown fields are reported and
    /// skipped; the rest are kept.
    #[must_use]
    pub fn from_value(payload: &Value) -> (Self, Vec<ConfigError>) {
        let mut overrides = Self::default();
        let mut issues = Vec::new();
        let Some(map) = payload.as_object() else {
            if !payload.is_null() {
                issues.push(ConfigError::NotAnObject);
            }
            return (overrides, issues);
        };
        for (key, raw) in map {
            let Some(field) = ConfigField::from_key(key) else {
                issues.push(ConfigError::UnknownField { field: key.clone() });
                continue;
            };
            if let Err(err) = overrides.set(field, raw) {
                issues.push(err);
            }
        }
        for issue in &issues {
            warn!(issue = ?issue, "content override rejected");
        }
        (overrides, issues)
    }

    /// Validate and store one value. Falsy values clear the override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the value does not match the
    /// field's kind; the previous override is kept.
    pub fn set(&mut self, field: ConfigField, raw: &Value) -> Result<(), ConfigError> {
        match validate(field, raw)? {
            Some(value) => {
                self.values.insert(field, value);
            }
            None => {
                self.values.remove(&field);
            }
        }
        Ok(())
    }

    /// Override for `field`, if any.
    #[must_use]
    pub fn get(&self, field: ConfigField) -> Option<&ConfigValue> {
        self.values.get(&field)
    }

    /// Number of overridden fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Defaults with every override applied.
    #[must_use]
    pub fn effective(&self, defaults: &ContentConfig) -> ContentConfig {
        let mut config = defaults.clone();
        for (field, value) in &self.values {
            config.set(*field, value.clone());
        }
        config
    }
}

/// Validate `raw` for `field`. `Ok(None)` means the value is falsy.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for values of the wrong kind.
pub fn validate(field: ConfigField, raw: &Value) -> Result<Option<ConfigValue>, ConfigError> {
    if is_falsy(raw) {
        return Ok(None);
    }
    let invalid = |reason: &'static str| ConfigError::InvalidValue {
        field: field.key(),
        value: raw.to_string(),
        reason,
    };
    match field.kind() {
        FieldKind::Text => raw
            .as_str()
            .map(|text| Some(ConfigValue::Text(text.to_string())))
            .ok_or_else(|| invalid("expected_string")),
        FieldKind::Color => {
            let text = raw.as_str().ok_or_else(|| invalid("expected_string"))?.trim();
            if is_hex_color(text) {
                Ok(Some(ConfigValue::Text(text.to_ascii_lowercase())))
            } else {
                Err(invalid("expected_hex_color"))
            }
        }
        FieldKind::FontFamily => {
            let text = raw.as_str().ok_or_else(|| invalid("expected_string"))?.trim();
            if text.is_empty() {
                Ok(None)
            } else if text.contains([';', '{', '}', '<', '>']) {
                Err(invalid("forbidden_character"))
            } else {
                Ok(Some(ConfigValue::Text(text.to_string())))
            }
        }
        FieldKind::PixelSize => {
            let px = pixel_size(raw).ok_or_else(|| invalid("expected_number"))?;
            if (f64::from(MIN_FONT_SIZE_PX)..=f64::from(MAX_FONT_SIZE_PX)).contains(&px) {
                // Range check above keeps the rounded value inside u32.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let px = px as u32;
                Ok(Some(ConfigValue::Pixels(px)))
            } else {
                Err(invalid("out_of_range"))
            }
        }
    }
}

fn is_falsy(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::String(text) => text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|value| value == 0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn pixel_size(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().trim_end_matches("px").trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then(|| value.round())
}

fn is_hex_color(text: &str) -> bool {
    let Some(digits) = text.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|ch| ch.is_ascii_hexdigit())
}
