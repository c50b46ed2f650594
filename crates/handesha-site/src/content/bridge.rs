//! Responds to the host editor protocol: applies config, exposes capabilities.

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{ConfigField, ConfigOverrides, ConfigValue, ContentConfig};
use crate::dom::Document;
use crate::error::ConfigError;

/// Text fields and the element ids they are written into.
const TEXT_TARGETS: [(ConfigField, &str); 4] = [
    (ConfigField::HeroSlogan, "hero-slogan"),
    (ConfigField::AboutTitle, "about-title"),
    (ConfigField::AboutDescription, "about-description"),
    (ConfigField::ContactTitle, "contact-title"),
];

/// Color fields and the custom properties they drive on `<html>`.
const COLOR_PROPERTIES: [(ConfigField, &str); 4] = [
    (ConfigField::PrimaryColor, "--primary"),
    (ConfigField::SecondaryColor, "--secondary"),
    (ConfigField::BackgroundColor, "--background"),
    (ConfigField::AccentColor, "--accent"),
];

/// Fields shown in the host edit panel, in display order.
const EDIT_PANEL_FIELDS: [ConfigField; 4] = [
    ConfigField::HeroSlogan,
    ConfigField::AboutTitle,
    ConfigField::AboutDescription,
    ConfigField::ContactTitle,
];

/// Outbound notification channel to the host editor.
pub trait HostChannel {
    /// Forward a partial config update (`{ field: value }`).
    fn set_config(&mut self, patch: &Map<String, Value>);
}

/// Get/set pair bound to one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapabilityDescriptor {
    field: ConfigField,
}

impl CapabilityDescriptor {
    const fn new(field: ConfigField) -> Self {
        Self { field }
    }

    /// Bound field.
    #[must_use]
    pub const fn field(self) -> ConfigField {
        self.field
    }

    /// Effective value of the bound field.
    #[must_use]
    pub fn get(self, bridge: &ContentBridge) -> ConfigValue {
        bridge.get(self.field)
    }

    /// Validate `raw`, store it and forward it to the host.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `raw` does not fit the field.
    pub fn set(self, bridge: &mut ContentBridge, raw: &Value) -> Result<(), ConfigError> {
        bridge.set(self.field, raw)
    }
}

/// Capability map handed to the host editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Color fields, in host display order.
    pub recolorables: Vec<CapabilityDescriptor>,
    /// Border color fields; the site has none.
    pub borderables: Vec<CapabilityDescriptor>,
    /// Font family.
    pub font_editable: CapabilityDescriptor,
    /// Root font size.
    pub font_sizeable: CapabilityDescriptor,
}

/// Holds the baked-in config and the host overrides layered over it.
pub struct ContentBridge {
    defaults: ContentConfig,
    overrides: ConfigOverrides,
    host: Option<Box<dyn HostChannel>>,
}

impl Default for ContentBridge {
    fn default() -> Self {
        Self::new(ContentConfig::default())
    }
}

impl ContentBridge {
    /// Bridge over `defaults` with no host attached.
    #[must_use]
    pub fn new(defaults: ContentConfig) -> Self {
        Self {
            defaults,
            overrides: ConfigOverrides::default(),
            host: None,
        }
    }

    /// Attach the host notification channel.
    #[must_use]
    pub fn with_host(mut self, host: Box<dyn HostChannel>) -> Self {
        self.host = Some(host);
        self
    }

    /// Baked-in defaults.
    #[must_use]
    pub const fn defaults(&self) -> &ContentConfig {
        &self.defaults
    }

    /// Current overrides.
    #[must_use]
    pub const fn overrides(&self) -> &ConfigOverrides {
        &self.overrides
    }

    /// Defaults serialised for the host `defaultConfig` handshake.
    #[must_use]
    pub fn default_config_json(&self) -> Value {
        serde_json::to_value(&self.defaults).unwrap_or(Value::Null)
    }

    /// Replace the overrides with the host's full config and apply it.
    /// Returns the rejected fields.
    pub fn on_config_change<D: Document>(&mut self, payload: &Value, doc: &mut D) -> Vec<ConfigError> {
        let (overrides, issues) = ConfigOverrides::from_value(payload);
        info!(
            overridden = overrides.len(),
            rejected = issues.len(),
            "content config received"
        );
        self.overrides = overrides;
        self.apply_config(doc);
        issues
    }

    /// Write every field into the page, falling back to defaults.
    pub fn apply_config<D: Document>(&self, doc: &mut D) {
        let config = self.effective();
        for (field, id) in TEXT_TARGETS {
            match doc.element_by_id(id) {
                Some(node) => doc.set_text(&node, &config.get(field).as_text()),
                None => debug!(id, "content target missing"),
            }
        }

        let root = doc.root();
        for (field, property) in COLOR_PROPERTIES {
            doc.set_style(&root, property, &config.get(field).as_text());
        }
        if let Some(body) = doc.body() {
            doc.set_style(
                &body,
                "font-family",
                &format!("{}, sans-serif", config.font_family),
            );
        }
        doc.set_style(&root, "font-size", &format!("{}px", config.font_size));
    }

    /// Effective config: defaults with overrides applied.
    #[must_use]
    pub fn effective(&self) -> ContentConfig {
        self.overrides.effective(&self.defaults)
    }

    /// Effective value of one field.
    #[must_use]
    pub fn get(&self, field: ConfigField) -> ConfigValue {
        self.overrides
            .get(field)
            .cloned()
            .unwrap_or_else(|| self.defaults.get(field))
    }

    /// Validate and store one field, then notify the host.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`]; nothing is stored or forwarded.
    pub fn set(&mut self, field: ConfigField, raw: &Value) -> Result<(), ConfigError> {
        self.overrides.set(field, raw)?;
        if let Some(host) = self.host.as_mut() {
            let mut patch = Map::new();
            patch.insert(field.key().to_string(), raw.clone());
            host.set_config(&patch);
        }
        Ok(())
    }

    /// Capability map for the host editor.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            recolorables: [
                ConfigField::BackgroundColor,
                ConfigField::SecondaryColor,
                ConfigField::PrimaryColor,
                ConfigField::AccentColor,
            ]
            .into_iter()
            .map(CapabilityDescriptor::new)
            .collect(),
            borderables: Vec::new(),
            font_editable: CapabilityDescriptor::new(ConfigField::FontFamily),
            font_sizeable: CapabilityDescriptor::new(ConfigField::FontSize),
        }
    }

    /// Text fields for the host edit panel, in display order.
    #[must_use]
    pub fn edit_panel_values(&self) -> Vec<(&'static str, String)> {
        EDIT_PANEL_FIELDS
            .into_iter()
            .map(|field| (field.key(), self.get(field).as_text()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, NodeId};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingHost(Rc<RefCell<Vec<Map<String, Value>>>>);

    impl HostChannel for RecordingHost {
        fn set_config(&mut self, patch: &Map<String, Value>) {
            self.0.borrow_mut().push(patch.clone());
        }
    }

    fn page() -> (MemoryDocument, NodeId) {
        let mut doc = MemoryDocument::new();
        let body = doc.body_node();
        let slogan = doc.element_with_id(body, "h2", "hero-slogan");
        doc.element_with_id(body, "h2", "about-title");
        (doc, slogan)
    }

    #[test]
    fn null_override_keeps_default_color() {
        let (mut doc, _) = page();
        let mut bridge = ContentBridge::default();
        let issues = bridge.on_config_change(&json!({"primary_color": null}), &mut doc);
        assert!(issues.is_empty());
        assert_eq!(doc.custom_property("--primary"), Some("#092b56"));
        assert_eq!(doc.custom_property("--accent"), Some("#0a4d8c"));
    }

    #[test]
    fn apply_writes_text_and_global_styles() {
        let (mut doc, slogan) = page();
        let mut bridge = ContentBridge::default();
        bridge.on_config_change(
            &json!({"hero_slogan": "Build Boldly", "font_family": "Cairo", "font_size": "18"}),
            &mut doc,
        );
        assert_eq!(doc.text(&slogan), "Build Boldly");
        let body = doc.body_node();
        assert_eq!(doc.style(body, "font-family"), Some("Cairo, sans-serif"));
        assert_eq!(doc.custom_property("font-size"), Some("18px"));
    }

    #[test]
    fn invalid_override_is_rejected_and_default_applies() {
        let (mut doc, _) = page();
        let mut bridge = ContentBridge::default();
        let issues = bridge.on_config_change(&json!({"secondary_color": "url(x)"}), &mut doc);
        assert_eq!(issues.len(), 1);
        assert_eq!(doc.custom_property("--secondary"), Some("#a3ddfd"));
    }

    #[test]
    fn capabilities_follow_host_order_and_forward_sets() {
        let host = RecordingHost::default();
        let log = Rc::clone(&host.0);
        let mut bridge = ContentBridge::default().with_host(Box::new(host));
        let caps = bridge.capabilities();
        let fields: Vec<_> = caps.recolorables.iter().map(|cap| cap.field()).collect();
        assert_eq!(
            fields,
            vec![
                ConfigField::BackgroundColor,
                ConfigField::SecondaryColor,
                ConfigField::PrimaryColor,
                ConfigField::AccentColor,
            ]
        );
        assert!(caps.borderables.is_empty());

        caps.font_sizeable
            .set(&mut bridge, &json!(20))
            .expect("valid size");
        assert_eq!(caps.font_sizeable.get(&bridge), ConfigValue::Pixels(20));
        assert!(caps.recolorables[0].set(&mut bridge, &json!("blue")).is_err());
        assert_eq!(
            caps.recolorables[0].get(&bridge),
            ConfigValue::Text("#ffffff".to_string())
        );

        let forwarded = log.borrow();
        assert_eq!(forwarded.len(), 1);
        assert_eq!(forwarded[0].get("font_size"), Some(&json!(20)));
    }

    #[test]
    fn edit_panel_lists_text_fields_in_order() {
        let mut bridge = ContentBridge::default();
        bridge
            .set(ConfigField::ContactTitle, &json!("Say Hello"))
            .expect("text accepted");
        let keys: Vec<_> = bridge
            .edit_panel_values()
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(
            keys,
            vec!["hero_slogan", "about_title", "about_description", "contact_title"]
        );
        assert_eq!(bridge.edit_panel_values()[3].1, "Say Hello");
        assert_eq!(bridge.default_config_json()["font_size"], json!(16));
    }
}
