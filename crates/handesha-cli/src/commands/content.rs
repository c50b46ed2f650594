use anyhow::anyhow;
use handesha_site::ConfigError;
use handesha_site::content::{ContentBridge, ContentConfig};
use handesha_site::dom::MemoryDocument;
use serde::Serialize;
use serde_json::Value;

use crate::cli::{ContentArgs, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output::render_content;

const PREVIEW_PROPERTIES: [&str; 5] = ["--primary", "--secondary", "--background", "--accent", "font-size"];

/// What the page would look like after the host delivers an override document.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ContentPreview {
    pub(crate) effective: ContentConfig,
    pub(crate) overridden: usize,
    pub(crate) issues: Vec<ContentIssue>,
    pub(crate) styles: Vec<(String, String)>,
    pub(crate) edit_panel: Vec<(&'static str, String)>,
    pub(crate) recolorables: Vec<&'static str>,
}

/// One rejected entry of the override document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ContentIssue {
    pub(crate) field: String,
    pub(crate) reason: &'static str,
    pub(crate) value: Option<String>,
}

impl From<&ConfigError> for ContentIssue {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::InvalidValue { field, value, reason } => Self {
                field: (*field).to_string(),
                reason: *reason,
                value: Some(value.clone()),
            },
            ConfigError::UnknownField { field } => Self {
                field: field.clone(),
                reason: "unknown_field",
                value: None,
            },
            ConfigError::NotAnObject => Self {
                field: String::new(),
                reason: "not_an_object",
                value: None,
            },
        }
    }
}

pub(crate) async fn handle_content(args: &ContentArgs, format: OutputFormat) -> CliResult<()> {
    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to read {}: {err}", args.file.display())))?;
    let payload: Value = serde_json::from_str(&raw).map_err(|err| {
        CliError::validation(format!("{} is not valid JSON: {err}", args.file.display()))
    })?;

    let preview = preview(&payload);
    render_content(&preview, format)?;
    if preview.issues.is_empty() {
        Ok(())
    } else {
        Err(CliError::validation(format!(
            "{} content override(s) rejected",
            preview.issues.len()
        )))
    }
}

/// Apply `payload` to an in-memory page and capture the result.
pub(crate) fn preview(payload: &Value) -> ContentPreview {
    let mut bridge = ContentBridge::default();
    let mut doc = MemoryDocument::new();
    let issues = bridge.on_config_change(payload, &mut doc);

    let mut styles: Vec<(String, String)> = PREVIEW_PROPERTIES
        .into_iter()
        .filter_map(|name| {
            doc.custom_property(name)
                .map(|value| (name.to_string(), value.to_string()))
        })
        .collect();
    if let Some(family) = doc.style(doc.body_node(), "font-family") {
        styles.push(("font-family".to_string(), family.to_string()));
    }

    let capabilities = bridge.capabilities();
    ContentPreview {
        effective: bridge.effective(),
        overridden: bridge.overrides().len(),
        issues: issues.iter().map(ContentIssue::from).collect(),
        styles,
        edit_panel: bridge.edit_panel_values(),
        recolorables: capabilities
            .recolorables
            .iter()
            .map(|descriptor| descriptor.field().key())
            .collect(),
    }
}
