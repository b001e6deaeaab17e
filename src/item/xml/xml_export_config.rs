use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::BatchError;

/// Tag emitted, as a self-closing element, for records whose type is not exportable.
pub const DEFAULT_PLACEHOLDER_TAG: &str = "notXMLable";

/// What to do with an exported slot that holds no value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullValuePolicy {
    /// Emit the field element with no text and log a warning.
    #[default]
    EmptyElement,
    /// Abort the export with [`BatchError::NullValue`].
    Fail,
}

/// Output options of an [`XmlExportWriter`](super::XmlExportWriter).
///
/// Every key is optional in the JSON form:
///
/// ```
/// use xmlable_batch::item::xml::{ExportConfig, NullValuePolicy};
///
/// let config = ExportConfig::from_json(r#"{ "null_values": "fail" }"#).unwrap();
///
/// assert_eq!(config.null_values, NullValuePolicy::Fail);
/// assert!(!config.escape_text);
/// assert_eq!(config.placeholder_tag, "notXMLable");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Escape `<`, `>`, `&`, `'` and `"` in field values.
    ///
    /// Off by default: values are inserted verbatim.
    pub escape_text: bool,
    pub null_values: NullValuePolicy,
    pub placeholder_tag: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            escape_text: false,
            null_values: NullValuePolicy::default(),
            placeholder_tag: DEFAULT_PLACEHOLDER_TAG.to_string(),
        }
    }
}

impl ExportConfig {
    pub fn from_json(json: &str) -> Result<Self, BatchError> {
        let config: ExportConfig = serde_json::from_str(json)
            .map_err(|e| BatchError::Config(format!("Failed to parse export config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BatchError> {
        let json = fs::read_to_string(path.as_ref()).map_err(|e| {
            BatchError::Config(format!(
                "Failed to read export config {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    /// Checks that the placeholder tag can be used as an element name.
    pub fn validate(&self) -> Result<(), BatchError> {
        let tag = &self.placeholder_tag;
        if tag.is_empty() || tag.chars().any(|c| c.is_whitespace() || "<>/\"'=&".contains(c)) {
            return Err(BatchError::Config(format!(
                "Invalid placeholder tag: {:?}",
                tag
            )));
        }
        Ok(())
    }
}
