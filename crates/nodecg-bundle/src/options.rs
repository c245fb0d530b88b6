//! Loader configuration

use serde::{Deserialize, Serialize};

/// Options controlling how bundles are parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptions {
    /// Manifest key holding the framework-specific sub-object
    #[serde(default = "default_framework_key")]
    pub framework_key: String,

    /// Bundle-relative path of the config schema
    #[serde(default = "default_schema_file")]
    pub schema_file: String,

    /// Header color given to panels that don't declare one
    #[serde(default = "default_header_color")]
    pub default_header_color: String,
}

fn default_framework_key() -> String {
    "nodecg".to_string()
}

fn default_schema_file() -> String {
    "configschema.json".to_string()
}

fn default_header_color() -> String {
    "#9f9bbd".to_string()
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            framework_key: default_framework_key(),
            schema_file: default_schema_file(),
            default_header_color: default_header_color(),
        }
    }
}

impl ParseOptions {
    /// Create options with every field at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options from JSON bytes
    ///
    /// Empty input yields the defaults; missing fields are filled in individually.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    /// Set the framework sub-object key
    pub fn with_framework_key(mut self, key: impl Into<String>) -> Self {
        self.framework_key = key.into();
        self
    }

    /// Set the schema file name
    pub fn with_schema_file(mut self, file: impl Into<String>) -> Self {
        self.schema_file = file.into();
        self
    }

    /// Set the default panel header color
    pub fn with_default_header_color(mut self, color: impl Into<String>) -> Self {
        self.default_header_color = color.into();
        self
    }

    /// Dotted manifest path of a framework property, as shown in diagnostics
    pub(crate) fn property_path(&self, property: &str) -> String {
        format!("{}.{property}", self.framework_key)
    }
}
