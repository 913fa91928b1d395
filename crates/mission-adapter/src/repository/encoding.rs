//! Textual encodings of a mission type record

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use shared::Result;

use super::document::MissionTypeDocument;

/// The two interchangeable on-disk encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Indentation-based, the default for new records
    #[default]
    Yaml,
    /// Brace-delimited
    Json,
}

impl Encoding {
    pub fn extension(&self) -> &'static str {
        match self {
            Encoding::Yaml => "yaml",
            Encoding::Json => "json",
        }
    }

    /// Encoding implied by a file extension (`.yaml`, `.yml`, `.json`)
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Encoding::Yaml),
            "json" => Some(Encoding::Json),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Encoding::Yaml),
            "json" => Some(Encoding::Json),
            _ => None,
        }
    }

    /// Parse text into a generic value; the document mapping does the rest
    pub fn parse(&self, text: &str) -> Result<Value> {
        match self {
            Encoding::Yaml => Ok(serde_yaml::from_str::<Option<Value>>(text)?.unwrap_or(Value::Null)),
            Encoding::Json => Ok(serde_json::from_str(text)?),
        }
    }

    /// Serialize a document. JSON uses four-space indentation; YAML writes
    /// multiline prompts as block scalars.
    pub fn render(&self, document: &MissionTypeDocument) -> Result<String> {
        match self {
            Encoding::Yaml => Ok(serde_yaml::to_string(document)?),
            Encoding::Json => {
                let mut out = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
                let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
                document.serialize(&mut serializer)?;
                String::from_utf8(out).map_err(|e| shared::EditorError::Other(e.to_string()))
            }
        }
    }
}

impl core::fmt::Display for Encoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.extension())
    }
}
