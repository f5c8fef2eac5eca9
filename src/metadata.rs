//! Metadata documents
//!
//! A metadata document is sent to the deposition as-is; the only field the
//! crate looks at is `doi`, used for duplicate suppression.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Field holding the record's unique identifier
pub const DOI_FIELD: &str = "doi";

/// Parsed metadata document (a JSON object)
#[derive(Clone, Debug, PartialEq)]
pub struct Metadata {
    document: Map<String, Value>,
}

impl Metadata {
    /// Read and parse a metadata document
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid JSON, or is not a JSON object.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::parse(&raw).map_err(|reason| Error::MalformedMetadata {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse a metadata document from its text
    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(document)) => Ok(Self { document }),
            Ok(other) => Err(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            )),
            Err(e) => Err(e.to_string()),
        }
    }

    /// The `doi` field as search text
    ///
    /// Strings are trimmed and numbers are rendered as written. A blank
    /// string, `null`, a boolean, an array or an object yields `None`.
    pub fn doi(&self) -> Option<String> {
        match self.document.get(DOI_FIELD)? {
            Value::String(doi) => Some(doi.trim().to_string()).filter(|doi| !doi.is_empty()),
            Value::Number(doi) => Some(doi.to_string()),
            _ => None,
        }
    }

    /// The full document
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.document
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
