//! Decoded server results.
//!
//! The conversion endpoints answer with a JSON object carrying exactly one
//! payload key. [`ConversionResult::from_json`] decodes the body through a
//! serde schema and picks the variant in a fixed precedence order:
//! `metadata`, `text`, `markdown`, `images`, `tables`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{SubmitError, GENERIC_ERROR_MESSAGE};

/// One `key: value` row of document metadata, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

/// An embedded image returned by the `images` feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageItem {
    /// MIME type, e.g. `image/png`.
    pub mime: String,
    /// Base64-encoded image bytes.
    pub data: String,
    /// Original media file name inside the document.
    pub filename: String,
}

impl ImageItem {
    /// `data:` URI suitable for an `<img src>`.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.data)
    }
}

/// Rows of cells, `table[row][col]`.
pub type Table = Vec<Vec<String>>;

/// A successful response, one case per result kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionResult {
    Metadata(Vec<MetadataEntry>),
    Text(String),
    /// Possibly empty.
    Markdown(String),
    Images(Vec<ImageItem>),
    Tables(Vec<Table>),
    /// The body carried none of the known keys.
    Empty,
}

/// Short name of a result variant, used in logs and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Metadata,
    Text,
    Markdown,
    Images,
    Tables,
    Empty,
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResultKind::Metadata => "metadata",
            ResultKind::Text => "text",
            ResultKind::Markdown => "markdown",
            ResultKind::Images => "images",
            ResultKind::Tables => "tables",
            ResultKind::Empty => "empty",
        };
        f.write_str(name)
    }
}

/// Wire schema. Every key is optional; `markdown` distinguishes an absent
/// key from an explicit `null`.
#[derive(Debug, Default, Deserialize)]
struct ResultSchema {
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, deserialize_with = "present")]
    markdown: Option<Option<String>>,
    #[serde(default)]
    images: Option<Vec<ImageItem>>,
    #[serde(default)]
    tables: Option<Vec<Table>>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorSchema {
    #[serde(default)]
    error: Option<String>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ConversionResult {
    /// Decode a success body.
    pub fn from_json(bytes: &[u8]) -> Result<Self, SubmitError> {
        let schema: ResultSchema = serde_json::from_slice(bytes)?;
        Ok(Self::from_schema(schema))
    }

    fn from_schema(schema: ResultSchema) -> Self {
        if let Some(metadata) = schema.metadata {
            let entries = metadata
                .iter()
                .map(|(key, value)| MetadataEntry {
                    key: key.clone(),
                    value: scalar_to_string(value),
                })
                .collect();
            return ConversionResult::Metadata(entries);
        }
        if let Some(text) = schema.text.filter(|t| !t.is_empty()) {
            return ConversionResult::Text(text);
        }
        if let Some(markdown) = schema.markdown {
            return ConversionResult::Markdown(markdown.unwrap_or_default());
        }
        if let Some(images) = schema.images {
            return ConversionResult::Images(images);
        }
        if let Some(tables) = schema.tables {
            return ConversionResult::Tables(tables);
        }
        ConversionResult::Empty
    }

    pub fn kind(&self) -> ResultKind {
        match self {
            ConversionResult::Metadata(_) => ResultKind::Metadata,
            ConversionResult::Text(_) => ResultKind::Text,
            ConversionResult::Markdown(_) => ResultKind::Markdown,
            ConversionResult::Images(_) => ResultKind::Images,
            ConversionResult::Tables(_) => ResultKind::Tables,
            ConversionResult::Empty => ResultKind::Empty,
        }
    }
}

/// Extract the user-facing message from a JSON error body.
///
/// A missing or null `error` field yields [`GENERIC_ERROR_MESSAGE`].
pub fn error_message(bytes: &[u8]) -> Result<String, SubmitError> {
    let schema: ErrorSchema = serde_json::from_slice(bytes)?;
    Ok(schema
        .error
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()))
}
