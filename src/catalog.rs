//! Known conversion features of the web application.

use crate::result::ResultKind;

/// What a feature's success response looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// A JSON result of the given kind.
    Json(ResultKind),
    /// A binary attachment.
    Download,
    /// JSON of the given kind when the `preview` action is used, otherwise a
    /// download.
    PreviewOrDownload(ResultKind),
}

/// One entry of the feature catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureInfo {
    pub name: &'static str,
    pub description: &'static str,
    /// Form fields the server requires besides `file`.
    pub required_fields: &'static [&'static str],
    pub shape: ResponseShape,
}

/// Features served under `/api/<name>`.
pub const FEATURES: &[FeatureInfo] = &[
    FeatureInfo {
        name: "text",
        description: "Extract plain text from a .docx",
        required_fields: &[],
        shape: ResponseShape::Json(ResultKind::Text),
    },
    FeatureInfo {
        name: "metadata",
        description: "Read core document properties",
        required_fields: &[],
        shape: ResponseShape::Json(ResultKind::Metadata),
    },
    FeatureInfo {
        name: "images",
        description: "List embedded media",
        required_fields: &[],
        shape: ResponseShape::Json(ResultKind::Images),
    },
    FeatureInfo {
        name: "tables",
        description: "Extract table cells",
        required_fields: &[],
        shape: ResponseShape::Json(ResultKind::Tables),
    },
    FeatureInfo {
        name: "replace",
        description: "Search and replace text, returns the modified .docx",
        required_fields: &["search_text", "replace_text"],
        shape: ResponseShape::Download,
    },
    FeatureInfo {
        name: "generate",
        description: "Build a .docx from markdown",
        required_fields: &["markdown_text"],
        shape: ResponseShape::Download,
    },
    FeatureInfo {
        name: "docx-to-md",
        description: "Convert a .docx to markdown",
        required_fields: &[],
        shape: ResponseShape::PreviewOrDownload(ResultKind::Markdown),
    },
    FeatureInfo {
        name: "pdf-to-docx",
        description: "Convert a PDF to .docx",
        required_fields: &[],
        shape: ResponseShape::Download,
    },
    FeatureInfo {
        name: "docx-to-pdf",
        description: "Convert a .docx to PDF",
        required_fields: &[],
        shape: ResponseShape::Download,
    },
];

/// Look up a feature by name.
pub fn lookup(name: &str) -> Option<&'static FeatureInfo> {
    FEATURES.iter().find(|f| f.name == name)
}

impl std::fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseShape::Json(kind) => write!(f, "json:{kind}"),
            ResponseShape::Download => f.write_str("download"),
            ResponseShape::PreviewOrDownload(kind) => write!(f, "json:{kind} (preview) | download"),
        }
    }
}
