//! Error types for form submission.
//!
//! Two failure families reach the user through the same alert:
//!
//! * **Server-reported**: the endpoint answered with a non-success status.
//!   The message comes from the JSON `error` field or is synthesized from
//!   the status line.
//! * **Client-side**: the request never completed, the body could not be
//!   decoded, the form has no endpoint, or the download could not be stored.
//!
//! Neither family is retried.

use http::StatusCode;
use thiserror::Error;

/// Message used when a JSON error body carries no `error` field.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Everything that can abort a single submit-response cycle.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Non-success status. `message` is what the user sees.
    #[error("{message}")]
    Server { status: StatusCode, message: String },

    /// The form carries no `feature` field, so no endpoint was derived.
    #[error("Form '{form}' has no endpoint (missing hidden 'feature' field)")]
    NoEndpoint { form: String },

    /// No form with the requested id or feature is registered.
    #[error("No form registered for '{0}'")]
    UnknownForm(String),

    /// Network failure, timeout, or an unreadable response body.
    #[error("{0}")]
    Transport(String),

    /// The response claimed JSON but could not be decoded.
    #[error("Invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The download sink could not store the blob.
    #[error("Failed to save '{filename}': {source}")]
    Download {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

impl SubmitError {
    /// Build the error for a non-success reply whose body is not JSON.
    pub fn from_status(status: StatusCode) -> Self {
        let message = format!(
            "Error {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
        SubmitError::Server { status, message }
    }

    /// Same as [`from_status`](Self::from_status) but with the reason phrase
    /// the server actually sent.
    pub fn from_status_text(status: StatusCode, status_text: &str) -> Self {
        SubmitError::Server {
            status,
            message: format!("Error {}: {status_text}", status.as_u16()),
        }
    }

    /// `true` for failures the server reported.
    pub fn is_server(&self) -> bool {
        matches!(self, SubmitError::Server { .. })
    }
}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        SubmitError::Transport(err.to_string())
    }
}

/// Clipboard write failures.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The host refused the write (permissions, no focus).
    #[error("clipboard write denied: {0}")]
    Denied(String),
}

pub type Result<T, E = SubmitError> = std::result::Result<T, E>;
