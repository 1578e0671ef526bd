//! Handles the controller is given instead of reaching for page globals.
//!
//! # Architecture
//!
//! - [`Transport`]: posts a payload to an endpoint
//! - [`LoadingIndicator`], [`ResultsView`], [`CopyButton`]: page widgets
//! - [`Clipboard`], [`Alerter`], [`DownloadSink`]: host services
//!
//! [`memory`] holds in-process implementations used by the CLI and tests;
//! [`download::DirectorySink`] writes attachments to disk.

pub mod download;
pub mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};

use crate::error::{ClipboardError, SubmitError};
use crate::form::FormPayload;

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: StatusCode,
    /// Reason phrase the server sent, when it differs from the canonical one.
    pub status_text: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpReply {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: None,
            headers,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = Some(text.into());
        self
    }

    fn header(&self, name: &http::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(&CONTENT_TYPE)
    }

    pub fn content_disposition(&self) -> Option<&str> {
        self.header(&CONTENT_DISPOSITION)
    }

    /// `true` when the content type mentions `application/json`.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.contains("application/json"))
    }
}

/// Sends form payloads.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `payload` to `endpoint` (a path such as `/api/text`) and read
    /// the whole body.
    async fn post(&self, endpoint: &str, payload: &FormPayload) -> Result<HttpReply, SubmitError>;
}

/// The page-wide busy overlay.
pub trait LoadingIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// The results panel and its body.
pub trait ResultsView: Send + Sync {
    fn show(&self);
    fn hide(&self);
    fn set_html(&self, html: String);
    fn html(&self) -> String;

    fn clear(&self) {
        self.set_html(String::new());
    }
}

/// Visual state of the copy button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonState {
    #[default]
    Idle,
    /// Checkmark / success styling.
    Copied,
}

pub trait CopyButton: Send + Sync {
    fn set_state(&self, state: ButtonState);
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Blocking user notification.
pub trait Alerter: Send + Sync {
    fn alert(&self, message: &str);
}

/// Receives downloaded blobs.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Store `blob` under `filename`, returning where it went.
    async fn save(&self, filename: &str, blob: Bytes) -> std::io::Result<PathBuf>;
}

/// Everything the controller talks to.
#[derive(Clone)]
pub struct Ports {
    pub transport: Arc<dyn Transport>,
    pub loading: Arc<dyn LoadingIndicator>,
    pub results: Arc<dyn ResultsView>,
    pub copy_button: Arc<dyn CopyButton>,
    pub clipboard: Arc<dyn Clipboard>,
    pub alerter: Arc<dyn Alerter>,
    pub downloads: Arc<dyn DownloadSink>,
}

impl Ports {
    /// Wire every page-side port to one [`memory::MemoryPage`].
    pub fn with_page(
        transport: Arc<dyn Transport>,
        page: &Arc<memory::MemoryPage>,
        clipboard: Arc<dyn Clipboard>,
        downloads: Arc<dyn DownloadSink>,
    ) -> Self {
        Self {
            transport,
            loading: page.clone(),
            results: page.clone(),
            copy_button: page.clone(),
            clipboard,
            alerter: page.clone(),
            downloads,
        }
    }
}
