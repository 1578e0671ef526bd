//! `docform` - Headless client for the document-conversion web app
//!
//! # Features
//!
//! - **Form discovery**: finds every form and its `/api/<feature>` endpoint
//! - **Submission**: multipart posts carrying the activated submit control
//! - **Rendering**: metadata, text, markdown, image and table results as HTML
//! - **Downloads**: binary replies saved under their `Content-Disposition` name
//!
//! # Example
//!
//! ```rust,no_run
//! use docform::{ConversionResult, Renderer};
//!
//! let result = ConversionResult::from_json(br#"{"metadata":{"Author":"A"}}"#).unwrap();
//! let html = Renderer::default().render(&result);
//! assert!(html.contains("<td>A</td>"));
//! ```

pub mod catalog;
pub mod config;
pub mod controller;
pub mod disposition;
pub mod error;
pub mod form;
pub mod http_client;
pub mod images;
pub mod ports;
pub mod render;
pub mod result;

pub use config::Config;
pub use controller::{FormController, Outcome, Submission};
pub use disposition::{filename_from_disposition, DEFAULT_FILENAME};
pub use error::{ClipboardError, SubmitError};
pub use form::{endpoint_for, parse_field_args, FormPayload, PageForm, PartValue, Submitter};
pub use http_client::FormClient;
pub use ports::{HttpReply, Ports};
pub use render::{copy_text, ContentPolicy, Highlighter, Renderer};
pub use result::{ConversionResult, ImageItem, MetadataEntry, ResultKind};

/// Version of docform
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
