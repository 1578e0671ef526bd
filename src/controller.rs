//! The form submission controller.
//!
//! [`FormController`] owns the registered forms and the injected [`Ports`].
//! Each [`submit`](FormController::submit) is an independent future: many can
//! be in flight at once, and they share the loading overlay and results
//! panel with last-writer-wins semantics.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use docform::controller::{FormController, Submission};
//! use docform::form::PageForm;
//! use docform::ports::memory::{MemoryClipboard, MemoryDownloads, MemoryPage};
//! use docform::ports::Ports;
//! use docform::FormClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = Arc::new(FormClient::new("http://127.0.0.1:5000")?);
//! let page = Arc::new(MemoryPage::new());
//! let ports = Ports::with_page(
//!     client.clone(),
//!     &page,
//!     Arc::new(MemoryClipboard::new()),
//!     Arc::new(MemoryDownloads::new()),
//! );
//!
//! let forms = PageForm::parse_all(&client.fetch_page("/").await?)?;
//! let controller = FormController::new(ports, forms);
//! controller.submit("form-0", Submission::default()).await.ok();
//! println!("{}", page.snapshot().results_html);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::disposition::filename_from_disposition;
use crate::error::{ClipboardError, Result, SubmitError};
use crate::form::{PageForm, Submitter};
use crate::ports::{ButtonState, LoadingIndicator, Ports};
use crate::render::{copy_text, Renderer};
use crate::result::{error_message, ConversionResult};

/// Alert shown when the clipboard refuses a write.
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy to clipboard";

/// Default time the copy button stays in its "copied" state.
pub const DEFAULT_COPY_REVERT: Duration = Duration::from_secs(2);

/// User input for one submission.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    /// `name=value` pairs overriding the page's fields.
    pub fields: Vec<(String, String)>,
    /// Files for the form's file controls.
    pub files: Vec<(String, PathBuf)>,
    /// The submit control that was activated.
    pub submitter: Option<Submitter>,
}

/// What a successful submission produced.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A JSON result was rendered into the results panel.
    Rendered(ConversionResult),
    /// A binary response was handed to the download sink.
    Downloaded { filename: String, path: PathBuf },
}

/// Hides the overlay when dropped, whatever path the submission took.
struct OverlayGuard<'a>(&'a dyn LoadingIndicator);

impl Drop for OverlayGuard<'_> {
    fn drop(&mut self) {
        self.0.hide();
    }
}

pub struct FormController {
    forms: Vec<PageForm>,
    ports: Ports,
    renderer: Renderer,
    copy_revert: Duration,
    revert_task: Mutex<Option<JoinHandle<()>>>,
}

impl FormController {
    /// Register `forms` against the given ports.
    pub fn new(ports: Ports, forms: Vec<PageForm>) -> Self {
        for form in forms.iter().filter(|f| f.endpoint.is_none()) {
            warn!(form = %form.id, "Form has no feature field; it has no endpoint");
        }
        debug!(forms = forms.len(), "Forms registered");

        Self {
            forms,
            ports,
            renderer: Renderer::default(),
            copy_revert: DEFAULT_COPY_REVERT,
            revert_task: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    #[must_use]
    pub fn with_copy_revert(mut self, delay: Duration) -> Self {
        self.copy_revert = delay;
        self
    }

    pub fn forms(&self) -> &[PageForm] {
        &self.forms
    }

    /// Endpoint recorded for a form, if any.
    pub fn endpoint(&self, form_id: &str) -> Option<&str> {
        self.form(form_id).and_then(|f| f.endpoint.as_deref())
    }

    pub fn form(&self, form_id: &str) -> Option<&PageForm> {
        self.forms.iter().find(|f| f.id == form_id)
    }

    pub fn form_for_feature(&self, feature: &str) -> Option<&PageForm> {
        PageForm::find_by_feature(&self.forms, feature)
    }

    /// Hide the results panel and empty it.
    pub fn clear(&self) {
        self.ports.results.hide();
        self.ports.results.clear();
    }

    /// Submit a registered form.
    ///
    /// Errors are shown through the alerter and also returned. The loading
    /// overlay is hidden on every exit path, including when the future is
    /// dropped mid-flight.
    #[instrument(skip(self, submission))]
    pub async fn submit(&self, form_id: &str, submission: Submission) -> Result<Outcome> {
        self.ports.loading.show();
        let _overlay = OverlayGuard(self.ports.loading.as_ref());
        self.clear();

        let outcome = match self.form(form_id) {
            Some(form) => self.send(form, &submission).await,
            None => Err(SubmitError::UnknownForm(form_id.to_string())),
        };

        if let Err(err) = &outcome {
            warn!(error = %err, "Submission failed");
            self.ports.alerter.alert(&err.to_string());
        }
        outcome
    }

    async fn send(&self, form: &PageForm, submission: &Submission) -> Result<Outcome> {
        let endpoint = form
            .endpoint
            .as_deref()
            .ok_or_else(|| SubmitError::NoEndpoint {
                form: form.id.clone(),
            })?;

        let payload = form.payload(
            &submission.fields,
            &submission.files,
            submission.submitter.as_ref(),
        );
        debug!(endpoint, parts = payload.len(), "Posting form");

        let reply = self.ports.transport.post(endpoint, &payload).await?;
        info!(
            status = %reply.status,
            content_type = ?reply.content_type(),
            bytes = reply.body.len(),
            "Response received"
        );

        if !reply.status.is_success() {
            return Err(if reply.is_json() {
                SubmitError::Server {
                    status: reply.status,
                    message: error_message(&reply.body)?,
                }
            } else {
                match reply.status_text.as_deref() {
                    Some(text) => SubmitError::from_status_text(reply.status, text),
                    None => SubmitError::from_status(reply.status),
                }
            });
        }

        if reply.is_json() {
            let result = ConversionResult::from_json(&reply.body)?;
            debug!(kind = %result.kind(), "Rendering result");
            self.ports.results.set_html(self.renderer.render(&result));
            self.ports.results.show();
            return Ok(Outcome::Rendered(result));
        }

        let filename = filename_from_disposition(reply.content_disposition());
        let path = self
            .ports
            .downloads
            .save(&filename, reply.body)
            .await
            .map_err(|source| SubmitError::Download {
                filename: filename.clone(),
                source,
            })?;
        Ok(Outcome::Downloaded { filename, path })
    }

    /// Copy the rendered result to the clipboard.
    ///
    /// Returns `Ok(false)` when there is nothing to copy. On success the copy
    /// button shows its "copied" state until the revert delay elapses; a new
    /// copy restarts the delay.
    pub async fn copy(&self) -> Result<bool, ClipboardError> {
        let text = copy_text(&self.ports.results.html());
        if text.is_empty() {
            return Ok(false);
        }

        match self.ports.clipboard.write_text(&text).await {
            Ok(()) => {
                self.flash_copied();
                Ok(true)
            }
            Err(err) => {
                error!(error = %err, "Failed to copy");
                self.ports.alerter.alert(COPY_FAILED_MESSAGE);
                Err(err)
            }
        }
    }

    fn flash_copied(&self) {
        let button = self.ports.copy_button.clone();
        button.set_state(ButtonState::Copied);

        let deadline = tokio::time::Instant::now() + self.copy_revert;
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            button.set_state(ButtonState::Idle);
        });

        let previous = self
            .revert_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        let pending = self
            .revert_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = pending {
            if !task.is_finished() {
                task.abort();
                self.ports.copy_button.set_state(ButtonState::Idle);
            }
        }
    }
}
