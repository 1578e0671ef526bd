//! In-process port implementations.
//!
//! [`MemoryPage`] stands in for the page widgets and records every change so
//! callers can inspect what a user would have seen.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;

use super::{Alerter, ButtonState, Clipboard, CopyButton, DownloadSink, LoadingIndicator, ResultsView};
use crate::error::ClipboardError;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Observable page state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    pub overlay_visible: bool,
    /// How many times the overlay was shown.
    pub overlay_shows: usize,
    pub results_visible: bool,
    pub results_html: String,
    pub button: ButtonState,
    /// Every state the copy button went through, in order.
    pub button_history: Vec<ButtonState>,
    pub alerts: Vec<String>,
}

/// Loading overlay, results panel, copy button and alert log in one place.
#[derive(Debug, Default)]
pub struct MemoryPage {
    state: Mutex<PageState>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PageState {
        lock(&self.state).clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        lock(&self.state).alerts.clone()
    }

    pub fn button(&self) -> ButtonState {
        lock(&self.state).button
    }
}

impl LoadingIndicator for MemoryPage {
    fn show(&self) {
        let mut state = lock(&self.state);
        state.overlay_visible = true;
        state.overlay_shows += 1;
    }

    fn hide(&self) {
        lock(&self.state).overlay_visible = false;
    }
}

impl ResultsView for MemoryPage {
    fn show(&self) {
        lock(&self.state).results_visible = true;
    }

    fn hide(&self) {
        lock(&self.state).results_visible = false;
    }

    fn set_html(&self, html: String) {
        lock(&self.state).results_html = html;
    }

    fn html(&self) -> String {
        lock(&self.state).results_html.clone()
    }
}

impl CopyButton for MemoryPage {
    fn set_state(&self, button: ButtonState) {
        let mut state = lock(&self.state);
        state.button = button;
        state.button_history.push(button);
    }
}

impl Alerter for MemoryPage {
    fn alert(&self, message: &str) {
        lock(&self.state).alerts.push(message.to_string());
    }
}

/// Clipboard backed by a string; can be told to refuse writes.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    deny: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose writes fail with `reason`.
    pub fn denying(reason: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(None),
            deny: Mutex::new(Some(reason.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        lock(&self.contents).clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if let Some(reason) = lock(&self.deny).clone() {
            return Err(ClipboardError::Denied(reason));
        }
        *lock(&self.contents) = Some(text.to_string());
        Ok(())
    }
}

/// Keeps downloaded blobs in memory.
#[derive(Debug, Default)]
pub struct MemoryDownloads {
    files: Mutex<Vec<(String, Bytes)>>,
}

impl MemoryDownloads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> Vec<(String, Bytes)> {
        lock(&self.files).clone()
    }
}

#[async_trait]
impl DownloadSink for MemoryDownloads {
    async fn save(&self, filename: &str, blob: Bytes) -> std::io::Result<PathBuf> {
        lock(&self.files).push((filename.to_string(), blob));
        Ok(PathBuf::from(filename))
    }
}
