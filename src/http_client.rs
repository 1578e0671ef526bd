//! HTTP client for the conversion web application
//!
//! Features:
//! - Connection pooling with keep-alive
//! - TLS 1.3 via rustls
//! - Gzip / Brotli / Deflate decompression (auto-negotiated)
//! - Cookie store shared between page fetch and form posts
//! - Multipart form submission with files streamed from disk

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::Config;
use crate::error::SubmitError;
use crate::form::{FormPayload, PartValue};
use crate::ports::{HttpReply, Transport};

/// HTTP client bound to the web application's base URL.
pub struct FormClient {
    client: Client,
    base: Url,
}

impl FormClient {
    /// Create a client with default timeouts.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeouts(base_url, Duration::from_secs(10), Duration::from_secs(120))
    }

    /// Create a client from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeouts(&config.base_url, config.connect_timeout(), config.timeout())
    }

    pub fn with_timeouts(base_url: &str, connect_timeout: Duration, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("Invalid base URL '{base_url}'"))?;

        let client = Client::builder()
            // ═══════════════════════════════════════════════════════════════
            // CONNECTIONS
            // ═══════════════════════════════════════════════════════════════
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .use_rustls_tls()
            // ═══════════════════════════════════════════════════════════════
            // COMPRESSION (auto-negotiated via Accept-Encoding)
            // ═══════════════════════════════════════════════════════════════
            .brotli(true)
            .gzip(true)
            .deflate(true)
            // ═══════════════════════════════════════════════════════════════
            // TIMEOUTS
            // ═══════════════════════════════════════════════════════════════
            // Conversions of large documents can take a while.
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true)
            .build()?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a path such as `/api/text` against the base URL.
    pub fn resolve(&self, endpoint: &str) -> Result<Url, SubmitError> {
        self.base
            .join(endpoint)
            .map_err(|e| SubmitError::Transport(format!("Invalid endpoint '{endpoint}': {e}")))
    }

    /// Fetch the page that holds the forms.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, path: &str) -> Result<String> {
        let url = self.resolve(path)?;
        let response = self.client.get(url).send().await?.error_for_status()?;
        info!(status = %response.status(), "Page fetched");
        Ok(response.text().await?)
    }

    async fn multipart(payload: &FormPayload) -> Result<Form, SubmitError> {
        let mut form = Form::new();
        for (name, value) in &payload.parts {
            form = match value {
                PartValue::Text(text) => form.text(name.clone(), text.clone()),
                PartValue::File(path) => {
                    let bytes = tokio::fs::read(path).await.map_err(|e| {
                        SubmitError::Transport(format!("Failed to read '{}': {e}", path.display()))
                    })?;
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    form.part(name.clone(), Part::bytes(bytes).file_name(file_name))
                }
                PartValue::EmptyFile => form.part(
                    name.clone(),
                    Part::bytes(Vec::new())
                        .file_name(String::new())
                        .mime_str("application/octet-stream")?,
                ),
            };
        }
        Ok(form)
    }
}

#[async_trait]
impl Transport for FormClient {
    #[instrument(skip(self, payload), fields(parts = payload.len()))]
    async fn post(&self, endpoint: &str, payload: &FormPayload) -> Result<HttpReply, SubmitError> {
        let url = self.resolve(endpoint)?;
        let form = Self::multipart(payload).await?;
        debug!(%url, "Posting multipart form");

        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        // Only present when the server's phrase is not the canonical one.
        let reason = response
            .extensions()
            .get::<ReasonPhrase>()
            .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned());
        let body = response.bytes().await?;

        let reply = HttpReply::new(status, headers, body);
        Ok(match reason {
            Some(reason) => reply.with_status_text(reason),
            None => reply,
        })
    }
}
