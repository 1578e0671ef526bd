//! Client configuration loaded from `~/.config/docform/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::render::ContentPolicy;

/// Settings shared by the library and the CLI.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Web application root; endpoints are resolved against it.
    pub base_url: String,
    /// Where downloaded attachments are written.
    pub download_dir: PathBuf,
    /// Escaping applied to server strings in rendered HTML.
    pub content_policy: ContentPolicy,
    /// How long the copy button keeps its "copied" state.
    pub copy_revert_ms: u64,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            download_dir: PathBuf::from("."),
            content_policy: ContentPolicy::Trusted,
            copy_revert_ms: 2000,
            connect_timeout_secs: 10,
            timeout_secs: 120,
        }
    }
}

impl Config {
    /// Load the user config, or defaults when the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    pub fn copy_revert(&self) -> Duration {
        Duration::from_millis(self.copy_revert_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docform")
        .join("config.toml")
}
