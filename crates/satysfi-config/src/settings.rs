//! Settings snapshot types mirroring the host configuration schema.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::defaults::default_server_path;
use crate::logging::LogSettings;

/// Snapshot of the `languageServer.*` keys from the host settings.
///
/// The snapshot is immutable; the host re-reads the settings store and hands
/// over a fresh value on every change notification.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageServerSettings {
    /// Whether a language server session should be kept running.
    pub enabled: bool,
    /// Path to the server executable, absolute or resolvable via `PATH`.
    pub path: Utf8PathBuf,
}

impl Default for LanguageServerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_server_path(),
        }
    }
}

impl LanguageServerSettings {
    /// Builds a snapshot from explicit values.
    #[must_use]
    pub fn new(enabled: bool, path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            enabled,
            path: path.into(),
        }
    }

    /// Checks that the snapshot can describe a launchable server.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::EmptyServerPath`] when the configured path is
    /// blank; spawning would otherwise fail with an unhelpful OS error.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.path.as_str().trim().is_empty() {
            return Err(SettingsError::EmptyServerPath);
        }
        Ok(())
    }
}

/// Top-level settings snapshot handed over by the host.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Language server session keys.
    pub language_server: LanguageServerSettings,
    /// Ambient logging keys.
    pub log: LogSettings,
}

/// Errors raised while validating a settings snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// `languageServer.path` was present but blank.
    #[error("languageServer.path is empty; configure the server executable")]
    EmptyServerPath,
}
