//! Default values applied when the host settings omit a key.

use camino::Utf8PathBuf;

/// Default log filter expression used by embedders.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Command name used when `languageServer.path` is not configured.
///
/// A bare command name defers resolution to `PATH` at spawn time.
pub const DEFAULT_SERVER_COMMAND: &str = "satysfi-language-server";

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default server executable path.
#[must_use]
pub fn default_server_path() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_SERVER_COMMAND)
}
