//! Configuration snapshots shared by the SATySFi toolchain integration.
//!
//! The host owns the settings store; this crate only describes the shape of
//! the snapshot the host hands over at startup and on every change
//! notification. Snapshots are immutable and re-read in full on each
//! notification, so none of the types here cache or watch anything.

mod defaults;
mod logging;
mod settings;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_SERVER_COMMAND, default_log_filter_string, default_server_path,
};
pub use logging::{LogFormat, LogFormatParseError, LogSettings};
pub use settings::{LanguageServerSettings, Settings, SettingsError};
