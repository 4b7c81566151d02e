//! Launch description for the server process.

use std::path::PathBuf;

use camino::Utf8Path;

/// Transport mode requested by the host.
///
/// Both modes point at the same executable in this configuration; the split
/// exists so a debug build of the server can be substituted without touching
/// the session code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LaunchMode {
    /// Normal operation.
    #[default]
    Run,
    /// Debugging a server build.
    Debug,
}

/// Describes how to start the language server executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLaunch {
    run: LaunchCommand,
    debug: LaunchCommand,
    /// Working directory for the spawned process.
    pub working_dir: Option<PathBuf>,
}

/// One command line the launcher can execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    /// The executable path or command name.
    pub command: PathBuf,
    /// Arguments to pass to the server.
    pub args: Vec<String>,
}

impl ServerLaunch {
    /// Builds a launch description where both modes use the supplied path.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        let command = LaunchCommand {
            command: path.as_std_path().to_path_buf(),
            args: Vec::new(),
        };
        Self {
            run: command.clone(),
            debug: command,
            working_dir: None,
        }
    }

    /// Sets a custom working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Overrides the command used in debug mode.
    #[must_use]
    pub fn with_debug_command(mut self, command: impl Into<PathBuf>, args: Vec<String>) -> Self {
        self.debug = LaunchCommand {
            command: command.into(),
            args,
        };
        self
    }

    /// Returns the command line for the requested mode.
    #[must_use]
    pub fn command_for(&self, mode: LaunchMode) -> &LaunchCommand {
        match mode {
            LaunchMode::Run => &self.run,
            LaunchMode::Debug => &self.debug,
        }
    }
}
