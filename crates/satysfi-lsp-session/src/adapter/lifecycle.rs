//! Termination handling for the server child process.

use std::process::Child;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

/// Log target for adapter operations.
pub(super) const ADAPTER_TARGET: &str = "satysfi_lsp_session::adapter";

/// Grace period before a lingering child is killed.
const EXIT_GRACE: Duration = Duration::from_millis(200);

/// Terminates a child process, preferring a clean exit.
///
/// Checks whether the child has already exited (it normally has, after the
/// `shutdown`/`exit` exchange), allows one short grace period, then kills.
/// Never blocks longer than the grace period, so teardown cannot hang on an
/// unresponsive server.
pub(super) fn terminate_child(child: &mut Child) {
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(target: ADAPTER_TARGET, ?status, "language server exited");
        }
        Ok(None) => {
            warn!(
                target: ADAPTER_TARGET,
                "language server still running, waiting before killing"
            );
            wait_then_kill(child);
        }
        Err(error) => {
            warn!(
                target: ADAPTER_TARGET,
                error = %error,
                "failed to check process status, waiting before killing"
            );
            wait_then_kill(child);
        }
    }
}

fn wait_then_kill(child: &mut Child) {
    thread::sleep(EXIT_GRACE);
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(
                target: ADAPTER_TARGET,
                ?status,
                "language server exited during grace period"
            );
        }
        Ok(None) | Err(_) => {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
