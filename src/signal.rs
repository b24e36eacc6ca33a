//! Cooperative cancellation and Ctrl+C handling.
//!
//! A scan is cancelled by flipping a [`CancellationToken`] from outside the
//! scanning thread. The scanner polls the token at defined checkpoints (see
//! [`crate::duplicates::CancelCheckpoints`]); nothing is ever interrupted
//! preemptively.
//!
//! # Usage
//!
//! ```rust,no_run
//! use dupemgr::signal::install_handler;
//!
//! // Ctrl+C now cancels the returned token
//! let token = install_handler().expect("Failed to install signal handler");
//!
//! // Pass a clone to the scanner, keep one to cancel from elsewhere
//! let for_scanner = token.clone();
//! # let _ = for_scanner;
//! if token.is_cancelled() {
//!     println!("Cancelled, cleaning up...");
//! }
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Exit code for SIGINT (Ctrl+C) interruption.
/// This follows Unix convention: 128 + signal number (SIGINT = 2).
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared cancellation flag.
///
/// Clones share the same underlying flag, so one clone can be handed to a
/// background scan while another stays with the caller.
///
/// # Thread Safety
///
/// `CancellationToken` is `Send` and `Sync`; the flag uses atomic
/// operations.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Observed at the next checkpoint.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clear the flag so the token can drive another scan.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_TOKEN: OnceLock<CancellationToken> = OnceLock::new();

/// Install a Ctrl+C handler that cancels the returned token.
///
/// Only one handler can exist per process. Later calls reset and return
/// the token registered by the first call. If another part of the process
/// already owns the Ctrl+C hook, an unhooked token is returned instead; it
/// still works for manual [`CancellationToken::cancel`] calls.
///
/// # Errors
///
/// Currently always succeeds; the `Result` is kept so callers handle a
/// future failure mode without an API change.
pub fn install_handler() -> Result<CancellationToken, SignalError> {
    if let Some(token) = GLOBAL_TOKEN.get() {
        token.reset();
        return Ok(token.clone());
    }

    let token = CancellationToken::new();
    let hook = token.clone();

    match ctrlc::set_handler(move || {
        hook.cancel();

        let _ = writeln!(std::io::stderr(), "\nInterrupted. Finishing current step...");
        let _ = std::io::stderr().flush();

        log::info!("Cancellation signal received");
    }) {
        Ok(()) => {
            let _ = GLOBAL_TOKEN.set(token.clone());
            Ok(token)
        }
        Err(e) => {
            log::debug!("Ctrl+C handler unavailable ({}), using unhooked token", e);
            let fallback = GLOBAL_TOKEN.get_or_init(CancellationToken::new).clone();
            fallback.reset();
            Ok(fallback)
        }
    }
}
