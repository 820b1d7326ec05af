//! Cancellable conversion tasks.
//!
//! A [`ConversionTask`] wraps one started [`ConversionProcess`] together with
//! a [`CancellationToken`]. The task registers the process's cancel hook on
//! the token when it is created, so a cancel request from any clone of the
//! token reaches the process exactly once.

use crate::error::CoreResult;
use crate::external::{CancelHook, ConversionOutcome, ConversionProcess};

use log::{debug, info};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct TokenState {
    cancelled: AtomicBool,
    hook: Mutex<Option<CancelHook>>,
}

impl TokenState {
    fn hook_slot(&self) -> MutexGuard<'_, Option<CancelHook>> {
        self.hook.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shared, thread-safe cancellation flag with a single cancel hook.
///
/// Cloning yields another handle to the same token.
#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Arc<TokenState>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the hook fired on cancellation.
    ///
    /// If the token is already cancelled the hook runs immediately. A second
    /// registration replaces a hook that has not fired yet.
    pub fn on_cancel(&self, hook: CancelHook) {
        let mut slot = self.inner.hook_slot();
        if self.inner.cancelled.load(Ordering::SeqCst) {
            drop(slot);
            hook();
            return;
        }
        if slot.replace(hook).is_some() {
            debug!("Replacing previously registered cancel hook");
        }
    }

    /// Requests cancellation. Only the first call fires the hook.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        let hook = self.inner.hook_slot().take();
        if let Some(hook) = hook {
            hook();
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// A running conversion that can be waited on or cancelled.
pub struct ConversionTask {
    label: String,
    process: Box<dyn ConversionProcess>,
    token: CancellationToken,
}

impl ConversionTask {
    /// Wraps a started process and wires its cancel hook to a fresh token.
    pub fn new(label: impl Into<String>, process: Box<dyn ConversionProcess>) -> Self {
        let token = CancellationToken::new();
        token.on_cancel(process.cancel_hook());
        Self {
            label: label.into(),
            process,
            token,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// A handle that can cancel this task from another thread.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        info!("{}: cancellation requested", self.label);
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Blocks until the process ends.
    ///
    /// A process that still completed successfully reports `Completed` even if
    /// a cancel request arrived too late to stop it. Any other ending after a
    /// cancel request reports `Cancelled`.
    pub fn wait(mut self) -> CoreResult<ConversionOutcome> {
        let result = self.process.wait();
        if !self.token.is_cancelled() {
            return result;
        }
        match result {
            Ok(ConversionOutcome::Completed(output)) => {
                debug!("{}: finished before cancellation took effect", self.label);
                Ok(ConversionOutcome::Completed(output))
            }
            Ok(ConversionOutcome::Cancelled) => Ok(ConversionOutcome::Cancelled),
            Err(e) => {
                debug!("{}: process ended after cancellation: {e}", self.label);
                Ok(ConversionOutcome::Cancelled)
            }
        }
    }
}

impl fmt::Debug for ConversionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionTask")
            .field("label", &self.label)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}
