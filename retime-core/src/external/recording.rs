// retime-core/src/external/recording.rs

// --- Recording converter ---
//
// A converter that never spawns anything. It records every request it
// receives and counts how often a cancel hook fired. Hosts use it for dry
// runs; tests use it to inspect the arguments a service produced.

use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::converter::{
    CancelHook, ConversionOutcome, ConversionOutput, ConversionProcess, ConversionRequest,
    Converter,
};

use log::info;
use std::process::ExitStatus;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// What processes started by a [`RecordingConverter`] do.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecordedBehavior {
    /// `wait` returns `Completed` immediately.
    #[default]
    Complete,
    /// `convert` itself fails as if the tool could not be started.
    FailToStart,
    /// `wait` fails as if the tool exited with an error, carrying this stderr.
    FailOnWait(String),
    /// `wait` blocks until the cancel hook fires, then returns `Cancelled`.
    BlockUntilCancelled,
}

/// Converter that records requests instead of running them.
#[derive(Clone, Default)]
pub struct RecordingConverter {
    behavior: RecordedBehavior,
    requests: Arc<Mutex<Vec<ConversionRequest>>>,
    cancel_calls: Arc<AtomicUsize>,
}

impl RecordingConverter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_behavior(behavior: RecordedBehavior) -> Self {
        Self {
            behavior,
            ..Self::default()
        }
    }

    /// All requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<ConversionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent request, if any.
    #[must_use]
    pub fn last_request(&self) -> Option<ConversionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// How many times a cancel hook of any started process fired.
    #[must_use]
    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }
}

impl Converter for RecordingConverter {
    fn convert(&self, request: ConversionRequest) -> CoreResult<Box<dyn ConversionProcess>> {
        info!(
            "{}: recorded ffmpeg {}",
            request.progress_label,
            request.args.join(" ")
        );
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if self.behavior == RecordedBehavior::FailToStart {
            return Err(CoreError::CommandStart(
                "ffmpeg (recorded)".to_string(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "recorded start failure"),
            ));
        }

        let (cancel_tx, cancel_rx) = mpsc::channel();
        Ok(Box::new(RecordedProcess {
            behavior: self.behavior.clone(),
            output_path: request.output_path().unwrap_or_default(),
            cancel_calls: Arc::clone(&self.cancel_calls),
            cancel_tx,
            cancel_rx,
        }))
    }
}

struct RecordedProcess {
    behavior: RecordedBehavior,
    output_path: std::path::PathBuf,
    cancel_calls: Arc<AtomicUsize>,
    cancel_tx: Sender<()>,
    cancel_rx: Receiver<()>,
}

impl ConversionProcess for RecordedProcess {
    fn cancel_hook(&self) -> CancelHook {
        let calls = Arc::clone(&self.cancel_calls);
        let tx = self.cancel_tx.clone();
        Box::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            // The process may already be gone; nothing to stop then.
            let _ = tx.send(());
        })
    }

    fn wait(&mut self) -> CoreResult<ConversionOutcome> {
        match &self.behavior {
            RecordedBehavior::Complete | RecordedBehavior::FailToStart => {
                Ok(ConversionOutcome::Completed(ConversionOutput {
                    output_path: self.output_path.clone(),
                    elapsed: Duration::ZERO,
                }))
            }
            RecordedBehavior::FailOnWait(stderr) => Err(command_failed_error(
                "ffmpeg (recorded)",
                ExitStatus::default(),
                stderr.clone(),
            )),
            RecordedBehavior::BlockUntilCancelled => {
                // Our own sender keeps the channel open, so this only returns on a hook call.
                let _ = self.cancel_rx.recv();
                Ok(ConversionOutcome::Cancelled)
            }
        }
    }
}
