// ============================================================================
// retime-core/src/external/converter.rs
// ============================================================================
//
// CONVERTER CAPABILITY: Abstraction over the external conversion tool
//
// The edit services never spawn ffmpeg directly. They hand an argument list
// and a progress label to a `Converter`, which starts the work and returns a
// `ConversionProcess`. The process exposes two things: a cancel hook that can
// be fired from any thread, and a blocking `wait`.
//
// KEY COMPONENTS:
// - ConversionRequest: arguments, progress label, duration hint
// - Converter: "start" half of the capability
// - ConversionProcess: "cancel" + completion half of the capability
// - ConversionOutcome / ConversionOutput: what a finished process yields
//
// AI-ASSISTANT-INFO: Converter traits injected into the edit services

use crate::error::CoreResult;

use std::path::PathBuf;
use std::time::Duration;

/// Callback that asks a running process to terminate.
pub type CancelHook = Box<dyn FnOnce() + Send + 'static>;

/// Everything a converter needs to start one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Arguments for the tool, input and output paths included.
    pub args: Vec<String>,
    /// Human-readable label shown alongside progress, e.g. "Slowing down".
    pub progress_label: String,
    /// Expected output duration divided by input duration.
    ///
    /// Only used to turn ffmpeg's output timestamps into a percentage.
    pub duration_scale: f64,
}

impl ConversionRequest {
    #[must_use]
    pub fn new(args: Vec<String>, progress_label: impl Into<String>) -> Self {
        Self {
            args,
            progress_label: progress_label.into(),
            duration_scale: 1.0,
        }
    }

    #[must_use]
    pub fn with_duration_scale(mut self, scale: f64) -> Self {
        self.duration_scale = scale;
        self
    }

    /// The output path, which by ffmpeg convention is the last argument.
    #[must_use]
    pub fn output_path(&self) -> Option<PathBuf> {
        self.args.last().map(PathBuf::from)
    }
}

/// Result of a conversion that ran to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutput {
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

/// How a conversion ended. Failures are reported through `CoreError` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Completed(ConversionOutput),
    Cancelled,
}

impl ConversionOutcome {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConversionOutcome::Cancelled)
    }

    #[must_use]
    pub fn output(&self) -> Option<&ConversionOutput> {
        match self {
            ConversionOutcome::Completed(output) => Some(output),
            ConversionOutcome::Cancelled => None,
        }
    }
}

/// A started conversion.
pub trait ConversionProcess: Send {
    /// Returns a hook that requests termination of this process.
    ///
    /// The hook must be safe to fire from another thread while `wait` blocks,
    /// and firing it after the process finished must be harmless.
    fn cancel_hook(&self) -> CancelHook;

    /// Blocks until the process ends.
    ///
    /// Returns `Cancelled` when the process was terminated through its hook.
    fn wait(&mut self) -> CoreResult<ConversionOutcome>;
}

/// Something that can start conversions.
pub trait Converter {
    fn convert(&self, request: ConversionRequest) -> CoreResult<Box<dyn ConversionProcess>>;
}

impl<C: Converter + ?Sized> Converter for &C {
    fn convert(&self, request: ConversionRequest) -> CoreResult<Box<dyn ConversionProcess>> {
        (**self).convert(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = ConversionRequest::new(
            vec!["-i".into(), "in.mp4".into(), "out.mp4".into()],
            "Slowing down",
        );
        assert_eq!(request.duration_scale, 1.0);
        assert_eq!(request.output_path(), Some(PathBuf::from("out.mp4")));
    }

    #[test]
    fn test_request_without_args_has_no_output() {
        let request = ConversionRequest::new(Vec::new(), "Speeding up").with_duration_scale(0.5);
        assert_eq!(request.output_path(), None);
        assert_eq!(request.duration_scale, 0.5);
    }

    #[test]
    fn test_outcome_accessors() {
        let done = ConversionOutcome::Completed(ConversionOutput {
            output_path: PathBuf::from("out.mp4"),
            elapsed: Duration::from_secs(1),
        });
        assert!(!done.is_cancelled());
        assert_eq!(done.output().unwrap().output_path, PathBuf::from("out.mp4"));
        assert!(ConversionOutcome::Cancelled.is_cancelled());
        assert!(ConversionOutcome::Cancelled.output().is_none());
    }
}
