// ============================================================================
// retime-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for retime-core
//
// This module defines the error types and result aliases used throughout the
// library. Conversion failures from ffmpeg are carried through unchanged so the
// host sees exactly what the external tool reported.
//
// KEY COMPONENTS:
// - CoreError: Main error enum
// - CoreResult: Type alias for Result<T, CoreError>
// - Helper functions for building command errors
//
// Cancellation is deliberately absent here: a cancelled conversion finishes
// with `ConversionOutcome::Cancelled`, not with an error.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by the edit services, the converter and the config store.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Required external command '{0}' not found or failed to execute.")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("Failed to wait for command '{0}': {1}")]
    CommandWait(String, io::Error),

    #[error("Command '{cmd}' failed with status {status}. Stderr: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown edit service: {0}")]
    UnknownService(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for retime-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a `CommandStart` error for the named command.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a `CommandWait` error for the named command.
pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

/// Builds a `CommandFailed` error carrying the exit status and collected stderr.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = CoreError::Config("slowDownPercent must be a number".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: slowDownPercent must be a number"
        );
    }

    #[test]
    fn test_command_start_error_keeps_source() {
        let err = command_start_error(
            "ffmpeg",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        match err {
            CoreError::CommandStart(cmd, source) => {
                assert_eq!(cmd, "ffmpeg");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_io_error_converts() {
        fn read() -> CoreResult<()> {
            Err(io::Error::other("disk gone"))?
        }
        assert!(matches!(read(), Err(CoreError::Io(_))));
    }
}
