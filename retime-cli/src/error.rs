// ============================================================================
// retime-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result alias and exit codes
//
// The CLI reports errors with the core library's `CoreError`, so failures
// from ffmpeg reach the user unchanged.

use retime_core::{CoreError, CoreResult};

use std::process::ExitCode;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Exit code used when a conversion is cancelled with Ctrl+C.
pub const EXIT_CANCELLED: u8 = 130;

/// Prints the error and maps it to a failing exit code.
pub fn report_error(err: &CoreError) -> ExitCode {
    log::debug!("Command failed: {err:?}");
    eprintln!("Error: {err}");
    ExitCode::FAILURE
}
