// ============================================================================
// retime-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with the ffmpeg conversion tool
//
// This module encapsulates everything that touches the external conversion
// tool. The edit services only see the `Converter` / `ConversionProcess`
// traits; the ffmpeg-sidecar implementation and the recording converter are
// interchangeable behind them.
//
// KEY COMPONENTS:
// - Converter traits and request/outcome types
// - SidecarConverter: spawns ffmpeg through ffmpeg-sidecar
// - RecordingConverter: records requests for dry runs and tests
// - FilterGraph / FfmpegCommandBuilder: argument construction helpers
// - Dependency checking
//
// AI-ASSISTANT-INFO: External tool interactions and abstractions for ffmpeg

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Converter capability: traits, requests and outcomes
pub mod converter;

/// Builders for ffmpeg commands and filter graphs
pub mod ffmpeg_builder;

/// Converter that records requests instead of running them
pub mod recording;

/// Converter backed by ffmpeg-sidecar
pub mod sidecar;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use converter::{
    CancelHook, ConversionOutcome, ConversionOutput, ConversionProcess, ConversionRequest,
    Converter,
};
pub use ffmpeg_builder::{FfmpegCommandBuilder, FilterGraph};
pub use recording::{RecordedBehavior, RecordingConverter};
pub use sidecar::{SidecarConverter, SidecarProcess};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// Runs the command with `-version` and discards its output.
///
/// # Returns
///
/// * `Ok(())` - If the command could be started
/// * `Err(CoreError::DependencyNotFound)` - If the command is not found
/// * `Err(CoreError::CommandStart)` - If the command exists but fails to start
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                log::warn!("Dependency '{}' not found.", cmd_name);
                Err(CoreError::DependencyNotFound(cmd_name.to_string()))
            } else {
                log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
                Err(CoreError::CommandStart(cmd_name.to_string(), e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dependency_missing() {
        let result = check_dependency("retime-surely-missing-binary");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(name)) if name == "retime-surely-missing-binary"));
    }
}
