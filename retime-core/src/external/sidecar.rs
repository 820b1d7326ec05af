// ============================================================================
// retime-core/src/external/sidecar.rs
// ============================================================================
//
// FFMPEG CONVERTER: Converter implementation backed by ffmpeg-sidecar
//
// Spawns `ffmpeg -hide_banner -y <args>`, drains its events on a reader
// thread and polls the child so a cancel request can kill it at any time.
//
// KEY COMPONENTS:
// - SidecarConverter: Converter that spawns ffmpeg
// - SidecarProcess: ConversionProcess wrapping the ffmpeg child
//
// AI-ASSISTANT-INFO: ffmpeg-sidecar backed converter with kill-on-cancel

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use crate::external::converter::{
    CancelHook, ConversionOutcome, ConversionOutput, ConversionProcess, ConversionRequest,
    Converter,
};
use crate::external::ffmpeg_builder::FfmpegCommandBuilder;
use crate::progress::ConversionProgressHandler;

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use log::{debug, error, info, warn};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often a running child is checked for exit or a kill request.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Concrete implementation of `Converter` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarConverter {
    ffmpeg_path: Option<String>,
}

impl SidecarConverter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the ffmpeg binary at `path` instead of the one on `PATH`.
    #[must_use]
    pub fn with_ffmpeg_path(path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: Some(path.into()),
        }
    }

    /// The binary this converter runs.
    #[must_use]
    pub fn program(&self) -> &str {
        self.ffmpeg_path.as_deref().unwrap_or("ffmpeg")
    }

    fn build_command(&self, request: &ConversionRequest) -> FfmpegCommand {
        let mut builder = FfmpegCommandBuilder::new();
        if let Some(path) = &self.ffmpeg_path {
            builder = builder.with_path(path);
        }
        let mut cmd = builder.build();
        cmd.args(&request.args);
        cmd
    }

    /// The exact program and arguments `convert` would spawn for `request`.
    #[must_use]
    pub fn command_line(&self, request: &ConversionRequest) -> Vec<String> {
        let mut cmd = self.build_command(request);
        let inner = cmd.as_inner();
        std::iter::once(inner.get_program())
            .chain(inner.get_args())
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

impl Converter for SidecarConverter {
    fn convert(&self, request: ConversionRequest) -> CoreResult<Box<dyn ConversionProcess>> {
        let mut cmd = self.build_command(&request);

        debug!("Running ffmpeg command: {cmd:?}");
        info!("{}: starting ffmpeg", request.progress_label);

        let mut child = cmd
            .spawn()
            .map_err(|e| command_start_error(self.program(), e))?;

        let events = match child.iter() {
            Ok(events) => events,
            Err(e) => {
                error!("Failed to get ffmpeg event iterator: {e}");
                // The child is useless without its event stream.
                let _ = child.kill();
                return Err(command_start_error(self.program(), io::Error::other(e.to_string())));
            }
        };

        let mut handler =
            ConversionProgressHandler::new(request.progress_label.clone(), request.duration_scale);
        let reader = thread::Builder::new()
            .name("ffmpeg-events".to_string())
            .spawn(move || {
                for event in events {
                    handler.handle_event(event);
                }
                handler
            });
        let reader = match reader {
            Ok(reader) => reader,
            Err(e) => {
                let _ = child.kill();
                return Err(e.into());
            }
        };

        Ok(Box::new(SidecarProcess {
            program: self.program().to_string(),
            label: request.progress_label.clone(),
            output_path: request.output_path().unwrap_or_default(),
            child,
            reader: Some(reader),
            kill_requested: Arc::new(AtomicBool::new(false)),
            started: Instant::now(),
        }))
    }
}

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `ConversionProcess`.
pub struct SidecarProcess {
    program: String,
    label: String,
    output_path: PathBuf,
    child: FfmpegChild,
    reader: Option<JoinHandle<ConversionProgressHandler>>,
    kill_requested: Arc<AtomicBool>,
    started: Instant,
}

impl SidecarProcess {
    /// Waits for the reader thread, returning the handler it filled.
    fn join_reader(&mut self) -> Option<ConversionProgressHandler> {
        let reader = self.reader.take()?;
        match reader.join() {
            Ok(handler) => Some(handler),
            Err(_) => {
                warn!("{}: ffmpeg event reader panicked", self.label);
                None
            }
        }
    }

    fn kill_and_reap(&mut self) -> CoreResult<ConversionOutcome> {
        info!("{}: terminating ffmpeg", self.label);
        if let Err(e) = self.child.kill() {
            // Already exited between the last poll and the kill.
            debug!("{}: kill failed: {e}", self.label);
        }
        let status = self
            .child
            .wait()
            .map_err(|e| command_wait_error(self.program.as_str(), e))?;
        self.join_reader();
        if status.success() {
            debug!("{}: ffmpeg finished before it could be stopped", self.label);
            return Ok(self.completed());
        }
        info!("{}: cancelled", self.label);
        Ok(ConversionOutcome::Cancelled)
    }

    fn completed(&self) -> ConversionOutcome {
        let elapsed = self.started.elapsed();
        info!(
            "{}: finished in {:.1}s -> {}",
            self.label,
            elapsed.as_secs_f64(),
            self.output_path.display()
        );
        ConversionOutcome::Completed(ConversionOutput {
            output_path: self.output_path.clone(),
            elapsed,
        })
    }
}

impl ConversionProcess for SidecarProcess {
    fn cancel_hook(&self) -> CancelHook {
        let flag = Arc::clone(&self.kill_requested);
        Box::new(move || flag.store(true, Ordering::SeqCst))
    }

    fn wait(&mut self) -> CoreResult<ConversionOutcome> {
        // An exit observed here wins over a kill request that arrived after it.
        let status = loop {
            match self.child.as_inner_mut().try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if self.kill_requested.load(Ordering::SeqCst) => {
                    return self.kill_and_reap();
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(command_wait_error(self.program.as_str(), e)),
            }
        };

        let handler = self.join_reader();

        if status.success() {
            return Ok(self.completed());
        }

        let stderr = handler
            .map(|h| h.stderr_buffer().trim_end().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "ffmpeg reported no error output".to_string());
        error!("{}: ffmpeg failed with {status}", self.label);
        Err(command_failed_error(self.program.as_str(), status, stderr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_defaults_to_path_lookup() {
        assert_eq!(SidecarConverter::new().program(), "ffmpeg");
        assert_eq!(
            SidecarConverter::with_ffmpeg_path("/opt/ffmpeg/bin/ffmpeg").program(),
            "/opt/ffmpeg/bin/ffmpeg"
        );
    }

    #[test]
    fn test_missing_binary_is_a_start_error() {
        let converter = SidecarConverter::with_ffmpeg_path("/definitely/not/here/ffmpeg");
        let request = ConversionRequest::new(
            vec!["-i".into(), "in.mp4".into(), "out.mp4".into()],
            "Slowing down",
        );
        match converter.convert(request) {
            Err(crate::error::CoreError::CommandStart(cmd, _)) => {
                assert_eq!(cmd, "/definitely/not/here/ffmpeg");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("spawning a missing binary should fail"),
        }
    }

    #[test]
    fn test_command_line_matches_spawned_argv() {
        let converter = SidecarConverter::with_ffmpeg_path("/opt/ffmpeg/bin/ffmpeg");
        let request = ConversionRequest::new(
            vec!["-i".into(), "in.mp4".into(), "out.mp4".into()],
            "Speeding up",
        );
        let line = converter.command_line(&request);

        assert_eq!(line[0], "/opt/ffmpeg/bin/ffmpeg");
        assert!(line.contains(&"-hide_banner".to_string()));
        assert!(line.contains(&"-y".to_string()));
        assert_eq!(&line[line.len() - 3..], ["-i", "in.mp4", "out.mp4"]);
    }

    #[cfg(unix)]
    mod fake_ffmpeg {
        use super::*;
        use crate::error::CoreError;
        use crate::task::ConversionTask;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        /// Writes an executable shell script standing in for ffmpeg.
        fn fake_ffmpeg(dir: &TempDir, body: &str) -> String {
            let path = dir.path().join("ffmpeg");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path.to_string_lossy().into_owned()
        }

        fn start(dir: &TempDir, body: &str) -> Box<dyn ConversionProcess> {
            let converter = SidecarConverter::with_ffmpeg_path(fake_ffmpeg(dir, body));
            let output = dir.path().join("out.mp4");
            let request = ConversionRequest::new(
                vec![
                    "-i".into(),
                    "in.mp4".into(),
                    output.to_string_lossy().into_owned(),
                ],
                "Slowing down",
            );
            converter.convert(request).unwrap()
        }

        #[test]
        fn test_successful_exit_completes() {
            let dir = TempDir::new().unwrap();
            let mut process = start(&dir, "exit 0");

            match process.wait().unwrap() {
                ConversionOutcome::Completed(output) => {
                    assert_eq!(output.output_path, dir.path().join("out.mp4"));
                }
                ConversionOutcome::Cancelled => panic!("expected completion"),
            }
        }

        #[test]
        fn test_cancel_kills_running_child() {
            let dir = TempDir::new().unwrap();
            let mut process = start(&dir, "exec sleep 30");
            let hook = process.cancel_hook();

            let started = Instant::now();
            let waiter = thread::spawn(move || process.wait());
            thread::sleep(Duration::from_millis(200));
            hook();

            let outcome = waiter.join().unwrap().unwrap();
            assert_eq!(outcome, ConversionOutcome::Cancelled);
            assert!(started.elapsed() < Duration::from_secs(10));
        }

        #[test]
        fn test_exit_before_cancel_stays_completed() {
            let dir = TempDir::new().unwrap();
            let task = ConversionTask::new("Slowing down", start(&dir, "exit 0"));

            // Let the child exit before the cancel request arrives.
            thread::sleep(Duration::from_millis(500));
            task.cancel();

            assert!(matches!(task.wait().unwrap(), ConversionOutcome::Completed(_)));
        }

        #[test]
        fn test_nonzero_exit_is_command_failed() {
            let dir = TempDir::new().unwrap();
            let mut process = start(&dir, "echo 'Invalid argument' >&2\nexit 1");

            match process.wait() {
                Err(CoreError::CommandFailed { cmd, status, stderr }) => {
                    assert!(cmd.ends_with("ffmpeg"));
                    assert_eq!(status.code(), Some(1));
                    assert!(!stderr.is_empty());
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }
}
