//! `FFmpeg` progress handler
//!
//! Turns ffmpeg-sidecar events into log output for a running conversion and
//! keeps the error lines ffmpeg printed so a failed run can report them.

use crate::utils::{format_duration, parse_ffmpeg_time};

use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress, LogLevel as FfmpegLogLevel};
use std::time::Instant;

/// Log target used for progress lines.
pub const PROGRESS_TARGET: &str = "retime::progress";

/// Progress is logged each time it crosses another step of this many percent.
const LOG_STEP_PERCENT: i32 = 10;

/// Handler for `FFmpeg` progress events
pub struct ConversionProgressHandler {
    label: String,
    duration_scale: f64,
    expected_duration: Option<f64>,
    start_time: Instant,
    last_logged_step: i32,
    stderr_buffer: String,
}

impl ConversionProgressHandler {
    /// Creates a handler for a conversion shown as `label`.
    ///
    /// `duration_scale` is the expected output duration over the input
    /// duration; ffmpeg reports output time, so percentages are computed
    /// against the scaled input duration.
    #[must_use]
    pub fn new(label: impl Into<String>, duration_scale: f64) -> Self {
        Self {
            label: label.into(),
            duration_scale,
            expected_duration: None,
            start_time: Instant::now(),
            last_logged_step: -1,
            stderr_buffer: String::new(),
        }
    }

    /// Handles an `FFmpeg` event
    pub fn handle_event(&mut self, event: FfmpegEvent) {
        match event {
            FfmpegEvent::ParsedDuration(duration) => {
                // Only the first input's duration drives the percentage.
                if self.expected_duration.is_none() {
                    self.expected_duration = Some(duration.duration * self.duration_scale);
                }
            }
            FfmpegEvent::Progress(progress) => self.handle_progress(&progress),
            FfmpegEvent::Log(level, message) => self.handle_log(&level, &message),
            FfmpegEvent::Error(error) => self.handle_error(&error),
            _ => {}
        }
    }

    /// Gets the accumulated stderr buffer
    #[must_use]
    pub fn stderr_buffer(&self) -> &str {
        &self.stderr_buffer
    }

    /// Expected output duration in seconds, once ffmpeg reported the input's.
    #[must_use]
    pub fn expected_duration(&self) -> Option<f64> {
        self.expected_duration
    }

    /// Percent complete for the given output time, if the duration is known.
    #[must_use]
    pub fn percent_for(&self, current_secs: f64) -> Option<f64> {
        self.expected_duration
            .filter(|&d| d > 0.0)
            .map(|d| (current_secs / d * 100.0).clamp(0.0, 100.0))
    }

    fn handle_progress(&mut self, progress: &FfmpegProgress) {
        let current_secs = parse_ffmpeg_time(&progress.time).unwrap_or(0.0);

        let Some(percent) = self.percent_for(current_secs) else {
            log::debug!(
                target: PROGRESS_TARGET,
                "{}: {} | Speed: {:.2}x",
                self.label,
                format_duration(current_secs),
                progress.speed
            );
            return;
        };

        let step = (percent as i32 / LOG_STEP_PERCENT) * LOG_STEP_PERCENT;
        if step > self.last_logged_step {
            log::info!(
                target: PROGRESS_TARGET,
                "{}: {:.1}% | Time: {} / {} | Speed: {:.2}x | Elapsed: {}",
                self.label,
                percent,
                format_duration(current_secs),
                format_duration(self.expected_duration.unwrap_or(0.0)),
                progress.speed,
                format_duration(self.start_time.elapsed().as_secs_f64())
            );
            self.last_logged_step = step;
        }
    }

    fn handle_log(&mut self, level: &FfmpegLogLevel, message: &str) {
        let log_level = map_ffmpeg_log_level(level);
        if log_level == log::Level::Info {
            log::debug!(target: "ffmpeg_log", "{message}");
        } else {
            log::log!(target: "ffmpeg_log", log_level, "{message}");
        }
        if matches!(level, FfmpegLogLevel::Fatal | FfmpegLogLevel::Error) {
            self.push_stderr(message);
        }
    }

    fn handle_error(&mut self, error: &str) {
        log::debug!("ffmpeg error event: {error}");
        self.push_stderr(error);
    }

    fn push_stderr(&mut self, line: &str) {
        self.stderr_buffer.push_str(line);
        self.stderr_buffer.push('\n');
    }
}

/// Maps `FFmpeg` log level to Rust log level
fn map_ffmpeg_log_level(level: &FfmpegLogLevel) -> log::Level {
    match level {
        FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => log::Level::Error,
        FfmpegLogLevel::Warning => log::Level::Warn,
        FfmpegLogLevel::Info => log::Level::Info,
        _ => log::Level::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffmpeg_sidecar::event::FfmpegDuration;

    #[test]
    fn test_percent_unknown_without_duration() {
        let handler = ConversionProgressHandler::new("Slowing down", 2.0);
        assert_eq!(handler.expected_duration(), None);
        assert_eq!(handler.percent_for(10.0), None);
    }

    fn duration_event(seconds: f64) -> FfmpegEvent {
        FfmpegEvent::ParsedDuration(FfmpegDuration {
            input_index: 0,
            duration: seconds,
            raw_log_message: String::new(),
        })
    }

    fn progress_event(time: &str) -> FfmpegEvent {
        FfmpegEvent::Progress(FfmpegProgress {
            frame: 100,
            fps: 30.0,
            q: 0.0,
            size_kb: 1024,
            time: time.to_string(),
            bitrate_kbps: 2457.6,
            speed: 1.0,
            raw_log_message: String::new(),
        })
    }

    #[test]
    fn test_expected_duration_is_scaled() {
        // A 0.5 slow-down doubles the output duration.
        let mut handler = ConversionProgressHandler::new("Slowing down", 2.0);
        handler.handle_event(duration_event(30.0));
        assert_eq!(handler.expected_duration(), Some(60.0));

        // Only the first input counts.
        handler.handle_event(duration_event(5.0));
        assert_eq!(handler.expected_duration(), Some(60.0));

        assert_eq!(handler.percent_for(15.0), Some(25.0));
    }

    #[test]
    fn test_percent_is_clamped() {
        let mut handler = ConversionProgressHandler::new("Speeding up", 0.5);
        handler.handle_event(duration_event(40.0));

        assert_eq!(handler.percent_for(-3.0), Some(0.0));
        assert_eq!(handler.percent_for(25.0), Some(100.0));
    }

    #[test]
    fn test_progress_logged_in_ten_percent_steps() {
        let mut handler = ConversionProgressHandler::new("Speeding up", 0.5);
        handler.handle_event(duration_event(200.0));
        assert_eq!(handler.last_logged_step, -1);

        handler.handle_event(progress_event("00:00:01.00"));
        assert_eq!(handler.last_logged_step, 0);

        handler.handle_event(progress_event("00:00:10.50"));
        assert_eq!(handler.last_logged_step, 10);

        // 15% stays within the step already logged.
        handler.handle_event(progress_event("00:00:15.00"));
        assert_eq!(handler.last_logged_step, 10);

        handler.handle_event(progress_event("00:01:40.00"));
        assert_eq!(handler.last_logged_step, 100);
    }

    #[test]
    fn test_progress_without_duration_logs_no_steps() {
        let mut handler = ConversionProgressHandler::new("Slowing down", 2.0);
        handler.handle_event(progress_event("00:00:10.00"));
        assert_eq!(handler.last_logged_step, -1);
    }

    #[test]
    fn test_error_events_are_buffered() {
        let mut handler = ConversionProgressHandler::new("Speeding up", 0.5);
        handler.handle_event(FfmpegEvent::Error("Invalid argument".to_string()));
        handler.handle_event(FfmpegEvent::Log(
            FfmpegLogLevel::Error,
            "Error initializing filter 'atempo'".to_string(),
        ));
        handler.handle_event(FfmpegEvent::Log(
            FfmpegLogLevel::Info,
            "Stream mapping:".to_string(),
        ));

        assert_eq!(
            handler.stderr_buffer(),
            "Invalid argument\nError initializing filter 'atempo'\n"
        );
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(map_ffmpeg_log_level(&FfmpegLogLevel::Fatal), log::Level::Error);
        assert_eq!(map_ffmpeg_log_level(&FfmpegLogLevel::Warning), log::Level::Warn);
        assert_eq!(map_ffmpeg_log_level(&FfmpegLogLevel::Info), log::Level::Info);
    }
}
