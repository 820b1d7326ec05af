//! Utility functions for formatting numbers and ffmpeg timestamps.
//!
//! This module provides general-purpose helpers used throughout the
//! retime-core library: rendering filter factors, parsing ffmpeg progress
//! times and formatting durations for log output.

/// Renders a filter factor in shortest round-trip decimal form, never using
/// exponent notation.
///
/// Whole numbers drop the fractional part (`2.0` -> `"2"`), everything else
/// keeps exactly the digits needed to read the same `f64` back
/// (`1.0 / 0.7` -> `"1.4285714285714286"`). Very large or small values are
/// written out in full (`1e21` -> `"1000000000000000000000"`).
#[must_use]
pub fn format_factor(value: f64) -> String {
    format!("{value}")
}

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Parses ffmpeg's "HH:MM:SS.ms" progress time into seconds.
#[must_use]
pub fn parse_ffmpeg_time(time: &str) -> Option<f64> {
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() == 3 {
        let hours = parts[0].parse::<f64>().ok()?;
        let minutes = parts[1].parse::<f64>().ok()?;
        let seconds = parts[2].parse::<f64>().ok()?;
        Some(hours * 3600.0 + minutes * 60.0 + seconds)
    } else {
        None
    }
}
