//! Retiming shared by the Slow Down and Speed Up services.
//!
//! Both services change playback speed by the same mechanism: video
//! timestamps are rescaled with `setpts`, and when the tempo filter can handle
//! the factor the audio is retimed with `atempo` in the same graph. They
//! differ only in which factors keep audio eligible and in the progress label.

use super::ActionContext;
use crate::error::CoreResult;
use crate::external::{ConversionRequest, FilterGraph};
use crate::task::ConversionTask;
use crate::utils::format_factor;

use log::{debug, info};
use std::path::Path;

/// Which way a retime goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetimeDirection {
    /// Factor in (0, 1]; output plays slower and lasts longer.
    SlowDown,
    /// Factor >= 1; output plays faster and is shorter.
    SpeedUp,
}

impl RetimeDirection {
    /// Largest factor for which audio is retimed too.
    #[must_use]
    pub fn audio_factor_limit(self) -> f64 {
        match self {
            RetimeDirection::SlowDown => 0.5,
            RetimeDirection::SpeedUp => 2.0,
        }
    }

    /// Label shown next to conversion progress.
    #[must_use]
    pub fn progress_label(self) -> &'static str {
        match self {
            RetimeDirection::SlowDown => "Slowing down",
            RetimeDirection::SpeedUp => "Speeding up",
        }
    }
}

/// Whether audio should be retimed along with the video.
#[must_use]
pub fn should_retime_audio(
    direction: RetimeDirection,
    factor: f64,
    retime_audio: bool,
    is_muted: bool,
) -> bool {
    retime_audio && factor <= direction.audio_factor_limit() && !is_muted
}

/// Builds the complete ffmpeg argument list for a retime by `factor`.
///
/// With audio: `-filter_complex [0:v]setpts=<1/f>*PTS[v];[0:a]atempo=<f>[a]`
/// mapped through `-map [v] -map [a]`. Without: `-filter:v setpts=<1/f>*PTS`,
/// leaving audio to ffmpeg's default handling.
#[must_use]
pub fn build_retime_args(
    input_path: &Path,
    output_path: &Path,
    factor: f64,
    retime_audio: bool,
) -> Vec<String> {
    let setpts = format!("setpts={}*PTS", format_factor(1.0 / factor));

    let mut args = vec![
        "-i".to_string(),
        input_path.to_string_lossy().into_owned(),
    ];

    if retime_audio {
        let atempo = format!("atempo={}", format_factor(factor));
        let graph = FilterGraph::new()
            .chain("0:v", [setpts], "v")
            .chain("0:a", [atempo], "a");
        args.extend(graph.to_args());
    } else {
        args.push("-filter:v".to_string());
        args.push(setpts);
    }

    args.push(output_path.to_string_lossy().into_owned());
    args
}

/// Reads the factor and audio flag, builds the arguments and starts the
/// conversion, returning a task whose cancellation reaches the process.
pub(crate) fn start_retime(
    ctx: &ActionContext<'_>,
    direction: RetimeDirection,
    factor_key: &str,
    audio_key: &str,
) -> CoreResult<ConversionTask> {
    let factor = ctx.config.number(factor_key)?;
    let retime_audio = ctx.config.boolean(audio_key)?;

    let with_audio =
        should_retime_audio(direction, factor, retime_audio, ctx.export_options.is_muted);
    if retime_audio && !with_audio && !ctx.export_options.is_muted {
        info!(
            "{factor_key} = {} is beyond {}; only the video is retimed",
            format_factor(factor),
            format_factor(direction.audio_factor_limit())
        );
    }

    let args = build_retime_args(ctx.input_path, ctx.output_path, factor, with_audio);
    debug!("{} args: {:?}", direction.progress_label(), args);

    let label = direction.progress_label();
    let request = ConversionRequest::new(args, label).with_duration_scale(1.0 / factor);
    let process = ctx.converter.convert(request)?;
    Ok(ConversionTask::new(label, process))
}
