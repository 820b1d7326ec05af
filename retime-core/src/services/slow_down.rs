//! The "Slow Down" edit service.

use super::retime::{RetimeDirection, start_retime};
use super::{ActionContext, EditService};
use crate::config::{ConfigField, ConfigSchema};
use crate::error::CoreResult;
use crate::task::ConversionTask;

/// Setting key for the playback fraction, in (0, 1].
pub const SLOW_DOWN_PERCENT: &str = "slowDownPercent";

/// Setting key for the audio toggle.
pub const SLOW_DOWN_AUDIO: &str = "slowDownAudio";

pub const TITLE: &str = "Slow Down";

#[must_use]
pub fn schema() -> ConfigSchema {
    ConfigSchema::new()
        .field(
            SLOW_DOWN_PERCENT,
            ConfigField::number(
                "Slow Down Percentage",
                "Slow down the video by the given percentage. For example, 0.5 means half speed and double the duration.",
                0.5,
            )
            .minimum(0.0)
            .maximum(1.0)
            .required(),
        )
        .field(
            SLOW_DOWN_AUDIO,
            ConfigField::boolean(
                "Slow Down Audio",
                "This only works if \u{201c}Slow Down Percentage\u{201d} is less than or equal to 0.5",
                true,
            ),
        )
}

/// Slows the export down by `slowDownPercent`.
pub fn action(ctx: &ActionContext<'_>) -> CoreResult<ConversionTask> {
    start_retime(ctx, RetimeDirection::SlowDown, SLOW_DOWN_PERCENT, SLOW_DOWN_AUDIO)
}

#[must_use]
pub fn service() -> EditService {
    EditService {
        title: TITLE,
        slug: "slow-down",
        config: schema(),
        action,
    }
}
