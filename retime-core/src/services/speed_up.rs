//! The "Speed Up" edit service.

use super::retime::{RetimeDirection, start_retime};
use super::{ActionContext, EditService};
use crate::config::{ConfigField, ConfigSchema};
use crate::error::CoreResult;
use crate::task::ConversionTask;

/// Setting key for the speed multiplier, at least 1.
pub const SPEED_UP_PERCENT: &str = "speedUpPercent";

/// Setting key for the audio toggle.
pub const SPEED_UP_AUDIO: &str = "speedUpAudio";

pub const TITLE: &str = "Speed Up";

#[must_use]
pub fn schema() -> ConfigSchema {
    ConfigSchema::new()
        .field(
            SPEED_UP_PERCENT,
            ConfigField::number(
                "Speed Up Multiplier",
                "Speed up the video by the given multiplier. For example, 2 means double the speed and half the duration.",
                2.0,
            )
            .minimum(1.0)
            .required(),
        )
        .field(
            SPEED_UP_AUDIO,
            ConfigField::boolean(
                "Speed Up Audio",
                "This only works if \u{201c}Speed Up Multiplier\u{201d} is less than or equal to 2",
                true,
            ),
        )
}

/// Speeds the export up by `speedUpPercent`.
pub fn action(ctx: &ActionContext<'_>) -> CoreResult<ConversionTask> {
    start_retime(ctx, RetimeDirection::SpeedUp, SPEED_UP_PERCENT, SPEED_UP_AUDIO)
}

#[must_use]
pub fn service() -> EditService {
    EditService {
        title: TITLE,
        slug: "speed-up",
        config: schema(),
        action,
    }
}
