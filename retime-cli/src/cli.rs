// retime-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Retime: slow down or speed up videos with ffmpeg",
    long_about = "Runs the Slow Down and Speed Up edit services from retime-core, \
                  resolving their settings and driving ffmpeg."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lists the edit services and their settings
    List(ListArgs),
    /// Slows a video down (slowDownPercent in (0, 1])
    SlowDown(RetimeArgs),
    /// Speeds a video up (speedUpPercent >= 1)
    SpeedUp(RetimeArgs),
    /// Runs an edit service by name or title, configured through --set
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the services and their schemas as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments shared by every conversion.
#[derive(Args, Debug)]
pub struct ConversionArgs {
    /// Video to convert
    #[arg(short = 'i', long = "input", value_name = "INPUT_PATH")]
    pub input_path: PathBuf,

    /// Where the converted video is written (overwritten if present)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_PATH")]
    pub output_path: PathBuf,

    /// Treat the export as muted: audio is never retimed
    #[arg(long)]
    pub muted: bool,

    /// JSON file with setting overrides, e.g. {"slowDownPercent": 0.25}
    #[arg(long, value_name = "FILE", env = "RETIME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Setting override as KEY=VALUE; may be repeated
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Print the exact ffmpeg command line instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// ffmpeg binary to run
    #[arg(long, value_name = "PATH", env = "RETIME_FFMPEG")]
    pub ffmpeg: Option<String>,
}

#[derive(Args, Debug)]
pub struct RetimeArgs {
    #[command(flatten)]
    pub conversion: ConversionArgs,

    /// Speed factor; a fraction for slow-down, a multiplier for speed-up
    #[arg(long, visible_alias = "factor", value_name = "FACTOR")]
    pub percent: Option<f64>,

    /// Leave the audio timing untouched
    #[arg(long)]
    pub no_audio: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Service slug or title, e.g. "slow-down" or "Speed Up"
    #[arg(value_name = "SERVICE")]
    pub service: String,

    #[command(flatten)]
    pub conversion: ConversionArgs,
}
