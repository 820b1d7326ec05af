// ============================================================================
// retime-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger setup for the CLI
//
// The application uses the standard `log` crate with `env_logger` as the
// backend. Log lines go to stderr so stdout stays clean for `list` and
// `--dry-run` output.
//
// - RUST_LOG=info (default): Start, progress and finish lines
// - RUST_LOG=debug (or --verbose): ffmpeg arguments and diagnostics
// - RUST_LOG=trace: Everything ffmpeg prints

use std::io::Write;

/// Initializes `env_logger`. `RUST_LOG` overrides the verbosity flag.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };

    let result = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} {}",
            get_timestamp(),
            record.level(),
            record.args()
        )
    })
    .try_init();

    if result.is_ok() {
        log::debug!("Logger initialized with filter: {default_filter}");
    }
}

/// Returns the current local time formatted as "HH:MM:SS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
