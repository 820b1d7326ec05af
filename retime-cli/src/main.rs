// retime-cli/src/main.rs
//
// Entry point for the `retime` binary.
//
// Responsibilities:
// - Parsing command-line arguments
// - Initializing logging
// - Dispatching to the command implementations
// - Mapping results to process exit codes (0 success, 1 error, 130 cancelled)

use clap::Parser;
use retime_cli::error::report_error;
use retime_cli::logging::init_logging;
use retime_cli::{Cli, Commands, run_list, run_service, run_slow_down, run_speed_up};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::List(args) => run_list(&args),
        Commands::SlowDown(args) => run_slow_down(args),
        Commands::SpeedUp(args) => run_speed_up(args),
        Commands::Run(args) => run_service(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => report_error(&e),
    }
}
