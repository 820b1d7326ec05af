// retime-cli/src/lib.rs
//
// Library portion of the Retime CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ConversionArgs, ListArgs, RetimeArgs, RunArgs};
pub use commands::list::run_list;
pub use commands::retime::{run_service, run_slow_down, run_speed_up};
pub use error::CliResult;
