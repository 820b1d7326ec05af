//! Slow Down and Speed Up edit services for ffmpeg-based exports.
//!
//! Each service declares a configuration schema and an action. The action
//! reads the resolved settings, builds an ffmpeg filter graph that rescales
//! video timestamps (and, when the tempo filter allows it, audio tempo), asks
//! a [`Converter`](external::Converter) to run ffmpeg and returns a
//! cancellable [`ConversionTask`].
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use retime_core::{ActionContext, ConfigStore, ConfigValue, ExportOptions};
//! use retime_core::external::SidecarConverter;
//! use retime_core::services::speed_up;
//! use std::path::Path;
//!
//! let service = speed_up::service();
//! let config = ConfigStore::resolve(
//!     &service.config,
//!     vec![(speed_up::SPEED_UP_PERCENT.to_string(), ConfigValue::Number(1.5))],
//! )
//! .unwrap();
//! let converter = SidecarConverter::new();
//!
//! let task = service
//!     .run(&ActionContext {
//!         config: &config,
//!         converter: &converter,
//!         export_options: ExportOptions { is_muted: false },
//!         input_path: Path::new("/path/to/input.mp4"),
//!         output_path: Path::new("/path/to/output.mp4"),
//!     })
//!     .unwrap();
//!
//! // Another thread may call `token.cancel()` to stop ffmpeg.
//! let token = task.cancel_token();
//! let outcome = task.wait().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod progress;
pub mod services;
pub mod task;
pub mod utils;

// Re-exports for public API
pub use config::{ConfigField, ConfigSchema, ConfigStore, ConfigValue, FieldKind};
pub use error::{CoreError, CoreResult};
pub use external::{ConversionOutcome, ConversionOutput, ConversionRequest, Converter};
pub use services::{ActionContext, EditService, ExportOptions, edit_services, find_service};
pub use task::{CancellationToken, ConversionTask};
