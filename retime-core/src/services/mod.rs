//! Edit services exposed to the host.
//!
//! An [`EditService`] is plain data: a display title, a configuration schema
//! and an action. The action receives an [`ActionContext`] with resolved
//! settings, the host's converter, export options and file paths, and returns
//! a [`ConversionTask`] the host can wait on or cancel.
//!
//! ```rust,no_run
//! use retime_core::config::ConfigStore;
//! use retime_core::external::SidecarConverter;
//! use retime_core::services::{ActionContext, ExportOptions, find_service};
//! use std::path::Path;
//!
//! let service = find_service("slow-down").unwrap();
//! let config = ConfigStore::resolve(&service.config, Vec::new()).unwrap();
//! let converter = SidecarConverter::new();
//! let ctx = ActionContext {
//!     config: &config,
//!     converter: &converter,
//!     export_options: ExportOptions::default(),
//!     input_path: Path::new("recording.mp4"),
//!     output_path: Path::new("recording-slow.mp4"),
//! };
//! let task = service.run(&ctx).unwrap();
//! let outcome = task.wait().unwrap();
//! ```

pub mod retime;
pub mod slow_down;
pub mod speed_up;

use crate::config::{ConfigSchema, ConfigStore};
use crate::error::{CoreError, CoreResult};
use crate::external::Converter;
use crate::task::ConversionTask;

use log::info;
use std::fmt;
use std::path::Path;

pub use retime::{RetimeDirection, build_retime_args, should_retime_audio};

/// Export options the host passes along with each invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// The export has no audio track worth keeping.
    pub is_muted: bool,
}

/// Everything an action needs for one invocation. Owned by the host.
pub struct ActionContext<'a> {
    pub config: &'a ConfigStore,
    pub converter: &'a dyn Converter,
    pub export_options: ExportOptions,
    pub input_path: &'a Path,
    pub output_path: &'a Path,
}

/// Signature of a service action.
pub type ActionFn = fn(&ActionContext<'_>) -> CoreResult<ConversionTask>;

/// Descriptor for one edit service.
#[derive(Clone)]
pub struct EditService {
    /// Display name, e.g. "Slow Down".
    pub title: &'static str,
    /// Command-line friendly name, e.g. "slow-down".
    pub slug: &'static str,
    pub config: ConfigSchema,
    pub action: ActionFn,
}

impl EditService {
    /// Runs the action, logging which service started on which file.
    pub fn run(&self, ctx: &ActionContext<'_>) -> CoreResult<ConversionTask> {
        info!(
            "{}: {} -> {}",
            self.title,
            ctx.input_path.display(),
            ctx.output_path.display()
        );
        (self.action)(ctx)
    }
}

impl fmt::Debug for EditService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditService")
            .field("title", &self.title)
            .field("slug", &self.slug)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The services exposed to the host, in display order.
#[must_use]
pub fn edit_services() -> Vec<EditService> {
    vec![slow_down::service(), speed_up::service()]
}

/// Looks a service up by slug or title, ignoring case.
pub fn find_service(name: &str) -> CoreResult<EditService> {
    edit_services()
        .into_iter()
        .find(|s| s.slug.eq_ignore_ascii_case(name) || s.title.eq_ignore_ascii_case(name))
        .ok_or_else(|| CoreError::UnknownService(name.to_string()))
}
