//! Configuration schemas and resolved settings for the edit services.
//!
//! Each service declares a [`ConfigSchema`]; a host resolves user input
//! against it into a [`ConfigStore`] that the service's action reads.

mod schema;
mod store;

pub use schema::{ConfigField, ConfigSchema, ConfigValue, FieldKind};
pub use store::ConfigStore;
