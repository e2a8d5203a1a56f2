//! Infrastructure plugins for the grammar autoloader.
//!
//! - [`TracingPlugin`] - Logs loader activity and installs a `tracing` subscriber

mod tracing_plugin;

pub use tracing_plugin::{TracingConfig, TracingFormat, TracingPlugin};
