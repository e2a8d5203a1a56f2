//! # Autoloader Internal Library
//!
//! Re-exports the autoloader crates for convenience.

/// Names, tables, configuration and collaborator traits.
pub use autoloader_core;

/// State store, dispatcher, loaders and hooks.
pub use autoloader_runtime;

/// Content-settled trigger integration.
pub use autoloader_trigger;

/// Infrastructure plugins.
pub use autoloader_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use autoloader_core::prelude::*;
    pub use autoloader_plugins::{TracingFormat, TracingPlugin};
    pub use autoloader_runtime::prelude::*;
    pub use autoloader_trigger::{AutoloadTrigger, ContentSettled, Element, Highlighter, TriggerOutcome};
}
