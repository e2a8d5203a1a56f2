//! Building blocks of the grammar autoloader.
//!
//! `autoloader_core` holds everything the loader needs that is not itself
//! concurrent:
//!
//! - [`LoadSpec`] - A requested name with its force marker parsed out
//! - [`Tables`] - Layered alias and dependency tables
//! - [`Locator`] - Maps canonical names to fetchable locators
//! - [`LoaderConfig`] - The configuration surface
//! - [`HostRegistry`] / [`GrammarRegistry`] - Grammars available without loading
//! - [`Fetcher`] - The single-shot fetch primitive supplied by the host
//!
//! # Architecture
//!
//! - **`autoloader_core`**: Names, tables and collaborator traits (this crate)
//! - **`autoloader_runtime`**: State store, dispatcher and loaders
//! - **`autoloader_trigger`**: Integration with content-rendered notifications

/// Loader configuration.
pub mod config;

/// Error types.
pub mod error;

/// The fetch primitive.
pub mod fetch;

/// Locator computation.
pub mod locator;

/// Requested names and force markers.
pub mod name;

/// Built-in alias and dependency tables.
pub mod presets;

/// Host availability registry.
pub mod registry;

/// Layered alias and dependency tables.
pub mod tables;

pub use config::{DependencyList, LoaderConfig};
pub use error::{BatchError, ConfigError, FetchError, LoadError};
pub use fetch::Fetcher;
pub use locator::Locator;
pub use name::{FORCE_MARKER, LoadSpec};
pub use registry::{GrammarRegistry, HostRegistry};
pub use tables::Tables;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::config::LoaderConfig;
    pub use crate::error::{BatchError, FetchError, LoadError};
    pub use crate::fetch::Fetcher;
    pub use crate::registry::{GrammarRegistry, HostRegistry};
}
