//! Concurrent core of the grammar autoloader.
//!
//! - [`Loader`] - Requests grammars, expands dependencies and coalesces
//!   concurrent requests into a single fetch
//! - [`ResourceStore`] - Per-grammar load state and waiting callers
//! - [`dispatch`](dispatch::dispatch) - Delivers settlements on a later
//!   scheduling turn
//! - [`hooks`] - Lifecycle hooks for observing the loader
//! - [`Plugin`] - Extends a loader while it is built
//!
//! Loaders run on Tokio. Methods that start work spawn tasks and must be
//! called from within a runtime.

pub mod dispatch;
pub mod hooks;
pub mod loader;
pub mod plugin;
pub mod stats;
pub mod store;

pub use dispatch::{Completion, Settlement};
pub use loader::{Loader, LoaderBuilder};
pub use plugin::{Plugin, PluginId};
pub use store::{ResourcePhase, ResourceSnapshot, ResourceStore};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::hooks::{HooksAPI, LoadEvent};
    pub use crate::loader::{Loader, LoaderBuilder};
    pub use crate::plugin::Plugin;
    pub use crate::stats::{LoadStats, LoadStatsPlugin};
    pub use crate::store::ResourcePhase;
}
