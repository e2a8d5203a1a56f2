//! Plugins extend a [`Loader`] while it is being built.
//!
//! A plugin registers hooks, adjusts configuration or overrides tables in
//! [`build`](Plugin::build), and gets the finished loader in
//! [`ready`](Plugin::ready).
//!
//! # Example
//!
//! ```
//! use autoloader_runtime::hooks::LoadEvent;
//! use autoloader_runtime::hooks::schedule::OnFetchError;
//! use autoloader_runtime::{LoaderBuilder, Plugin};
//!
//! struct ReportFailures;
//!
//! impl Plugin for ReportFailures {
//!     fn build(&self, loader: &mut LoaderBuilder) {
//!         loader
//!             .hooks()
//!             .register_observer::<OnFetchError, _>("report_failures", |event: &LoadEvent| {
//!                 if let LoadEvent::FetchError { locator, error, .. } = event {
//!                     tracing::warn!(%locator, %error, "grammar fetch failed");
//!                 }
//!             })
//!             .expect("ReportFailures hook registration should not fail");
//!     }
//! }
//! ```

use core::any::TypeId;

use crate::loader::{Loader, LoaderBuilder};

/// Unique identifier for a plugin type.
///
/// Based on [`TypeId`], so each plugin type has exactly one `PluginId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginId {
    type_id: TypeId,
    type_name: &'static str,
}

impl PluginId {
    /// Creates a `PluginId` for the given plugin type.
    #[must_use]
    pub fn of<P: Plugin>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            type_name: core::any::type_name::<P>(),
        }
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name for debugging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Extension point for [`LoaderBuilder`].
///
/// 1. **Build Phase** - `build()` runs when the plugin is added
/// 2. **Ready Phase** - `ready()` runs once the loader exists, in the order
///    plugins were added
pub trait Plugin: Send + Sync + 'static {
    /// Configures the loader under construction.
    fn build(&self, loader: &mut LoaderBuilder);

    /// Called once the loader has been built.
    fn ready(&self, _loader: &Loader) {}

    /// Returns the plugin's name for debugging and error messages.
    ///
    /// Default implementation returns the type name.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }

    /// Whether adding the plugin twice is a programming error.
    fn is_unique(&self) -> bool {
        true
    }
}
