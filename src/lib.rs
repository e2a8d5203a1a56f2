//! Lazily loads syntax-highlighting grammars on demand.
//!
//! Grammars are resolved through alias tables, expanded through their
//! declared dependencies, fetched at most once per concurrent wave of
//! requests, and cached as loaded or failed for the life of the loader.

pub use autoloader_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use autoloader_internal::prelude::*;
}
