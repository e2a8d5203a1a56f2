//! Host availability registry.

use std::sync::Arc;

use hashbrown::HashSet;
use parking_lot::RwLock;

/// Reports grammars that are available without going through the loader,
/// for example grammars bundled at build time.
pub trait HostRegistry: Send + Sync + 'static {
    /// Returns whether the canonical grammar `name` is already available.
    fn is_registered(&self, name: &str) -> bool;
}

/// A host with nothing registered.
impl HostRegistry for () {
    fn is_registered(&self, _name: &str) -> bool {
        false
    }
}

impl<R: HostRegistry + ?Sized> HostRegistry for Arc<R> {
    fn is_registered(&self, name: &str) -> bool {
        (**self).is_registered(name)
    }
}

/// In-memory, thread-safe set of registered grammars.
///
/// Hosts that compile grammars into their binary register them here, and a
/// fetch primitive may register each grammar it loads so that later
/// availability checks see it.
///
/// # Example
///
/// ```
/// use autoloader_core::{GrammarRegistry, HostRegistry};
///
/// let registry = GrammarRegistry::with_grammars(["markup", "css", "clike", "javascript"]);
/// assert!(registry.is_registered("css"));
/// assert!(!registry.is_registered("rust"));
///
/// registry.register("rust");
/// assert!(registry.is_registered("rust"));
/// ```
#[derive(Debug, Default)]
pub struct GrammarRegistry {
    grammars: RwLock<HashSet<String>>,
}

impl GrammarRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry containing `grammars`.
    #[must_use]
    pub fn with_grammars<I, S>(grammars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            grammars: RwLock::new(grammars.into_iter().map(Into::into).collect()),
        }
    }

    /// Registers a grammar. Returns `false` if it was already registered.
    pub fn register(&self, name: impl Into<String>) -> bool {
        self.grammars.write().insert(name.into())
    }

    /// Unregisters a grammar. Returns `false` if it was not registered.
    pub fn unregister(&self, name: &str) -> bool {
        self.grammars.write().remove(name)
    }

    /// Lists registered grammar names in no particular order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.grammars.read().iter().cloned().collect()
    }
}

impl HostRegistry for GrammarRegistry {
    fn is_registered(&self, name: &str) -> bool {
        self.grammars.read().contains(name)
    }
}
