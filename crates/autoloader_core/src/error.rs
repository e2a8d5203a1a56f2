//! Error types for loading grammars.

/// Error reported by a [`Fetcher`](crate::Fetcher) for a single locator.
///
/// Fetch errors are cloned to every caller waiting on the same grammar,
/// so they carry owned strings rather than boxed transport errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Nothing exists at the locator.
    #[error("no resource found at '{locator}'")]
    NotFound {
        /// The locator that was requested.
        locator: String,
    },

    /// The transport failed while loading the locator.
    #[error("failed to fetch '{locator}': {message}")]
    Transport {
        /// The locator that was requested.
        locator: String,
        /// Description of the failure.
        message: String,
    },
}

impl FetchError {
    /// Creates a [`FetchError::Transport`] error.
    #[must_use]
    pub fn transport(locator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            locator: locator.into(),
            message: message.into(),
        }
    }

    /// Returns the locator that failed.
    #[must_use]
    pub fn locator(&self) -> &str {
        match self {
            Self::NotFound { locator } | Self::Transport { locator, .. } => locator,
        }
    }
}

/// Error settling a single grammar.
///
/// Every variant names the canonical grammar that failed. The loader records
/// all of them the same way: the grammar is marked failed until a forced
/// reload succeeds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The fetch primitive reported failure for the grammar itself.
    #[error("failed to load '{name}'")]
    Fetch {
        /// Canonical grammar name.
        name: String,
        /// The underlying fetch failure.
        #[source]
        source: FetchError,
    },

    /// A transitive dependency failed, so the grammar was never fetched.
    #[error("dependency '{dependency}' of '{name}' failed to load")]
    Dependency {
        /// Canonical grammar name.
        name: String,
        /// The dependency as listed in the dependency table.
        dependency: String,
    },

    /// The dependency table contains a cycle reachable from the grammar.
    #[error("dependency cycle while loading '{name}': {}", .cycle.join(" -> "))]
    DependencyCycle {
        /// Canonical grammar name.
        name: String,
        /// The names forming the cycle, first name repeated at the end.
        cycle: Vec<String>,
    },

    /// The grammar failed earlier and the request was not forced.
    #[error("'{name}' failed to load previously")]
    PreviouslyFailed {
        /// Canonical grammar name.
        name: String,
    },

    /// The settlement was dropped before it could be delivered, which
    /// happens when the async runtime shuts down mid-load.
    #[error("loading '{name}' was interrupted")]
    Interrupted {
        /// Canonical grammar name.
        name: String,
    },
}

impl LoadError {
    /// Returns the canonical name of the grammar that failed.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Fetch { name, .. }
            | Self::Dependency { name, .. }
            | Self::DependencyCycle { name, .. }
            | Self::PreviouslyFailed { name }
            | Self::Interrupted { name } => name,
        }
    }
}

/// Error settling a batch of grammars.
///
/// Only the first member to fail is reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load '{requested}'")]
pub struct BatchError {
    /// The failing member, exactly as the caller wrote it.
    pub requested: String,
    /// Why the member failed.
    #[source]
    pub source: LoadError,
}

/// Error reading a loader configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration was not valid JSON for [`LoaderConfig`](crate::LoaderConfig).
    #[error("invalid loader configuration: {0}")]
    Json(#[from] serde_json::Error),
}
