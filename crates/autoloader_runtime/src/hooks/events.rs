//! Unified event enum for loader hooks.
//!
//! All hooks receive `&LoadEvent` and can match on variants for typed access.

use autoloader_core::{FetchError, LoadError};
use core::time::Duration;

/// Unified event enum for all loader hooks.
#[derive(Debug, Clone)]
pub enum LoadEvent {
    // ─────────────────────────────────────────────────────────────────────────
    // Request Events
    // ─────────────────────────────────────────────────────────────────────────
    /// A single grammar was requested.
    Request {
        /// Canonical grammar name.
        name: String,
        /// Whether the request bypasses cached state.
        force: bool,
    },

    /// A request joined a load already in flight.
    Coalesced {
        /// Canonical grammar name.
        name: String,
        /// Number of callers now waiting on the load.
        waiters: usize,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Fetch Events
    // ─────────────────────────────────────────────────────────────────────────
    /// The fetch primitive is about to run.
    FetchStart {
        /// Canonical grammar name.
        name: String,
        /// Locator handed to the fetch primitive.
        locator: String,
    },

    /// The fetch primitive reported success.
    FetchComplete {
        /// Canonical grammar name.
        name: String,
        /// Locator handed to the fetch primitive.
        locator: String,
        /// How long the fetch took.
        duration: Duration,
    },

    /// The fetch primitive reported failure.
    FetchError {
        /// Canonical grammar name.
        name: String,
        /// Locator handed to the fetch primitive.
        locator: String,
        /// The reported failure.
        error: FetchError,
    },

    /// The grammar failed before its own fetch because of its dependencies.
    DependencyError {
        /// The resulting error, either
        /// [`LoadError::Dependency`] or [`LoadError::DependencyCycle`].
        error: LoadError,
    },

    /// A grammar settled and its waiting callers were dispatched.
    Settle {
        /// Canonical grammar name.
        name: String,
        /// Number of callers dispatched.
        waiters: usize,
        /// Whether the grammar loaded.
        success: bool,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Batch Events
    // ─────────────────────────────────────────────────────────────────────────
    /// Every member of a batch loaded.
    BatchComplete {
        /// Members as requested.
        names: Vec<String>,
        /// Time from the batch request to its completion.
        duration: Duration,
    },

    /// The first member of a batch failed.
    BatchError {
        /// The failing member as requested.
        requested: String,
        /// Why the member failed.
        error: LoadError,
    },
}

impl LoadEvent {
    /// Returns the canonical grammar name the event is about, if it is about
    /// a single grammar.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Request { name, .. }
            | Self::Coalesced { name, .. }
            | Self::FetchStart { name, .. }
            | Self::FetchComplete { name, .. }
            | Self::FetchError { name, .. }
            | Self::Settle { name, .. } => Some(name),
            Self::DependencyError { error } => Some(error.name()),
            Self::BatchComplete { .. } | Self::BatchError { .. } => None,
        }
    }
}
