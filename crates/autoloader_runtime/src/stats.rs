//! Load statistics.
//!
//! The [`LoadStatsPlugin`] counts what the loader does through hooks and
//! exposes the counters as a shared [`LoadStats`].
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use autoloader_core::{FetchError, Fetcher};
//! use autoloader_runtime::Loader;
//! use autoloader_runtime::stats::LoadStatsPlugin;
//!
//! struct AlwaysOk;
//!
//! #[async_trait]
//! impl Fetcher for AlwaysOk {
//!     async fn fetch(&self, _locator: &str) -> Result<(), FetchError> {
//!         Ok(())
//!     }
//! }
//!
//! let plugin = LoadStatsPlugin::default();
//! let stats = plugin.stats();
//! let loader = Loader::builder(AlwaysOk).add_plugin(plugin).build();
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! loader.load_one("css").await.unwrap();
//! # });
//! assert_eq!(stats.snapshot().fetches_succeeded, 1);
//! ```

use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::hooks::LoadEvent;
use crate::hooks::schedule::{
    OnBatchComplete, OnBatchError, OnCoalesce, OnFetchComplete, OnFetchError, OnFetchStart,
    OnRequest, OnSettle,
};
use crate::loader::LoaderBuilder;
use crate::plugin::Plugin;

/// Counters fed by [`LoadStatsPlugin`].
#[derive(Debug, Default)]
pub struct LoadStats {
    requests: AtomicU64,
    coalesced: AtomicU64,
    fetches_started: AtomicU64,
    fetches_succeeded: AtomicU64,
    fetches_failed: AtomicU64,
    settlements: AtomicU64,
    batches_succeeded: AtomicU64,
    batches_failed: AtomicU64,
}

/// Point-in-time copy of [`LoadStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadStatsSnapshot {
    /// Single-grammar requests, including batch members and dependencies.
    pub requests: u64,
    /// Requests that joined a load already in flight.
    pub coalesced: u64,
    /// Fetches handed to the fetch primitive.
    pub fetches_started: u64,
    /// Fetches that succeeded.
    pub fetches_succeeded: u64,
    /// Fetches that failed.
    pub fetches_failed: u64,
    /// Loads that settled, successfully or not.
    pub settlements: u64,
    /// Batches that loaded every member.
    pub batches_succeeded: u64,
    /// Batches that reported a failing member.
    pub batches_failed: u64,
}

impl LoadStats {
    /// Returns the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> LoadStatsSnapshot {
        LoadStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            fetches_started: self.fetches_started.load(Ordering::Relaxed),
            fetches_succeeded: self.fetches_succeeded.load(Ordering::Relaxed),
            fetches_failed: self.fetches_failed.load(Ordering::Relaxed),
            settlements: self.settlements.load(Ordering::Relaxed),
            batches_succeeded: self.batches_succeeded.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
        }
    }

    fn record(&self, event: &LoadEvent) {
        let counter = match event {
            LoadEvent::Request { .. } => &self.requests,
            LoadEvent::Coalesced { .. } => &self.coalesced,
            LoadEvent::FetchStart { .. } => &self.fetches_started,
            LoadEvent::FetchComplete { .. } => &self.fetches_succeeded,
            LoadEvent::FetchError { .. } => &self.fetches_failed,
            LoadEvent::Settle { .. } => &self.settlements,
            LoadEvent::BatchComplete { .. } => &self.batches_succeeded,
            LoadEvent::BatchError { .. } => &self.batches_failed,
            LoadEvent::DependencyError { .. } => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Plugin that counts loader activity into a shared [`LoadStats`].
#[derive(Debug, Default)]
pub struct LoadStatsPlugin {
    stats: Arc<LoadStats>,
}

impl LoadStatsPlugin {
    /// Returns a handle to the counters this plugin feeds.
    #[must_use]
    pub fn stats(&self) -> Arc<LoadStats> {
        Arc::clone(&self.stats)
    }
}

impl Plugin for LoadStatsPlugin {
    fn build(&self, loader: &mut LoaderBuilder) {
        let stats = Arc::clone(&self.stats);
        loader
            .hooks()
            .register_observer::<(
                OnRequest,
                OnCoalesce,
                OnFetchStart,
                OnFetchComplete,
                OnFetchError,
                OnSettle,
                OnBatchComplete,
                OnBatchError,
            ), _>("load_stats", move |event: &LoadEvent| stats.record(event))
            .expect("LoadStatsPlugin hook registration should not fail");
    }
}
