//! Tracing and observability plugin.
//!
//! Provides [`TracingPlugin`], which turns loader lifecycle events into
//! `tracing` events and optionally installs a subscriber.
//!
//! # Lifecycle
//!
//! - **`build()`** registers an observer on every loader schedule.
//! - **`ready()`** initializes the tracing subscriber, unless the host
//!   installs its own.
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use autoloader_core::{FetchError, Fetcher};
//! use autoloader_plugins::{TracingFormat, TracingPlugin};
//! use autoloader_runtime::Loader;
//! use tracing::Level;
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
//! let loader = Loader::builder(AlwaysOk)
//!     .add_plugin(
//!         TracingPlugin::default()
//!             .with_level(Level::DEBUG)
//!             .with_format(TracingFormat::Compact),
//!     )
//!     .build();
//! ```

use autoloader_runtime::hooks::LoadEvent;
use autoloader_runtime::hooks::schedule::{
    OnBatchComplete, OnBatchError, OnCoalesce, OnDependencyError, OnFetchComplete, OnFetchError,
    OnFetchStart, OnRequest, OnSettle,
};
use autoloader_runtime::{Loader, LoaderBuilder, Plugin};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Settings a [`TracingPlugin`] was created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// The configured maximum log level.
    pub level: Level,
    /// The configured output format.
    pub format: TracingFormat,
    /// Target-specific filter, e.g. `autoloader_runtime=debug`.
    pub env_filter: Option<String>,
    /// Whether `ready()` installs a global subscriber.
    pub install_subscriber: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            install_subscriber: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Logs what the loader does through `tracing`.
///
/// | Event | Level |
/// |-------|-------|
/// | request, coalesced request | `TRACE` |
/// | fetch start, settlement, batch complete | `DEBUG` |
/// | fetch complete | `INFO` |
/// | fetch error, dependency error, batch error | `WARN` |
///
/// # Environment Filter
///
/// Use `with_env_filter` to set target-specific log levels:
///
/// ```
/// use autoloader_plugins::TracingPlugin;
///
/// TracingPlugin::default()
///     .with_env_filter("autoloader=debug,hyper=warn")
/// # ;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TracingPlugin {
    config: TracingConfig,
}

impl TracingPlugin {
    /// Creates a new `TracingPlugin` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.config.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Leaves subscriber installation to the host. Loader events are
    /// still emitted.
    #[must_use]
    pub fn without_subscriber(mut self) -> Self {
        self.config.install_subscriber = false;
        self
    }

    /// Returns the plugin's settings.
    #[must_use]
    pub fn config(&self) -> &TracingConfig {
        &self.config
    }

    fn env_filter(&self) -> EnvFilter {
        let level = self.config.level.as_str();
        match &self.config.env_filter {
            Some(filter) => EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(level)),
            None => EnvFilter::new(level),
        }
    }
}

fn log_event(event: &LoadEvent) {
    match event {
        LoadEvent::Request { name, force } => {
            tracing::trace!(%name, force, "grammar requested");
        }
        LoadEvent::Coalesced { name, waiters } => {
            tracing::trace!(%name, waiters, "request joined in-flight load");
        }
        LoadEvent::FetchStart { name, locator } => {
            tracing::debug!(%name, %locator, "fetching grammar");
        }
        LoadEvent::FetchComplete {
            name,
            locator,
            duration,
        } => {
            tracing::info!(%name, %locator, ?duration, "grammar fetched");
        }
        LoadEvent::FetchError {
            name,
            locator,
            error,
        } => {
            tracing::warn!(%name, %locator, %error, "grammar fetch failed");
        }
        LoadEvent::DependencyError { error } => {
            tracing::warn!(name = error.name(), %error, "grammar not fetched");
        }
        LoadEvent::Settle {
            name,
            waiters,
            success,
        } => {
            tracing::debug!(%name, waiters, success, "grammar settled");
        }
        LoadEvent::BatchComplete { names, duration } => {
            tracing::debug!(?names, ?duration, "batch loaded");
        }
        LoadEvent::BatchError { requested, error } => {
            tracing::warn!(%requested, %error, "batch failed");
        }
    }
}

impl Plugin for TracingPlugin {
    fn build(&self, loader: &mut LoaderBuilder) {
        loader
            .hooks()
            .register_observer::<(
                OnRequest,
                OnCoalesce,
                OnFetchStart,
                OnFetchComplete,
                OnFetchError,
                OnDependencyError,
                OnSettle,
                OnBatchComplete,
                OnBatchError,
            ), _>("tracing", log_event)
            .expect("TracingPlugin hook registration should not fail");
    }

    fn ready(&self, loader: &Loader) {
        if self.config.install_subscriber {
            // try_init().ok() ignores errors if a subscriber is already set
            match self.config.format {
                TracingFormat::Pretty => {
                    tracing_subscriber::registry()
                        .with(self.env_filter())
                        .with(tracing_subscriber::fmt::layer().pretty())
                        .try_init()
                        .ok();
                }
                TracingFormat::Compact => {
                    tracing_subscriber::registry()
                        .with(self.env_filter())
                        .with(tracing_subscriber::fmt::layer().compact())
                        .try_init()
                        .ok();
                }
                TracingFormat::Json => {
                    tracing_subscriber::registry()
                        .with(self.env_filter())
                        .with(tracing_subscriber::fmt::layer().json())
                        .try_init()
                        .ok();
                }
            }
        }

        tracing::info!(
            level = %self.config.level,
            format = ?self.config.format,
            base_path = loader.locator().base_path(),
            "TracingPlugin initialized"
        );
    }
}
