//! The loader and its builder.
//!
//! [`Loader`] turns requests for grammar names into at most one fetch per
//! grammar. Dependencies load before the grammar that needs them, callers
//! asking for a grammar that is already in flight join the existing load,
//! and every caller is settled through the completion dispatcher.
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use autoloader_core::{FetchError, Fetcher, LoaderConfig};
//! use autoloader_runtime::Loader;
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
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let loader = Loader::builder(AlwaysOk)
//!     .with_config(LoaderConfig::default().with_base_path("/static/grammars/"))
//!     .build();
//!
//! loader.load_many(["tsx", "js"]).await.unwrap();
//! assert!(loader.is_loaded("javascript"));
//! assert!(loader.is_loaded("jsx"));
//! # });
//! ```

use core::fmt;
use std::sync::Arc;
use std::time::Instant;

use autoloader_core::{
    BatchError, Fetcher, HostRegistry, LoadError, LoadSpec, LoaderConfig, Locator, Tables,
};
use futures::future::{BoxFuture, TryFutureExt, try_join_all};
use hashbrown::HashSet;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::dispatch::{Settlement, dispatch};
use crate::hooks::schedule::{
    OnBatchComplete, OnBatchError, OnCoalesce, OnDependencyError, OnFetchComplete, OnFetchError,
    OnFetchStart, OnRequest, OnSettle, Schedule, ScheduleId,
};
use crate::hooks::{HooksAPI, LoadEvent};
use crate::plugin::{Plugin, PluginId};
use crate::store::{Admission, ResourcePhase, ResourceStore};

// ─────────────────────────────────────────────────────────────────────────────
// Loader
// ─────────────────────────────────────────────────────────────────────────────

struct LoaderInner {
    config: LoaderConfig,
    tables: Tables,
    locator: Locator,
    store: ResourceStore,
    fetcher: Arc<dyn Fetcher>,
    hooks: HooksAPI,
}

/// Dependency-aware, coalescing grammar loader.
///
/// `Loader` is a cheap handle: clones share the same tables, state store and
/// hooks. Independent loaders share nothing.
///
/// Every method that starts work spawns Tokio tasks and panics if called
/// outside a Tokio runtime. A fetch, once started, runs to completion even if
/// every caller waiting on it has gone away.
#[derive(Clone)]
pub struct Loader {
    inner: Arc<LoaderInner>,
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("config", &self.inner.config)
            .field("store", &self.inner.store)
            .field("hooks", &self.inner.hooks)
            .finish_non_exhaustive()
    }
}

impl Loader {
    /// Creates a loader with default configuration, preset tables and no
    /// host registry.
    pub fn new(fetcher: impl Fetcher) -> Self {
        Self::builder(fetcher).build()
    }

    /// Starts building a loader around `fetcher`.
    pub fn builder(fetcher: impl Fetcher) -> LoaderBuilder {
        LoaderBuilder::new(fetcher)
    }

    /// Requests a single grammar and settles `completion` once with the
    /// outcome.
    ///
    /// `raw` may be an alias and may carry the force marker (`"!name"`), which
    /// reloads the grammar even if it is available or failed before.
    ///
    /// The request is registered before this returns, but `completion` never
    /// runs inline: even cached answers are delivered on a later scheduling
    /// turn.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn request(&self, raw: &str, completion: impl FnOnce(Settlement) + Send + 'static) {
        let spec = LoadSpec::parse(raw);
        let force = spec.force();
        let name = self.inner.tables.resolve_alias(spec.name());

        self.emit::<OnRequest>(|| LoadEvent::Request {
            name: name.clone(),
            force,
        });

        match self.inner.store.admit(&name, force, Box::new(completion)) {
            Admission::Ready(completion, settlement) => {
                tracing::trace!(%name, ok = settlement.is_ok(), "answered from cached state");
                dispatch(&name, vec![completion], settlement);
            }
            Admission::Joined { waiters } => {
                tracing::trace!(%name, waiters, "joined in-flight load");
                self.emit::<OnCoalesce>(|| LoadEvent::Coalesced {
                    name: name.clone(),
                    waiters,
                });
            }
            Admission::Started => {
                tracing::debug!(%name, force, "starting load");
                tokio::spawn(self.clone().drive(name));
            }
        }
    }

    /// Loads a single grammar.
    ///
    /// The request is registered immediately. Dropping the returned future
    /// does not cancel the load.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] the grammar settled with.
    pub fn load_one(&self, raw: &str) -> BoxFuture<'static, Result<(), LoadError>> {
        let (tx, rx) = oneshot::channel();
        let name = self
            .inner
            .tables
            .resolve_alias(LoadSpec::parse(raw).name());

        self.request(raw, move |settlement| {
            let _ = tx.send(settlement);
        });

        Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(LoadError::Interrupted { name }))
        })
    }

    /// Loads a batch of grammars concurrently.
    ///
    /// Every member is requested before this returns. The future resolves to
    /// the names as requested once every member has loaded, or to the first
    /// member failure observed. Later outcomes are ignored. An empty batch
    /// resolves to an empty list after yielding once.
    ///
    /// # Errors
    ///
    /// Returns a [`BatchError`] naming the first member that failed.
    pub fn load_many<I, S>(&self, names: I) -> BoxFuture<'static, Result<Vec<String>, BatchError>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let requested: Vec<String> = names.into_iter().map(Into::into).collect();
        let started = Instant::now();
        let members = self.join_members(&requested);

        let loader = self.clone();
        Box::pin(async move {
            if requested.is_empty() {
                tokio::task::yield_now().await;
            }

            match members.await {
                Ok(()) => {
                    loader.emit::<OnBatchComplete>(|| LoadEvent::BatchComplete {
                        names: requested.clone(),
                        duration: started.elapsed(),
                    });
                    Ok(requested)
                }
                Err(error) => {
                    loader.emit::<OnBatchError>(|| LoadEvent::BatchError {
                        requested: error.requested.clone(),
                        error: error.source.clone(),
                    });
                    Err(error)
                }
            }
        })
    }

    /// Requests every member now and resolves once all have loaded or one
    /// has failed. Emits no batch events.
    fn join_members(&self, requested: &[String]) -> BoxFuture<'static, Result<(), BatchError>> {
        let members: Vec<_> = requested
            .iter()
            .map(|raw| {
                let member = raw.clone();
                self.load_one(raw).map_err(move |source| BatchError {
                    requested: member,
                    source,
                })
            })
            .collect();

        Box::pin(try_join_all(members).map_ok(|_| ()))
    }

    /// Loads one grammar as a batch of one.
    ///
    /// # Errors
    ///
    /// Returns a [`BatchError`] if the grammar failed.
    pub fn load(&self, name: impl Into<String>) -> BoxFuture<'static, Result<Vec<String>, BatchError>> {
        self.load_many([name.into()])
    }

    /// Callback form of [`load_many`](Self::load_many).
    ///
    /// Exactly one of `on_success` (with the names as requested) or
    /// `on_failure` (with the first failing name as requested) runs, on a
    /// spawned task whose handle is returned.
    pub fn load_many_with<I, S, F, E>(&self, names: I, on_success: F, on_failure: E) -> JoinHandle<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnOnce(Vec<String>) + Send + 'static,
        E: FnOnce(String) + Send + 'static,
    {
        let batch = self.load_many(names);
        tokio::spawn(async move {
            match batch.await {
                Ok(names) => on_success(names),
                Err(error) => on_failure(error.requested),
            }
        })
    }

    /// Returns whether `raw` is usable without loading.
    ///
    /// Always `false` for force-marked names.
    #[must_use]
    pub fn is_loaded(&self, raw: &str) -> bool {
        let spec = LoadSpec::parse(raw);
        !spec.force() && self.inner.store.is_available(&self.resolve_alias(spec.name()))
    }

    /// Returns the phase of the grammar `raw` refers to.
    #[must_use]
    pub fn phase(&self, raw: &str) -> ResourcePhase {
        let spec = LoadSpec::parse(raw);
        self.inner.store.phase(&self.resolve_alias(spec.name()))
    }

    /// Resolves an alias to its canonical name.
    #[must_use]
    pub fn resolve_alias(&self, name: &str) -> String {
        self.inner.tables.resolve_alias(name)
    }

    /// Returns the locator a canonical name is fetched from.
    #[must_use]
    pub fn locate(&self, name: &str) -> String {
        self.inner.locator.locate(name)
    }

    /// Returns the alias and dependency tables.
    #[must_use]
    pub fn tables(&self) -> &Tables {
        &self.inner.tables
    }

    /// Returns the locator.
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.inner.locator
    }

    /// Returns the configuration the loader was built with.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    /// Returns the state store.
    #[must_use]
    pub fn store(&self) -> &ResourceStore {
        &self.inner.store
    }

    /// Returns the lifecycle hooks.
    #[must_use]
    pub fn hooks(&self) -> &HooksAPI {
        &self.inner.hooks
    }

    /// Runs the load started by a winning request and settles its waiters.
    async fn drive(self, name: String) {
        let settlement = self.load_with_dependencies(&name).await;
        self.settle(&name, settlement);
    }

    async fn load_with_dependencies(&self, name: &str) -> Settlement {
        if let Some(cycle) = self.inner.tables.dependency_cycle(name) {
            return Err(self.dependency_failed(LoadError::DependencyCycle {
                name: name.to_owned(),
                cycle,
            }));
        }

        let dependencies = self.inner.tables.dependencies(name);
        if !dependencies.is_empty() {
            tracing::debug!(%name, ?dependencies, "loading dependencies");
            if let Err(error) = self.join_members(&dependencies).await {
                return Err(self.dependency_failed(LoadError::Dependency {
                    name: name.to_owned(),
                    dependency: error.requested,
                }));
            }
        }

        self.fetch(name).await
    }

    fn dependency_failed(&self, error: LoadError) -> LoadError {
        if matches!(error, LoadError::DependencyCycle { .. }) {
            tracing::warn!(name = error.name(), %error, "dependency cycle rejected");
        } else {
            tracing::debug!(name = error.name(), %error, "grammar not fetched");
        }
        self.emit::<OnDependencyError>(|| LoadEvent::DependencyError {
            error: error.clone(),
        });
        error
    }

    async fn fetch(&self, name: &str) -> Settlement {
        let locator = self.inner.locator.locate(name);
        self.emit::<OnFetchStart>(|| LoadEvent::FetchStart {
            name: name.to_owned(),
            locator: locator.clone(),
        });

        let started = Instant::now();
        match self.inner.fetcher.fetch(&locator).await {
            Ok(()) => {
                self.emit::<OnFetchComplete>(|| LoadEvent::FetchComplete {
                    name: name.to_owned(),
                    locator: locator.clone(),
                    duration: started.elapsed(),
                });
                Ok(())
            }
            Err(source) => {
                tracing::debug!(%name, %locator, error = %source, "fetch failed");
                self.emit::<OnFetchError>(|| LoadEvent::FetchError {
                    name: name.to_owned(),
                    locator: locator.clone(),
                    error: source.clone(),
                });
                Err(LoadError::Fetch {
                    name: name.to_owned(),
                    source,
                })
            }
        }
    }

    fn settle(&self, name: &str, settlement: Settlement) {
        let success = settlement.is_ok();
        let waiters = self.inner.store.settle(name, settlement);
        tracing::debug!(%name, success, waiters, "grammar settled");
        self.emit::<OnSettle>(|| LoadEvent::Settle {
            name: name.to_owned(),
            waiters,
            success,
        });
    }

    /// Invokes the hooks of schedule `S`, building the event only if any exist.
    fn emit<S: Schedule>(&self, event: impl FnOnce() -> LoadEvent) {
        let schedule = ScheduleId::of::<S>();
        if self.inner.hooks.hook_count(schedule) > 0 {
            self.inner.hooks.invoke(schedule, &event());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LoaderBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a [`Loader`].
///
/// Configuration overrides are copied into the tables and locator by
/// [`build`](Self::build), so plugins may still adjust the configuration
/// during their build phase.
pub struct LoaderBuilder {
    fetcher: Arc<dyn Fetcher>,
    config: LoaderConfig,
    registry: Arc<dyn HostRegistry>,
    tables: Tables,
    hooks: HooksAPI,
    plugins: Vec<Box<dyn Plugin>>,
    plugin_ids: HashSet<PluginId>,
}

impl fmt::Debug for LoaderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plugins: Vec<&str> = self.plugins.iter().map(|plugin| plugin.name()).collect();
        f.debug_struct("LoaderBuilder")
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .field("plugins", &plugins)
            .finish_non_exhaustive()
    }
}

impl LoaderBuilder {
    /// Creates a builder with default configuration, preset tables and no
    /// host registry.
    pub fn new(fetcher: impl Fetcher) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            config: LoaderConfig::default(),
            registry: Arc::new(()),
            tables: Tables::with_presets(),
            hooks: HooksAPI::new(),
            plugins: Vec::new(),
            plugin_ids: HashSet::new(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the registry consulted for grammars available without loading.
    #[must_use]
    pub fn with_registry(mut self, registry: impl HostRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Replaces the preset tables.
    #[must_use]
    pub fn with_tables(mut self, tables: Tables) -> Self {
        self.tables = tables;
        self
    }

    /// Adds a plugin and runs its build phase.
    ///
    /// # Panics
    ///
    /// Panics if a unique plugin of the same type was already added.
    #[must_use]
    pub fn add_plugin<P: Plugin>(mut self, plugin: P) -> Self {
        let id = PluginId::of::<P>();

        if plugin.is_unique() && !self.plugin_ids.insert(id) {
            panic!(
                "Plugin '{}' is unique and was already added.\n\
                 If you intended to add this plugin multiple times, \
                 set `is_unique()` to return `false`.",
                plugin.name()
            );
        }

        tracing::trace!(plugin = plugin.name(), "building plugin");
        plugin.build(&mut self);
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Returns whether a plugin of type `P` was added.
    #[must_use]
    pub fn contains_plugin<P: Plugin>(&self) -> bool {
        self.plugin_ids.contains(&PluginId::of::<P>())
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Returns the configuration for modification.
    pub fn config_mut(&mut self) -> &mut LoaderConfig {
        &mut self.config
    }

    /// Returns the tables the loader will use.
    #[must_use]
    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Returns the hooks the loader will use.
    #[must_use]
    pub fn hooks(&self) -> &HooksAPI {
        &self.hooks
    }

    /// Builds the loader and runs every plugin's ready phase.
    #[must_use]
    pub fn build(self) -> Loader {
        self.tables.apply_config(&self.config);
        let locator = Locator::from_config(&self.config);

        let loader = Loader {
            inner: Arc::new(LoaderInner {
                locator,
                tables: self.tables,
                store: ResourceStore::new(self.registry),
                fetcher: self.fetcher,
                hooks: self.hooks,
                config: self.config,
            }),
        };

        for plugin in &self.plugins {
            plugin.ready(&loader);
        }

        tracing::debug!(
            base_path = loader.inner.locator.base_path(),
            use_minified = loader.inner.locator.use_minified(),
            plugins = self.plugins.len(),
            "loader ready"
        );
        loader
    }
}
