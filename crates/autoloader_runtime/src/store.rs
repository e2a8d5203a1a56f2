//! Per-grammar load state.

use core::fmt;
use std::sync::Arc;

use autoloader_core::{HostRegistry, LoadError};
use hashbrown::HashMap;
use parking_lot::Mutex;

use crate::dispatch::{Completion, Settlement, dispatch};

/// Where a grammar is in its load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourcePhase {
    /// Never requested, or requested and not yet started.
    #[default]
    Unrequested,
    /// A fetch sequence is in flight.
    Loading,
    /// The most recent load succeeded.
    Loaded,
    /// The most recent load failed. Stays failed until a forced reload succeeds.
    Failed,
}

/// Snapshot of a grammar's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSnapshot {
    /// Current phase.
    pub phase: ResourcePhase,
    /// Callers waiting for the next settlement.
    pub pending: usize,
}

#[derive(Default)]
struct ResourceState {
    phase: ResourcePhase,
    pending: Vec<Completion>,
}

impl fmt::Debug for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceState")
            .field("phase", &self.phase)
            .field("pending", &self.pending.len())
            .finish()
    }
}

/// What [`ResourceStore::admit`] decided for a caller.
pub(crate) enum Admission {
    /// The caller is answered from cached state and was not enqueued.
    Ready(Completion, Settlement),
    /// The caller joined a load already in flight.
    Joined { waiters: usize },
    /// The caller was enqueued and must start the load.
    Started,
}

/// Shared state of every grammar a [`Loader`](crate::Loader) has seen.
///
/// Entries are created on first access and live as long as the store.
pub struct ResourceStore {
    registry: Arc<dyn HostRegistry>,
    states: Mutex<HashMap<String, ResourceState>>,
}

impl fmt::Debug for ResourceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceStore")
            .field("states", &*self.states.lock())
            .finish_non_exhaustive()
    }
}

impl ResourceStore {
    /// Creates an empty store backed by `registry`.
    pub fn new(registry: Arc<dyn HostRegistry>) -> Self {
        Self {
            registry,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Returns whether the canonical grammar `name` can be used without
    /// loading: the host registry reports it, or its last load succeeded.
    #[must_use]
    pub fn is_available(&self, name: &str) -> bool {
        self.registry.is_registered(name) || self.phase(name) == ResourcePhase::Loaded
    }

    /// Returns the phase of `name` without creating an entry.
    #[must_use]
    pub fn phase(&self, name: &str) -> ResourcePhase {
        self.states
            .lock()
            .get(name)
            .map_or(ResourcePhase::Unrequested, |state| state.phase)
    }

    /// Returns a snapshot of `name`, creating an empty entry on first access.
    pub fn get(&self, name: &str) -> ResourceSnapshot {
        let mut states = self.states.lock();
        let state = states.entry_ref(name).or_default();
        ResourceSnapshot {
            phase: state.phase,
            pending: state.pending.len(),
        }
    }

    /// Appends `completion` to the callers waiting on `name`.
    ///
    /// This does not start a load. The completion runs at the next
    /// [`settle`](Self::settle) of `name`.
    pub fn enqueue(&self, name: &str, completion: Completion) {
        self.states
            .lock()
            .entry_ref(name)
            .or_default()
            .pending
            .push(completion);
    }

    /// Returns how many callers are waiting on `name`.
    #[must_use]
    pub fn pending_count(&self, name: &str) -> usize {
        self.states
            .lock()
            .get(name)
            .map_or(0, |state| state.pending.len())
    }

    /// Records the outcome for `name` and dispatches every waiting caller
    /// with it. Returns the number of callers dispatched.
    ///
    /// Callers enqueued after this returns wait for the next settlement.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while callers are waiting.
    pub fn settle(&self, name: &str, settlement: Settlement) -> usize {
        let completions = {
            let mut states = self.states.lock();
            let state = states.entry_ref(name).or_default();
            state.phase = if settlement.is_ok() {
                ResourcePhase::Loaded
            } else {
                ResourcePhase::Failed
            };
            core::mem::take(&mut state.pending)
        };

        let waiters = completions.len();
        dispatch(name, completions, settlement);
        waiters
    }

    /// Decides how a request for `name` proceeds.
    ///
    /// Unforced requests are answered from cached availability or failure.
    /// Everything else is enqueued. The load starts if the request is forced
    /// or nothing is in flight yet.
    pub(crate) fn admit(&self, name: &str, force: bool, completion: Completion) -> Admission {
        if !force && self.registry.is_registered(name) {
            return Admission::Ready(completion, Ok(()));
        }

        let mut states = self.states.lock();
        let state = states.entry_ref(name).or_default();

        if !force {
            match state.phase {
                ResourcePhase::Loaded => return Admission::Ready(completion, Ok(())),
                ResourcePhase::Failed => {
                    return Admission::Ready(
                        completion,
                        Err(LoadError::PreviouslyFailed {
                            name: name.to_owned(),
                        }),
                    );
                }
                ResourcePhase::Unrequested | ResourcePhase::Loading => {}
            }
        }

        state.pending.push(completion);

        if force || state.phase != ResourcePhase::Loading {
            state.phase = ResourcePhase::Loading;
            Admission::Started
        } else {
            Admission::Joined {
                waiters: state.pending.len(),
            }
        }
    }
}
