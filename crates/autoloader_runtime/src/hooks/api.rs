//! Hook registration API for the loader.
//!
//! The [`HooksAPI`] is a registry of observers invoked as the loader moves
//! grammars through their lifecycle.
//!
//! # Multi-Schedule Registration
//!
//! Register hooks on multiple schedules using tuple syntax:
//!
//! ```
//! use autoloader_runtime::hooks::{HooksAPI, LoadEvent};
//! use autoloader_runtime::hooks::schedule::{OnFetchStart, OnSettle};
//!
//! let hooks = HooksAPI::new();
//! hooks.register_observer::<(OnFetchStart, OnSettle), _>("tracker", |event: &LoadEvent| {
//!     tracing::debug!(?event, "loader event");
//! }).unwrap();
//! ```

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use super::events::LoadEvent;
use super::schedule::{IntoScheduleIds, ScheduleId};

// ─────────────────────────────────────────────────────────────────────────────
// BoxedHook
// ─────────────────────────────────────────────────────────────────────────────

/// Type-erased hook that receives `&LoadEvent`.
///
/// Most users should use [`HooksAPI::register_observer`] instead of creating
/// a `BoxedHook` directly.
pub struct BoxedHook {
    handler: Box<dyn Fn(&LoadEvent) + Send + Sync>,
}

impl BoxedHook {
    /// Instantiates a new `BoxedHook` with the given handler.
    #[must_use]
    pub fn new(handler: impl Fn(&LoadEvent) + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
        }
    }

    /// Invokes the hook with the given event.
    pub fn invoke(&self, event: &LoadEvent) {
        (self.handler)(event);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRegistrationError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during hook registration.
#[derive(Debug, Clone)]
pub enum HookRegistrationError {
    /// A hook with this name already exists on the schedule.
    DuplicateName {
        /// The schedule where the duplicate was found.
        schedule: ScheduleId,
        /// The duplicate hook name.
        name: String,
    },
}

impl fmt::Display for HookRegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookRegistrationError::DuplicateName { schedule, name } => {
                write!(
                    f,
                    "hook '{}' already registered for schedule '{}'",
                    name,
                    schedule.type_name()
                )
            }
        }
    }
}

impl core::error::Error for HookRegistrationError {}

// ─────────────────────────────────────────────────────────────────────────────
// HooksAPI
// ─────────────────────────────────────────────────────────────────────────────

struct HookEntry {
    name: String,
    hook: Arc<BoxedHook>,
}

/// API for registering and invoking loader hooks.
///
/// # Thread Safety
///
/// The `HooksAPI` uses interior mutability via [`RwLock`] so hooks can be
/// registered while the loader is running. Handlers run after the lock is
/// released, so they may call back into the loader or register more hooks.
#[derive(Default)]
pub struct HooksAPI {
    hooks: RwLock<HashMap<ScheduleId, Vec<HookEntry>>>,
}

impl fmt::Debug for HooksAPI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks = self.hooks.read();
        let mut map = f.debug_map();
        for (schedule, entries) in hooks.iter() {
            let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
            map.entry(&schedule.type_name(), &names);
        }
        map.finish()
    }
}

impl HooksAPI {
    /// Creates a new empty hooks registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new(HashMap::new()),
        }
    }

    /// Registers an observer hook for one or more schedules.
    ///
    /// When registered on several schedules, each registration is named
    /// `name@<schedule type name>`.
    ///
    /// # Errors
    ///
    /// Returns [`HookRegistrationError::DuplicateName`] if a hook with the
    /// same name already exists on one of the schedules. Registrations on
    /// earlier schedules of the tuple are kept.
    pub fn register_observer<S, F>(
        &self,
        name: impl Into<String>,
        hook: F,
    ) -> Result<&Self, HookRegistrationError>
    where
        S: IntoScheduleIds,
        F: Fn(&LoadEvent) + Send + Sync + 'static,
    {
        let schedules = S::schedule_ids();
        let name = name.into();
        let hook = Arc::new(hook);

        for schedule in &schedules {
            let hook_name = if schedules.len() > 1 {
                format!("{}@{}", name, schedule.type_name())
            } else {
                name.clone()
            };
            let hook = Arc::clone(&hook);

            self.register_boxed(
                *schedule,
                hook_name,
                BoxedHook::new(move |event: &LoadEvent| hook(event)),
            )?;
        }
        Ok(self)
    }

    /// Registers a pre-built [`BoxedHook`] for the given schedule.
    ///
    /// # Errors
    ///
    /// Returns [`HookRegistrationError::DuplicateName`] if the name is taken
    /// on this schedule.
    pub fn register_boxed(
        &self,
        schedule: ScheduleId,
        name: impl Into<String>,
        hook: BoxedHook,
    ) -> Result<(), HookRegistrationError> {
        let name = name.into();

        let mut hooks = self.hooks.write();
        let entries = hooks.entry(schedule).or_default();

        if entries.iter().any(|entry| entry.name == name) {
            return Err(HookRegistrationError::DuplicateName { schedule, name });
        }

        entries.push(HookEntry {
            name,
            hook: Arc::new(hook),
        });
        Ok(())
    }

    /// Invokes all hooks registered for the given schedule, in registration order.
    ///
    /// Hooks registered while this call runs are not invoked for `event`.
    pub fn invoke(&self, schedule: ScheduleId, event: &LoadEvent) {
        let handlers: Vec<Arc<BoxedHook>> = self
            .hooks
            .read()
            .get(&schedule)
            .map(|entries| entries.iter().map(|entry| Arc::clone(&entry.hook)).collect())
            .unwrap_or_default();

        for handler in handlers {
            handler.invoke(event);
        }
    }

    /// Returns the number of hooks registered for the given schedule.
    #[must_use]
    pub fn hook_count(&self, schedule: ScheduleId) -> usize {
        let hooks = self.hooks.read();
        hooks.get(&schedule).map_or(0, Vec::len)
    }

    /// Checks if a hook with the given name exists on the schedule.
    #[must_use]
    pub fn contains_hook(&self, schedule: ScheduleId, name: &str) -> bool {
        let hooks = self.hooks.read();
        hooks
            .get(&schedule)
            .is_some_and(|entries| entries.iter().any(|entry| entry.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::schedule::{OnFetchComplete, OnFetchStart, OnSettle};
    use std::sync::Mutex;

    fn settle_event() -> LoadEvent {
        LoadEvent::Settle {
            name: "css".into(),
            waiters: 2,
            success: true,
        }
    }

    #[test]
    fn hooks_api_register_increments_count() {
        let api = HooksAPI::new();
        let schedule = ScheduleId::of::<OnSettle>();

        api.register_observer::<OnSettle, _>("first", |_: &LoadEvent| {})
            .expect("registration should succeed");
        api.register_observer::<OnSettle, _>("second", |_: &LoadEvent| {})
            .expect("registration should succeed");

        assert_eq!(api.hook_count(schedule), 2);
        assert!(api.contains_hook(schedule, "first"));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let api = HooksAPI::new();
        api.register_observer::<OnSettle, _>("dup", |_: &LoadEvent| {})
            .expect("registration should succeed");

        let err = api
            .register_observer::<OnSettle, _>("dup", |_: &LoadEvent| {})
            .expect_err("duplicate should be rejected");
        assert!(err.to_string().contains("hook 'dup' already registered"));
    }

    #[test]
    fn hooks_invoked_in_registration_order() {
        let api = HooksAPI::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for label in ["a", "b", "c"] {
            let order = Arc::clone(&order);
            api.register_observer::<OnSettle, _>(label, move |_: &LoadEvent| {
                order.lock().unwrap().push(label);
            })
            .expect("registration should succeed");
        }

        api.invoke(ScheduleId::of::<OnSettle>(), &settle_event());
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn multi_schedule_registration_names_each_schedule() {
        let api = HooksAPI::new();
        api.register_observer::<(OnFetchStart, OnFetchComplete), _>("tracker", |_: &LoadEvent| {})
            .expect("registration should succeed");

        let start = ScheduleId::of::<OnFetchStart>();
        let complete = ScheduleId::of::<OnFetchComplete>();
        assert_eq!(api.hook_count(start), 1);
        assert_eq!(api.hook_count(complete), 1);
        assert!(api.contains_hook(start, &format!("tracker@{}", start.type_name())));
    }

    #[test]
    fn invoke_only_reaches_matching_schedule() {
        let api = HooksAPI::new();
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        api.register_observer::<OnFetchStart, _>("count", move |_: &LoadEvent| {
            *counter.lock().unwrap() += 1;
        })
        .expect("registration should succeed");

        api.invoke(ScheduleId::of::<OnSettle>(), &settle_event());
        assert_eq!(*hits.lock().unwrap(), 0);
    }

    #[test]
    fn handler_may_register_hooks_while_invoked() {
        let api = Arc::new(HooksAPI::new());
        let registry = Arc::clone(&api);
        api.register_observer::<OnSettle, _>("spawner", move |_: &LoadEvent| {
            let _ = registry.register_observer::<OnSettle, _>("spawned", |_: &LoadEvent| {});
        })
        .expect("registration should succeed");

        let schedule = ScheduleId::of::<OnSettle>();
        api.invoke(schedule, &settle_event());

        assert_eq!(api.hook_count(schedule), 2);
        assert!(api.contains_hook(schedule, "spawned"));
    }
}
