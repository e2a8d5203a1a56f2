//! Schedule markers for loader lifecycle events.
//!
//! A schedule is identified by a marker type wrapped in a [`ScheduleId`].
//! Event data is provided via the unified [`LoadEvent`](super::events::LoadEvent)
//! enum, which all hooks receive.

use core::any::TypeId;
use variadics_please::all_tuples;

/// Identifier for a hook schedule, derived from a marker type.
///
/// # Example
///
/// ```
/// use autoloader_runtime::hooks::schedule::{OnSettle, ScheduleId};
///
/// let schedule = ScheduleId::of::<OnSettle>();
/// assert!(schedule.type_name().ends_with("OnSettle"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleId {
    type_id: TypeId,
    type_name: &'static str,
}

impl ScheduleId {
    /// Creates a `ScheduleId` for the given schedule marker type.
    #[must_use]
    pub fn of<S: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<S>(),
            type_name: core::any::type_name::<S>(),
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

/// Marker trait for schedule types.
pub trait Schedule: 'static {}

/// Trait for types that can be converted into a list of schedule IDs.
///
/// Implemented for single schedules and tuples of schedules.
pub trait IntoScheduleIds {
    /// Returns the schedule IDs for this type.
    fn schedule_ids() -> Vec<ScheduleId>;
}

impl<S: Schedule> IntoScheduleIds for S {
    fn schedule_ids() -> Vec<ScheduleId> {
        vec![ScheduleId::of::<S>()]
    }
}

macro_rules! impl_into_schedule_ids_for_tuple {
    ($($S:ident),*) => {
        impl<$($S: Schedule),*> IntoScheduleIds for ($($S,)*) {
            fn schedule_ids() -> Vec<ScheduleId> {
                vec![$(ScheduleId::of::<$S>()),*]
            }
        }
    };
}

all_tuples!(impl_into_schedule_ids_for_tuple, 2, 12, S);

// ─────────────────────────────────────────────────────────────────────────────
// Request Schedules
// ─────────────────────────────────────────────────────────────────────────────

/// Marker type for hooks called when a single grammar is requested, after
/// alias resolution and before any cached state is consulted.
///
/// Event data: [`LoadEvent::Request`](super::events::LoadEvent::Request)
pub struct OnRequest;
impl Schedule for OnRequest {}

/// Marker type for hooks called when a request joins a load that is
/// already in flight instead of starting a new one.
///
/// Event data: [`LoadEvent::Coalesced`](super::events::LoadEvent::Coalesced)
pub struct OnCoalesce;
impl Schedule for OnCoalesce {}

// ─────────────────────────────────────────────────────────────────────────────
// Fetch Schedules
// ─────────────────────────────────────────────────────────────────────────────

/// Marker type for hooks called right before the fetch primitive runs.
/// All dependencies have loaded by this point.
///
/// Event data: [`LoadEvent::FetchStart`](super::events::LoadEvent::FetchStart)
pub struct OnFetchStart;
impl Schedule for OnFetchStart {}

/// Marker type for hooks called after a fetch succeeds.
///
/// Event data: [`LoadEvent::FetchComplete`](super::events::LoadEvent::FetchComplete)
pub struct OnFetchComplete;
impl Schedule for OnFetchComplete {}

/// Marker type for hooks called after a fetch fails.
///
/// Event data: [`LoadEvent::FetchError`](super::events::LoadEvent::FetchError)
pub struct OnFetchError;
impl Schedule for OnFetchError {}

/// Marker type for hooks called when a grammar fails because of its
/// dependencies, including dependency cycles.
///
/// Event data: [`LoadEvent::DependencyError`](super::events::LoadEvent::DependencyError)
pub struct OnDependencyError;
impl Schedule for OnDependencyError {}

/// Marker type for hooks called when a grammar settles and its waiting
/// callers are dispatched.
///
/// Event data: [`LoadEvent::Settle`](super::events::LoadEvent::Settle)
pub struct OnSettle;
impl Schedule for OnSettle {}

// ─────────────────────────────────────────────────────────────────────────────
// Batch Schedules
// ─────────────────────────────────────────────────────────────────────────────

/// Marker type for hooks called when every member of a batch has loaded.
///
/// Event data: [`LoadEvent::BatchComplete`](super::events::LoadEvent::BatchComplete)
pub struct OnBatchComplete;
impl Schedule for OnBatchComplete {}

/// Marker type for hooks called when the first member of a batch fails.
///
/// Event data: [`LoadEvent::BatchError`](super::events::LoadEvent::BatchError)
pub struct OnBatchError;
impl Schedule for OnBatchError {}
