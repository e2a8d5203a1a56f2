//! Lifecycle hooks for grammar loading.
//!
//! Hooks let plugins observe what the loader does: requests, coalesced
//! requests, fetches, settlements and batch outcomes.
//!
//! # Design Principles
//!
//! - Hooks execute in registration order
//! - Hooks run synchronously inside the loader and must not block
//! - Hooks run outside the registry lock and may call back into the loader
//! - Primary use case: tracing, metrics, logging, debugging
//!
//! # Architecture
//!
//! - **Schedule markers** ([`schedule`]): Empty types that identify hook points
//! - **Events** ([`events`]): `LoadEvent` enum carrying context to hooks
//! - **API** ([`api`]): Registration and invocation mechanism
//!
//! # Example
//!
//! ```
//! use autoloader_runtime::hooks::{HooksAPI, LoadEvent};
//! use autoloader_runtime::hooks::schedule::{OnFetchComplete, OnFetchError, OnFetchStart};
//!
//! let hooks = HooksAPI::new();
//!
//! hooks.register_observer::<OnFetchStart, _>("logger", |event: &LoadEvent| {
//!     if let LoadEvent::FetchStart { name, locator } = event {
//!         tracing::info!(%name, %locator, "fetching grammar");
//!     }
//! }).unwrap();
//!
//! hooks.register_observer::<(OnFetchComplete, OnFetchError), _>(
//!     "tracker",
//!     |event: &LoadEvent| match event {
//!         LoadEvent::FetchComplete { name, duration, .. } => {
//!             tracing::info!(%name, ?duration, "fetched");
//!         }
//!         LoadEvent::FetchError { name, error, .. } => {
//!             tracing::warn!(%name, %error, "fetch failed");
//!         }
//!         _ => {}
//!     },
//! ).unwrap();
//! ```

pub mod api;
pub mod events;
pub mod schedule;

pub use api::{HookRegistrationError, HooksAPI};
pub use events::LoadEvent;
