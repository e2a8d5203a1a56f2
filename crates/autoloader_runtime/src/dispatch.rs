//! Completion dispatcher.
//!
//! Every settlement reaches its callers through [`dispatch`], including
//! cache hits and cached failures. Callers therefore never observe a
//! settlement inline with the call that produced it.

use std::panic::{AssertUnwindSafe, catch_unwind};

use autoloader_core::LoadError;

/// Outcome delivered to every caller waiting on a grammar.
pub type Settlement = Result<(), LoadError>;

/// A caller waiting on a grammar. Invoked exactly once.
pub type Completion = Box<dyn FnOnce(Settlement) + Send + 'static>;

/// Boxes a closure as a [`Completion`].
pub fn completion(f: impl FnOnce(Settlement) + Send + 'static) -> Completion {
    Box::new(f)
}

/// Runs `completions` for grammar `name` in order on a freshly spawned task,
/// each with its own copy of `settlement`.
///
/// A completion that panics is logged and skipped. The ones queued after it
/// still run.
///
/// Does nothing when `completions` is empty.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn dispatch(name: &str, completions: Vec<Completion>, settlement: Settlement) {
    if completions.is_empty() {
        return;
    }

    let name = name.to_owned();
    tokio::spawn(async move {
        for (index, completion) in completions.into_iter().enumerate() {
            let settlement = settlement.clone();
            if let Err(payload) = catch_unwind(AssertUnwindSafe(move || completion(settlement))) {
                tracing::error!(
                    %name,
                    index,
                    panic = panic_message(payload.as_ref()),
                    "completion panicked"
                );
            }
        }
    });
}

fn panic_message(payload: &(dyn core::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string payload>")
}
