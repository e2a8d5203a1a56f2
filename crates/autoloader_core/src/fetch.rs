//! The single-shot fetch primitive.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchError;

/// Loads one external grammar identified by a locator.
///
/// A fetch settles exactly once, with success or failure. The loader never
/// retries a failed fetch and never cancels one that has started, so
/// timeouts belong inside implementations of this trait.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use autoloader_core::{FetchError, Fetcher};
///
/// struct BundledOnly;
///
/// #[async_trait]
/// impl Fetcher for BundledOnly {
///     async fn fetch(&self, locator: &str) -> Result<(), FetchError> {
///         Err(FetchError::NotFound { locator: locator.to_owned() })
///     }
/// }
/// ```
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// Fetches the grammar at `locator`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the grammar could not be loaded.
    async fn fetch(&self, locator: &str) -> Result<(), FetchError>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, locator: &str) -> Result<(), FetchError> {
        (**self).fetch(locator).await
    }
}
