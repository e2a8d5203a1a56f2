//! Content-settled trigger for the grammar autoloader.
//!
//! When a host finishes rendering a code element it reports the element and
//! its primary language. [`AutoloadTrigger`] works out which grammars the
//! element needs, loads whatever is missing and asks the host to render the
//! element again once everything is available.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use autoloader_core::{FetchError, Fetcher};
//! use autoloader_runtime::Loader;
//! use autoloader_trigger::{AutoloadTrigger, ContentSettled, Element, Highlighter, TriggerOutcome};
//!
//! struct CodeBlock;
//!
//! impl Element for CodeBlock {
//!     fn attribute(&self, _name: &str) -> Option<String> {
//!         None
//!     }
//!
//!     fn container_attribute(&self, _name: &str) -> Option<String> {
//!         Some("markup, css".into())
//!     }
//! }
//!
//! struct Page;
//!
//! impl Highlighter<CodeBlock> for Page {
//!     fn rerender(&self, _element: &CodeBlock) {}
//! }
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
//! let trigger = AutoloadTrigger::new(Loader::new(AlwaysOk), Page);
//! let outcome = trigger.on_content_settled(ContentSettled::new(CodeBlock, "diff-javascript"));
//!
//! if let TriggerOutcome::Loading(handle) = outcome {
//!     handle.await.unwrap();
//! }
//! assert!(trigger.loader().is_loaded("diff"));
//! assert!(trigger.loader().is_loaded("css"));
//! # });
//! ```

use core::fmt;
use core::marker::PhantomData;
use std::sync::Arc;

use autoloader_runtime::Loader;
use tokio::task::JoinHandle;

/// Attribute listing extra grammars an element needs, comma separated.
pub const DEPENDENCIES_ATTRIBUTE: &str = "data-dependencies";

/// Name of the grammar loaded alongside `X` for languages of the form `diff-X`.
pub const DIFF_LANGUAGE: &str = "diff";

const DIFF_PREFIX: &str = "diff-";

/// A rendered element the trigger reads attributes from.
pub trait Element: Send + Sync + 'static {
    /// Returns the value of the element's attribute `name`.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Returns the value of attribute `name` on the element's immediate
    /// structural container, such as the `<pre>` around a `<code>`.
    fn container_attribute(&self, name: &str) -> Option<String>;
}

/// The host's rendering step.
pub trait Highlighter<E>: Send + Sync + 'static {
    /// Renders `element` again now that its grammars are available.
    fn rerender(&self, element: &E);
}

/// Notification that the host finished rendering an element.
#[derive(Debug)]
pub struct ContentSettled<E> {
    /// The rendered element.
    pub element: Option<Arc<E>>,
    /// The element's primary language.
    pub language: Option<String>,
}

impl<E> ContentSettled<E> {
    /// Creates a notification carrying both an element and a language.
    pub fn new(element: E, language: impl Into<String>) -> Self {
        Self {
            element: Some(Arc::new(element)),
            language: Some(language.into()),
        }
    }
}

/// What [`AutoloadTrigger::on_content_settled`] did.
#[derive(Debug)]
pub enum TriggerOutcome {
    /// The notification lacked an element or language, or named the ignored
    /// language.
    Ignored,
    /// Every grammar the element needs is already available.
    AlreadyAvailable,
    /// Missing grammars are loading. The task re-renders the element on
    /// success and does nothing on failure.
    Loading(JoinHandle<()>),
}

/// Returns the extra grammars declared on `element`, or failing that on
/// its container.
///
/// The attribute is trimmed and split on commas together with the
/// whitespace around them. A missing or blank attribute declares nothing.
pub fn element_dependencies<E: Element + ?Sized>(element: &E) -> Vec<String> {
    let declared = element
        .attribute(DEPENDENCIES_ATTRIBUTE)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            element
                .container_attribute(DEPENDENCIES_ATTRIBUTE)
                .map(|value| value.trim().to_owned())
        })
        .unwrap_or_default();

    if declared.is_empty() {
        return Vec::new();
    }
    declared.split(',').map(|name| name.trim().to_owned()).collect()
}

/// Returns every grammar needed to render `element` as `language`.
///
/// Extra dependencies come first. A language of the form `diff-X`
/// (case-insensitive prefix, non-empty `X`) needs `diff` and `X` instead of
/// itself.
pub fn requested_languages<E: Element + ?Sized>(element: &E, language: &str) -> Vec<String> {
    let mut names = element_dependencies(element);

    match diff_target(language) {
        Some(target) => {
            names.push(DIFF_LANGUAGE.to_owned());
            names.push(target.to_owned());
        }
        None => names.push(language.to_owned()),
    }
    names
}

fn diff_target(language: &str) -> Option<&str> {
    let prefix = language.get(..DIFF_PREFIX.len())?;
    let target = &language[DIFF_PREFIX.len()..];
    (prefix.eq_ignore_ascii_case(DIFF_PREFIX) && !target.is_empty()).then_some(target)
}

/// Loads missing grammars for rendered elements and re-renders them.
pub struct AutoloadTrigger<E, H> {
    loader: Loader,
    highlighter: Arc<H>,
    _element: PhantomData<fn(Arc<E>)>,
}

impl<E, H> fmt::Debug for AutoloadTrigger<E, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoloadTrigger")
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}

impl<E, H> AutoloadTrigger<E, H>
where
    E: Element,
    H: Highlighter<E>,
{
    /// Creates a trigger loading through `loader` and re-rendering through
    /// `highlighter`.
    pub fn new(loader: Loader, highlighter: H) -> Self {
        Self {
            loader,
            highlighter: Arc::new(highlighter),
            _element: PhantomData,
        }
    }

    /// Returns the loader grammars are requested from.
    #[must_use]
    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    /// Handles a content-settled notification.
    ///
    /// Load failures are swallowed: the element simply stays rendered as it
    /// was.
    ///
    /// # Panics
    ///
    /// Panics if grammars must be loaded outside a Tokio runtime.
    pub fn on_content_settled(&self, event: ContentSettled<E>) -> TriggerOutcome {
        let (Some(element), Some(language)) = (event.element, event.language) else {
            return TriggerOutcome::Ignored;
        };
        if language.is_empty() || language == self.loader.config().ignored_language {
            return TriggerOutcome::Ignored;
        }

        let names = requested_languages(element.as_ref(), &language);
        if names.iter().all(|name| self.loader.is_loaded(name)) {
            return TriggerOutcome::AlreadyAvailable;
        }

        tracing::debug!(%language, ?names, "loading grammars for rendered element");
        let highlighter = Arc::clone(&self.highlighter);
        TriggerOutcome::Loading(self.loader.load_many_with(
            names,
            move |_| highlighter.rerender(&element),
            move |name| tracing::debug!(%language, %name, "grammar unavailable, element left as rendered"),
        ))
    }
}
