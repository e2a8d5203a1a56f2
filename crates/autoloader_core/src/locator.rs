//! Maps canonical grammar names to fetchable locators.

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::config::LoaderConfig;

/// Computes the locator handed to the [`Fetcher`](crate::Fetcher).
///
/// An explicit per-name override always wins. Otherwise the locator is
/// `<base_path><prefix><name>[.min]<extension>`.
///
/// # Example
///
/// ```
/// use autoloader_core::{LoaderConfig, Locator};
///
/// let locator = Locator::from_config(&LoaderConfig::default());
/// assert_eq!(locator.locate("rust"), "components/prism-rust.min.js");
///
/// locator.set_override("rust", "https://cdn.example.com/rust.js");
/// assert_eq!(locator.locate("rust"), "https://cdn.example.com/rust.js");
/// ```
#[derive(Debug)]
pub struct Locator {
    base_path: String,
    prefix: String,
    extension: String,
    use_minified: bool,
    overrides: RwLock<HashMap<String, String>>,
}

impl Default for Locator {
    fn default() -> Self {
        Self::from_config(&LoaderConfig::default())
    }
}

impl Locator {
    /// Minified files carry this suffix before the extension.
    pub const MINIFIED_SUFFIX: &'static str = ".min";

    /// Creates a locator from the path settings and overrides in `config`.
    #[must_use]
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self {
            base_path: config.base_path.clone(),
            prefix: config.prefix.clone(),
            extension: config.extension.clone(),
            use_minified: config.use_minified,
            overrides: RwLock::new(
                config
                    .locator_overrides
                    .iter()
                    .map(|(name, locator)| (name.clone(), locator.clone()))
                    .collect(),
            ),
        }
    }

    /// Returns the locator for the canonical `name`.
    #[must_use]
    pub fn locate(&self, name: &str) -> String {
        if let Some(locator) = self.overrides.read().get(name) {
            return locator.clone();
        }

        let suffix = if self.use_minified {
            Self::MINIFIED_SUFFIX
        } else {
            ""
        };
        format!(
            "{}{}{name}{suffix}{}",
            self.base_path, self.prefix, self.extension
        )
    }

    /// Sets an explicit locator for `name`, returning the previous override.
    pub fn set_override(&self, name: impl Into<String>, locator: impl Into<String>) -> Option<String> {
        self.overrides.write().insert(name.into(), locator.into())
    }

    /// Removes the explicit locator for `name`.
    pub fn remove_override(&self, name: &str) -> Option<String> {
        self.overrides.write().remove(name)
    }

    /// Returns the base path prepended to generated locators.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns whether generated locators point at minified files.
    #[must_use]
    pub fn use_minified(&self) -> bool {
        self.use_minified
    }
}
