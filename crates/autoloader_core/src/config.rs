//! Loader configuration.
//!
//! [`LoaderConfig`] is the whole configuration surface of a loader. Every
//! field has a default, so a configuration can be built in code or read from
//! a partial JSON document:
//!
//! ```
//! use autoloader_core::LoaderConfig;
//!
//! let config = LoaderConfig::from_json(r#"{
//!     "basePath": "/assets/prism/",
//!     "useMinified": false,
//!     "dependencyOverrides": { "vue": ["markup", "javascript"], "svelte": "markup" },
//!     "aliasOverrides": { "mjs": "javascript" }
//! }"#).unwrap();
//!
//! assert_eq!(config.base_path, "/assets/prism/");
//! assert_eq!(config.ignored_language, "none");
//! ```

use std::sync::LazyLock;

use hashbrown::HashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Matches the loader's own script inside a standard project layout.
static AUTOLOADER_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bplugins/autoloader/prism-autoloader\.(?:min\.)?js(?:\?[^\r\n/]*)?$")
        .expect("autoloader script pattern is valid")
});

/// Matches any script bundle such as a custom `prism.js` download.
static BUNDLE_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^|/)[\w-]+\.(?:min\.)?js(?:\?[^\r\n/]*)?$")
        .expect("bundle script pattern is valid")
});

/// Dependencies declared for one grammar: a single name or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyList {
    /// A single dependency.
    One(String),
    /// Dependencies in load order.
    Many(Vec<String>),
}

impl DependencyList {
    /// Returns the dependencies as an ordered list.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name],
            Self::Many(names) => names,
        }
    }
}

impl From<Vec<String>> for DependencyList {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}

/// Configuration for a loader.
///
/// Override maps are merged over the built-in presets at lookup time; an
/// override replaces the preset entry for the same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Directory prefix of generated locators.
    pub base_path: String,
    /// Whether generated locators point at minified files.
    pub use_minified: bool,
    /// File name prefix of generated locators.
    pub prefix: String,
    /// File extension of generated locators.
    pub extension: String,
    /// Dependency lists replacing the preset lists, keyed by canonical name.
    pub dependency_overrides: HashMap<String, DependencyList>,
    /// Aliases merged over the preset aliases.
    pub alias_overrides: HashMap<String, String>,
    /// Explicit locators, keyed by canonical name.
    pub locator_overrides: HashMap<String, String>,
    /// Language name that never triggers autoloading.
    #[serde(rename = "ignoredLanguageName", alias = "ignoredLanguage")]
    pub ignored_language: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_path: Self::DEFAULT_BASE_PATH.to_owned(),
            use_minified: true,
            prefix: Self::DEFAULT_PREFIX.to_owned(),
            extension: Self::DEFAULT_EXTENSION.to_owned(),
            dependency_overrides: HashMap::new(),
            alias_overrides: HashMap::new(),
            locator_overrides: HashMap::new(),
            ignored_language: Self::DEFAULT_IGNORED_LANGUAGE.to_owned(),
        }
    }
}

impl LoaderConfig {
    /// Default directory prefix.
    pub const DEFAULT_BASE_PATH: &'static str = "components/";
    /// Default file name prefix.
    pub const DEFAULT_PREFIX: &'static str = "prism-";
    /// Default file extension.
    pub const DEFAULT_EXTENSION: &'static str = ".js";
    /// Default ignored language.
    pub const DEFAULT_IGNORED_LANGUAGE: &'static str = "none";

    /// Reads a configuration from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the input is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Infers the grammar directory from the URL of the hosting script.
    ///
    /// A URL of the loader's own script inside a standard project layout
    /// (`.../plugins/autoloader/prism-autoloader.js`) maps to the project's
    /// `components/` directory. Any other script bundle maps to a
    /// `components/` directory next to it. Returns `None` for URLs that are
    /// not scripts.
    ///
    /// # Example
    ///
    /// ```
    /// use autoloader_core::LoaderConfig;
    ///
    /// assert_eq!(
    ///     LoaderConfig::base_path_from_script("https://cdn.example.com/prism/plugins/autoloader/prism-autoloader.min.js"),
    ///     Some("https://cdn.example.com/prism/components/".to_string())
    /// );
    /// assert_eq!(
    ///     LoaderConfig::base_path_from_script("/js/prism.js?v=3"),
    ///     Some("/js/components/".to_string())
    /// );
    /// ```
    #[must_use]
    pub fn base_path_from_script(src: &str) -> Option<String> {
        if AUTOLOADER_SCRIPT.is_match(src) {
            Some(AUTOLOADER_SCRIPT.replace(src, "components/").into_owned())
        } else if BUNDLE_SCRIPT.is_match(src) {
            Some(BUNDLE_SCRIPT.replace(src, "${1}components/").into_owned())
        } else {
            None
        }
    }

    /// Sets the base path.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Sets the base path from the hosting script URL, if it can be inferred.
    #[must_use]
    pub fn with_script_source(mut self, src: &str) -> Self {
        match Self::base_path_from_script(src) {
            Some(base_path) => self.base_path = base_path,
            None => tracing::debug!(%src, "no base path inferable from script source"),
        }
        self
    }

    /// Sets whether generated locators point at minified files.
    #[must_use]
    pub fn with_use_minified(mut self, use_minified: bool) -> Self {
        self.use_minified = use_minified;
        self
    }

    /// Sets the file name prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the file extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Replaces the dependency list of `name`.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, name: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dependencies: Vec<String> = dependencies.into_iter().map(Into::into).collect();
        self.dependency_overrides
            .insert(name.into(), dependencies.into());
        self
    }

    /// Adds an alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.alias_overrides.insert(alias.into(), target.into());
        self
    }

    /// Sets an explicit locator for `name`.
    #[must_use]
    pub fn with_locator_override(
        mut self,
        name: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        self.locator_overrides.insert(name.into(), locator.into());
        self
    }

    /// Sets the language name that never triggers autoloading.
    #[must_use]
    pub fn with_ignored_language(mut self, language: impl Into<String>) -> Self {
        self.ignored_language = language.into();
        self
    }
}
