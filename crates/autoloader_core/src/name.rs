//! Requested names and force markers.

use core::fmt;

/// Character that marks a request as a forced reload.
pub const FORCE_MARKER: char = '!';

/// A request for one grammar as written by a caller.
///
/// The raw form may carry a [`FORCE_MARKER`] anywhere in the string
/// (`"!python"`). The marker is stripped from [`name`](Self::name) and
/// recorded as [`force`](Self::force) instead. Alias resolution happens
/// later, against the loader's tables.
///
/// # Example
///
/// ```
/// use autoloader_core::LoadSpec;
///
/// let spec = LoadSpec::parse("!python");
/// assert_eq!(spec.name(), "python");
/// assert!(spec.force());
///
/// let spec = LoadSpec::parse("rust");
/// assert!(!spec.force());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadSpec {
    name: String,
    force: bool,
}

impl LoadSpec {
    /// Parses a raw requested name.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.contains(FORCE_MARKER) {
            Self {
                name: raw.replace(FORCE_MARKER, ""),
                force: true,
            }
        } else {
            Self {
                name: raw.to_owned(),
                force: false,
            }
        }
    }

    /// Creates a spec for `name` with the given force flag.
    #[must_use]
    pub fn new(name: impl Into<String>, force: bool) -> Self {
        Self {
            name: name.into(),
            force,
        }
    }

    /// Returns the name with all force markers removed.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether cached state should be bypassed.
    #[must_use]
    pub fn force(&self) -> bool {
        self.force
    }

    /// Consumes the spec, returning its name.
    #[must_use]
    pub fn into_name(self) -> String {
        self.name
    }
}

impl fmt::Display for LoadSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.force {
            write!(f, "{FORCE_MARKER}{}", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

impl From<&str> for LoadSpec {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}
