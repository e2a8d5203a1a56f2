//! Layered alias and dependency tables.
//!
//! Each table has two layers: a preset layer fixed at construction and an
//! override layer that may change at any time. Lookups consult the override
//! layer first, so an override always wins over a preset entry with the same
//! key. Dependency overrides replace the preset list; they are never merged.

use hashbrown::{HashMap, HashSet};
use parking_lot::RwLock;

use crate::config::LoaderConfig;
use crate::name::LoadSpec;
use crate::presets::{PRESET_ALIASES, PRESET_DEPENDENCIES};

/// A preset map with a mutable override layer on top.
#[derive(Debug)]
struct Layered<V> {
    preset: HashMap<String, V>,
    overrides: RwLock<HashMap<String, V>>,
}

impl<V> Default for Layered<V> {
    fn default() -> Self {
        Self {
            preset: HashMap::new(),
            overrides: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone> Layered<V> {
    fn with_preset(preset: HashMap<String, V>) -> Self {
        Self {
            preset,
            overrides: RwLock::new(HashMap::new()),
        }
    }

    fn get(&self, key: &str) -> Option<V> {
        if let Some(value) = self.overrides.read().get(key) {
            return Some(value.clone());
        }
        self.preset.get(key).cloned()
    }

    fn set(&self, key: String, value: V) -> Option<V> {
        self.overrides.write().insert(key, value)
    }

    fn remove(&self, key: &str) -> Option<V> {
        self.overrides.write().remove(key)
    }
}

/// Alias and dependency tables shared by a loader.
///
/// # Example
///
/// ```
/// use autoloader_core::Tables;
///
/// let tables = Tables::with_presets();
/// assert_eq!(tables.resolve_alias("js"), "javascript");
/// assert_eq!(tables.dependencies("javascript"), vec!["clike".to_string()]);
///
/// tables.set_alias("js", "typescript");
/// assert_eq!(tables.resolve_alias("js"), "typescript");
/// ```
#[derive(Debug, Default)]
pub struct Tables {
    aliases: Layered<String>,
    dependencies: Layered<Vec<String>>,
}

impl Tables {
    /// Creates tables with empty preset layers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates tables seeded with the built-in presets.
    #[must_use]
    pub fn with_presets() -> Self {
        Self::from_presets(
            PRESET_ALIASES.iter().map(|(alias, target)| (*alias, *target)),
            PRESET_DEPENDENCIES
                .iter()
                .map(|(name, deps)| (*name, deps.iter().copied())),
        )
    }

    /// Creates tables with custom preset layers.
    pub fn from_presets<A, D, I, K, V, N, E>(aliases: A, dependencies: D) -> Self
    where
        A: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
        D: IntoIterator<Item = (N, I)>,
        N: Into<String>,
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        let aliases = aliases
            .into_iter()
            .map(|(alias, target)| (alias.into(), target.into()))
            .collect();
        let dependencies = dependencies
            .into_iter()
            .map(|(name, deps)| (name.into(), deps.into_iter().map(Into::into).collect()))
            .collect();

        Self {
            aliases: Layered::with_preset(aliases),
            dependencies: Layered::with_preset(dependencies),
        }
    }

    /// Copies the alias and dependency overrides of `config` into the
    /// override layers, replacing existing overrides with the same keys.
    pub fn apply_config(&self, config: &LoaderConfig) {
        {
            let mut aliases = self.aliases.overrides.write();
            for (alias, target) in &config.alias_overrides {
                aliases.insert(alias.clone(), target.clone());
            }
        }
        let mut dependencies = self.dependencies.overrides.write();
        for (name, list) in &config.dependency_overrides {
            dependencies.insert(name.clone(), list.clone().into_vec());
        }
        tracing::debug!(
            aliases = config.alias_overrides.len(),
            dependencies = config.dependency_overrides.len(),
            "applied table overrides"
        );
    }

    /// Maps `name` to its canonical name.
    ///
    /// Resolution is a single hop: the target of an alias is assumed to be
    /// canonical. Unknown names are returned unchanged.
    #[must_use]
    pub fn resolve_alias(&self, name: &str) -> String {
        self.aliases.get(name).unwrap_or_else(|| name.to_owned())
    }

    /// Returns the declared dependencies of a canonical name, in order.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Vec<String> {
        self.dependencies.get(name).unwrap_or_default()
    }

    /// Overrides the alias for `alias`, returning the previous override.
    pub fn set_alias(&self, alias: impl Into<String>, target: impl Into<String>) -> Option<String> {
        self.aliases.set(alias.into(), target.into())
    }

    /// Removes an alias override, restoring the preset entry if any.
    pub fn remove_alias(&self, alias: &str) -> Option<String> {
        self.aliases.remove(alias)
    }

    /// Replaces the dependency list of `name`, returning the previous override.
    ///
    /// An empty list is a valid override: it hides the preset dependencies.
    pub fn set_dependencies<I, S>(&self, name: impl Into<String>, dependencies: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.set(
            name.into(),
            dependencies.into_iter().map(Into::into).collect(),
        )
    }

    /// Removes a dependency override, restoring the preset entry if any.
    pub fn remove_dependencies(&self, name: &str) -> Option<Vec<String>> {
        self.dependencies.remove(name)
    }

    /// Looks for a dependency cycle reachable from the canonical `name`.
    ///
    /// Dependencies are followed after force-marker stripping and alias
    /// resolution, exactly as the loader would request them. Returns the
    /// names on the cycle with the first name repeated at the end.
    ///
    /// # Example
    ///
    /// ```
    /// use autoloader_core::Tables;
    ///
    /// let tables = Tables::new();
    /// tables.set_dependencies("a", ["b"]);
    /// tables.set_dependencies("b", ["a"]);
    ///
    /// assert_eq!(
    ///     tables.dependency_cycle("a"),
    ///     Some(vec!["a".to_string(), "b".to_string(), "a".to_string()])
    /// );
    /// ```
    #[must_use]
    pub fn dependency_cycle(&self, name: &str) -> Option<Vec<String>> {
        let mut path = Vec::new();
        let mut acyclic = HashSet::new();
        self.find_cycle(name.to_owned(), &mut path, &mut acyclic)
    }

    fn find_cycle(
        &self,
        name: String,
        path: &mut Vec<String>,
        acyclic: &mut HashSet<String>,
    ) -> Option<Vec<String>> {
        if let Some(start) = path.iter().position(|visited| *visited == name) {
            let mut cycle = path[start..].to_vec();
            cycle.push(name);
            return Some(cycle);
        }
        if acyclic.contains(&name) {
            return None;
        }

        path.push(name.clone());
        for dependency in self.dependencies(&name) {
            let dependency = self.resolve_alias(LoadSpec::parse(&dependency).name());
            if let Some(cycle) = self.find_cycle(dependency, path, acyclic) {
                return Some(cycle);
            }
        }
        path.pop();
        acyclic.insert(name);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tables() -> Tables {
        Tables::from_presets(
            [("js", "javascript"), ("py", "python")],
            [("javascript", vec!["clike"]), ("tsx", vec!["jsx", "typescript"])],
        )
    }

    #[test]
    fn unknown_name_resolves_to_itself() {
        assert_eq!(tables().resolve_alias("rust"), "rust");
    }

    #[test]
    fn alias_resolution_is_single_hop() {
        let tables = tables();
        tables.set_alias("ecmascript", "js");
        assert_eq!(tables.resolve_alias("ecmascript"), "js");
    }

    #[test]
    fn override_alias_wins_over_preset() {
        let tables = tables();
        tables.set_alias("py", "python3");
        assert_eq!(tables.resolve_alias("py"), "python3");

        tables.remove_alias("py");
        assert_eq!(tables.resolve_alias("py"), "python");
    }

    #[test]
    fn dependency_override_replaces_preset_list() {
        let tables = tables();
        tables.set_dependencies("tsx", ["typescript"]);
        assert_eq!(tables.dependencies("tsx"), vec!["typescript".to_string()]);

        tables.set_dependencies("javascript", Vec::<String>::new());
        assert!(tables.dependencies("javascript").is_empty());
    }

    #[test]
    fn missing_dependencies_are_empty() {
        assert!(tables().dependencies("clike").is_empty());
    }

    #[test]
    fn presets_have_no_cycles() {
        let tables = Tables::with_presets();
        for (name, _) in PRESET_DEPENDENCIES {
            assert_eq!(tables.dependency_cycle(name), None, "cycle from '{name}'");
        }
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let tables = Tables::new();
        tables.set_dependencies("a", ["a"]);
        assert_eq!(
            tables.dependency_cycle("a"),
            Some(vec!["a".to_string(), "a".to_string()])
        );
    }

    #[test]
    fn cycle_through_alias_and_force_marker_is_found() {
        let tables = Tables::new();
        tables.set_alias("bee", "b");
        tables.set_dependencies("a", ["!bee"]);
        tables.set_dependencies("b", ["c"]);
        tables.set_dependencies("c", ["a"]);

        assert_eq!(
            tables.dependency_cycle("a"),
            Some(vec!["a".into(), "b".into(), "c".into(), "a".into()])
        );
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let tables = Tables::new();
        tables.set_dependencies("top", ["left", "right"]);
        tables.set_dependencies("left", ["base"]);
        tables.set_dependencies("right", ["base"]);
        assert_eq!(tables.dependency_cycle("top"), None);
    }

    proptest! {
        #[test]
        fn forward_edges_never_form_a_cycle(
            edges in proptest::collection::vec((0usize..12, 0usize..12), 0..40)
        ) {
            let tables = Tables::new();
            let mut adjacency: HashMap<usize, Vec<String>> = HashMap::new();
            for (from, to) in edges {
                let (from, to) = (from.min(to), from.max(to));
                if from != to {
                    adjacency.entry(from).or_default().push(format!("n{to}"));
                }
            }
            for (from, deps) in adjacency {
                tables.set_dependencies(format!("n{from}"), deps);
            }
            for node in 0..12 {
                prop_assert_eq!(tables.dependency_cycle(&format!("n{node}")), None);
            }
        }
    }
}
