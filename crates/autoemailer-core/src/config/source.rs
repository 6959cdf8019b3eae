//! Named-value lookup.

use std::collections::HashMap;

/// A read-only source of named configuration values.
pub trait ConfigSource {
    /// Returns the value for `name`, or `None` if unset or empty.
    fn get(&self, name: &str) -> Option<String>;

    /// Returns true if any name starts with `prefix`.
    fn has_prefix(&self, prefix: &str) -> bool;
}

impl<S: ConfigSource + ?Sized> ConfigSource for &S {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn has_prefix(&self, prefix: &str) -> bool {
        (**self).has_prefix(prefix)
    }
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }

    fn has_prefix(&self, prefix: &str) -> bool {
        std::env::vars_os().any(|(key, _)| key.to_string_lossy().starts_with(prefix))
    }
}

/// An in-memory set of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigSource for MapSource {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).filter(|value| !value.is_empty()).cloned()
    }

    fn has_prefix(&self, prefix: &str) -> bool {
        self.values.keys().any(|key| key.starts_with(prefix))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_map_source_lookup() {
        let source = MapSource::new()
            .with("EMAILER_SENDER", "a@gmail.com")
            .with("EMAILER_HOST", "");

        assert_eq!(source.get("EMAILER_SENDER").as_deref(), Some("a@gmail.com"));
        assert_eq!(source.get("EMAILER_HOST"), None);
        assert_eq!(source.get("EMAILER_PORT"), None);
    }

    #[test]
    fn test_prefix_counts_empty_values() {
        let source: MapSource = [("EMAILER_HOST", "")].into_iter().collect();
        assert!(source.has_prefix("EMAILER_"));
        assert!(!MapSource::new().has_prefix("EMAILER_"));
    }

    #[test]
    fn test_env_source_reads_process_environment() {
        // PATH is set in every test environment we run in.
        assert!(EnvSource.get("PATH").is_some());
        assert!(!EnvSource.has_prefix("AUTOEMAILER_TEST_UNSET_PREFIX_"));
    }
}
