//! Explicit environment snapshots.
//!
//! Nothing in the library reads `std::env` directly. The binary captures the
//! process environment once with [`EnvMap::from_process`] and threads the map
//! through configuration loading, branch/remote resolution and every `git`
//! invocation. Tests build maps by hand.

use std::collections::BTreeMap;

/// Variables that would redirect `git` away from the working directory it
/// is given. They are dropped when snapshotting the process environment.
const REPO_REDIRECT_VARS: &[&str] = &[
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_OBJECT_DIRECTORY",
    "GIT_COMMON_DIR",
];

/// An ordered set of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMap {
    vars: BTreeMap<String, String>,
}

impl EnvMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the current process environment.
    pub fn from_process() -> Self {
        std::env::vars()
            .filter(|(key, _)| !REPO_REDIRECT_VARS.contains(&key.as_str()))
            .collect()
    }

    /// Adds or replaces a variable, returning the map for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Returns the value of `key` if it is set to a non-empty string.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Whether `key` is present at all, even with an empty value.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Returns the first non-empty value among `keys`, in order.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for EnvMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_treats_empty_as_unset() {
        let env = EnvMap::new().with("A", "").with("B", "value");
        assert_eq!(env.get("A"), None);
        assert_eq!(env.get("B"), Some("value"));
        assert_eq!(env.get("C"), None);
        assert!(env.contains("A"));
        assert!(!env.contains("C"));
    }

    #[test]
    fn test_first_of_respects_order() {
        let env = EnvMap::new().with("SECOND", "2").with("THIRD", "3");
        assert_eq!(env.first_of(&["FIRST", "SECOND", "THIRD"]), Some("2"));
        assert_eq!(env.first_of(&["THIRD", "SECOND"]), Some("3"));
        assert_eq!(env.first_of(&["MISSING"]), None);
    }

    #[test]
    fn test_from_iterator_keeps_last_duplicate() {
        let env: EnvMap = vec![
            ("K".to_string(), "old".to_string()),
            ("K".to_string(), "new".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(env.get("K"), Some("new"));
    }
}
