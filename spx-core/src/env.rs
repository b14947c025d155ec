//! Environment variable access.
//!
//! Configuration is read through an [`EnvProvider`] so that programs use the
//! process environment ([`StandardEnv`]) while tests supply a fixed map
//! ([`MapEnv`]) instead of mutating global state.

use std::collections::BTreeMap;

/// A source of environment variables.
pub trait EnvProvider {
    /// Returns the value of `name`, or `None` if it is unset or not valid
    /// unicode.
    fn var(&self, name: &str) -> Option<String>;

    /// Returns the value of `name` if it is set and not blank.
    fn non_empty(&self, name: &str) -> Option<String> {
        self.var(name).filter(|value| !value.trim().is_empty())
    }

    /// Returns the value of `name`, or `default` if it is unset or blank.
    fn var_or(&self, name: &str, default: &str) -> String {
        self.non_empty(name).unwrap_or_else(|| default.to_owned())
    }
}

/// Environment provider backed by `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEnv;

impl EnvProvider for StandardEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Environment provider backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MapEnv(BTreeMap<String, String>);

impl MapEnv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl EnvProvider for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
