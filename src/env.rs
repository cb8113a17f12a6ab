//! Captured process environment.
//!
//! Resolution never reads `std::env` directly. The binary captures the
//! environment once into an [`EnvSnapshot`] and passes it down, so every
//! stage can be tested with a hand-built snapshot.

use std::collections::BTreeMap;

/// An immutable copy of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Build a snapshot from key/value pairs.
    ///
    /// ```
    /// use buildplan::EnvSnapshot;
    ///
    /// let env = EnvSnapshot::from_pairs([("BUILD_MODE", "production")]);
    /// assert_eq!(env.get("BUILD_MODE"), Some("production"));
    /// assert_eq!(env.get("NODE_ENV"), None);
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Iterate over variables whose name starts with `prefix`, in name order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.vars
            .iter()
            .filter(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of captured variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the snapshot holds no variables.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_prefix_filters_and_orders() {
        let env = EnvSnapshot::from_pairs([
            ("BUILDPLAN__OUTPUT__OUTPUT_DIR", "build"),
            ("HOME", "/home/dev"),
            ("BUILDPLAN__DEV_SERVER__PORT", "9000"),
        ]);

        let keys: Vec<_> = env.with_prefix("BUILDPLAN__").map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["BUILDPLAN__DEV_SERVER__PORT", "BUILDPLAN__OUTPUT__OUTPUT_DIR"]
        );
    }

    #[test]
    fn empty_snapshot() {
        let env = EnvSnapshot::new();
        assert!(env.is_empty());
        assert_eq!(env.get("PATH"), None);
    }

    #[test]
    fn capture_does_not_panic() {
        let _ = EnvSnapshot::capture().len();
    }
}
