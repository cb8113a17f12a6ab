//! Environment variable overrides.
//!
//! Variables named `BUILDPLAN__SECTION__FIELD` form the highest-priority
//! configuration layer. Path segments are split on `__` and lowercased, so
//! `BUILDPLAN__DEV_SERVER__PORT=9000` becomes:
//!
//! ```yaml
//! dev_server:
//!   port: 9000
//! ```
//!
//! A value takes the type of the key it replaces: if the layers below hold
//! a string there, the raw text is kept as a string, so
//! `BUILDPLAN__OUTPUT__OUTPUT_DIR=2024` stays a directory name. For keys
//! without a string below, numbers and booleans are read as YAML scalars and
//! anything else is a string.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::env::EnvSnapshot;

/// Prefix for override variables.
pub const ENV_PREFIX: &str = "BUILDPLAN__";

/// One `BUILDPLAN__*` variable turned into a config path and value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvOverride {
    /// Variable name, e.g. `BUILDPLAN__DEV_SERVER__PORT`
    pub variable: String,
    /// Lowercased key path, e.g. `["dev_server", "port"]`
    pub path: Vec<String>,
    pub value: Value,
}

impl EnvOverride {
    /// This override alone as a config layer.
    pub fn to_layer(&self) -> Value {
        let mut root = Mapping::new();
        insert_path(&mut root, &self.path, self.value.clone());
        Value::Mapping(root)
    }
}

/// Read every override variable, typing values against `base`.
///
/// `base` is the merge of all layers below the environment.
pub fn collect_overrides(env: &EnvSnapshot, base: &Value) -> Vec<EnvOverride> {
    env.with_prefix(ENV_PREFIX)
        .filter_map(|(name, raw)| {
            let path: Vec<String> = name[ENV_PREFIX.len()..]
                .split("__")
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase)
                .collect();
            if path.is_empty() {
                return None;
            }

            debug!("Config override from {}", name);
            let value = match lookup(base, &path) {
                Some(Value::String(_)) => Value::String(raw.to_string()),
                _ => parse_scalar(raw),
            };
            Some(EnvOverride {
                variable: name.to_string(),
                path,
                value,
            })
        })
        .collect()
}

/// Build the override layer from collected overrides.
///
/// Returns `None` when there are none.
pub fn overrides_layer(overrides: &[EnvOverride]) -> Option<Value> {
    let mut root = Mapping::new();
    for o in overrides {
        insert_path(&mut root, &o.path, o.value.clone());
    }

    if root.is_empty() {
        None
    } else {
        Some(Value::Mapping(root))
    }
}

/// Build the override layer from an environment snapshot.
///
/// Returns `None` when no override variable is set.
pub fn env_override_layer(env: &EnvSnapshot, base: &Value) -> Option<Value> {
    overrides_layer(&collect_overrides(env, base))
}

fn lookup<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.as_mapping()?.get(key.as_str()))
}

fn insert_path(map: &mut Mapping, path: &[String], value: Value) {
    let key = Value::String(path[0].clone());
    if path.len() == 1 {
        map.insert(key, value);
        return;
    }

    let child = map
        .entry(key)
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    if !child.is_mapping() {
        *child = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(child_map) = child {
        insert_path(child_map, &path[1..], value);
    }
}

fn parse_scalar(raw: &str) -> Value {
    match serde_yaml::from_str::<Value>(raw) {
        Ok(v @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => v,
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_overrides_yields_none() {
        let env = EnvSnapshot::from_pairs([("HOME", "/home/dev")]);
        assert!(env_override_layer(&env, &Value::Null).is_none());
    }

    #[test]
    fn nested_path_is_built() {
        let env = EnvSnapshot::from_pairs([
            ("BUILDPLAN__DEV_SERVER__PORT", "9000"),
            ("BUILDPLAN__DEV_SERVER__HTTPS", "true"),
            ("BUILDPLAN__OUTPUT__OUTPUT_DIR", "build"),
        ]);

        let layer = env_override_layer(&env, &Value::Null).unwrap();

        assert_eq!(layer["dev_server"]["port"], 9000);
        assert_eq!(layer["dev_server"]["https"], true);
        assert_eq!(layer["output"]["output_dir"], "build");
    }

    #[test]
    fn structured_values_stay_strings() {
        let env = EnvSnapshot::from_pairs([("BUILDPLAN__OUTPUT__PUBLIC_PATH", "[a, b]")]);
        let layer = env_override_layer(&env, &Value::Null).unwrap();
        assert_eq!(layer["output"]["public_path"], "[a, b]");
    }

    #[test]
    fn top_level_key() {
        let env = EnvSnapshot::from_pairs([("BUILDPLAN__DEFAULT_MODE", "production")]);
        let layer = env_override_layer(&env, &Value::Null).unwrap();
        assert_eq!(layer["default_mode"], "production");
    }

    #[test]
    fn deeper_key_replaces_scalar_parent() {
        let env = EnvSnapshot::from_pairs([
            ("BUILDPLAN__ANALYZER", "off"),
            ("BUILDPLAN__ANALYZER__MODE", "json"),
        ]);
        let layer = env_override_layer(&env, &Value::Null).unwrap();
        assert_eq!(layer["analyzer"]["mode"], "json");
    }

    #[test]
    fn bare_prefix_is_ignored() {
        let env = EnvSnapshot::from_pairs([("BUILDPLAN__", "x")]);
        assert!(env_override_layer(&env, &Value::Null).is_none());
    }

    #[test]
    fn string_keys_keep_numeric_text() {
        let base: Value =
            serde_yaml::from_str("output:\n  output_dir: dist\ndev_server:\n  port: 8888\n").unwrap();
        let env = EnvSnapshot::from_pairs([
            ("BUILDPLAN__OUTPUT__OUTPUT_DIR", "2024"),
            ("BUILDPLAN__DEV_SERVER__PORT", "9000"),
        ]);

        let layer = env_override_layer(&env, &base).unwrap();

        assert_eq!(layer["output"]["output_dir"], Value::String("2024".into()));
        assert_eq!(layer["dev_server"]["port"], 9000);
    }

    #[test]
    fn overrides_remember_their_variable() {
        let env = EnvSnapshot::from_pairs([("BUILDPLAN__DEV_SERVER__PORT", "9000")]);

        let overrides = collect_overrides(&env, &Value::Null);

        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].variable, "BUILDPLAN__DEV_SERVER__PORT");
        assert_eq!(overrides[0].to_layer()["dev_server"]["port"], 9000);
    }
}
