//! Layer merging for YAML configuration values.
//!
//! Configuration is resolved from several layers where later layers
//! override earlier ones.
//!
//! # Merge Rules
//!
//! - Mappings are merged recursively
//! - Sequences are replaced entirely (proxy rules and style resources are
//!   never concatenated across layers)
//! - `null` in an overlay deletes the key from the base
//! - Scalars in an overlay replace the base value

use serde_yaml::{Mapping, Value};

/// Deep merge `overlay` into `base`, consuming both.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    base_map.shift_remove(&key);
                    continue;
                }
                // Merge in place so keys keep their position (cache group order matters)
                match base_map.get_mut(&key) {
                    Some(slot) => {
                        let base_value = std::mem::replace(slot, Value::Null);
                        *slot = deep_merge(base_value, overlay_value);
                    }
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
            Value::Mapping(base_map)
        }
        // An empty file parses to null: treat it as "no changes"
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge layers in order (first is the base, last has highest priority).
pub fn merge_layers<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    layers
        .into_iter()
        .fold(Value::Mapping(Mapping::new()), deep_merge)
}
