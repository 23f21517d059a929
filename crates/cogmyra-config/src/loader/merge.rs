//! JSON merge helper for layered configuration.

use serde_json::Value;

/// Fold `overlay` into `base`. Objects merge key by key; any other overlay
/// value replaces what was there.
pub(super) fn merge_layer(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                merge_layer(base_map.entry(key).or_insert(Value::Null), value);
            }
        }
        (slot, value) => *slot = value,
    }
}
