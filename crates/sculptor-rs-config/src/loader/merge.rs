//! Deep merge of config layers.

use serde_json::{Map, Value};

/// Fold `overlay` into `base`: objects merge key by key, anything else
/// replaces the base value outright.
pub(super) fn merge_json_values(base: &mut Value, overlay: Value) {
    match overlay {
        Value::Object(overlay_map) => {
            if !base.is_object() {
                *base = Value::Object(Map::new());
            }
            if let Value::Object(base_map) = base {
                for (key, value) in overlay_map {
                    if let Some(existing) = base_map.get_mut(&key) {
                        merge_json_values(existing, value);
                    } else {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        other => *base = other,
    }
}

#[cfg(test)]
mod tests {
    use super::merge_json_values;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_keys_merge_and_scalars_override() {
        let mut base = json!({
            "server": { "host": "127.0.0.1", "port": 1 },
            "pipeline": { "analyze": false }
        });
        merge_json_values(
            &mut base,
            json!({ "server": { "port": 2 }, "pipeline": { "analyze": true } }),
        );
        assert_eq!(
            base,
            json!({ "server": { "host": "127.0.0.1", "port": 2 }, "pipeline": { "analyze": true } })
        );
    }

    #[test]
    fn object_replaces_scalar() {
        let mut base = json!({ "generation": null });
        merge_json_values(&mut base, json!({ "generation": { "api_key": "token" } }));
        assert_eq!(base, json!({ "generation": { "api_key": "token" } }));
    }
}
