//! JSON merge helper for layered configuration.

use serde_json::Value;

/// Merge overlay into base: objects merge key by key, anything else replaces.
pub(super) fn merge_json_values(base: &mut Value, overlay: &Value) {
    if let (Value::Object(base_map), Value::Object(overlay_map)) = (&mut *base, overlay) {
        for (key, value) in overlay_map {
            match base_map.get_mut(key) {
                Some(existing) => merge_json_values(existing, value),
                None => {
                    base_map.insert(key.clone(), value.clone());
                }
            }
        }
        return;
    }
    *base = overlay.clone();
}

#[cfg(test)]
mod tests {
    use super::merge_json_values;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_and_scalars_replace() {
        let mut base = json!({
            "memory": { "poll_interval_ms": 10, "max_results": 3 },
            "server": { "bind": "a" }
        });
        merge_json_values(
            &mut base,
            &json!({ "memory": { "max_results": 5 }, "server": "flat" }),
        );
        assert_eq!(
            base,
            json!({ "memory": { "poll_interval_ms": 10, "max_results": 5 }, "server": "flat" })
        );
    }
}
