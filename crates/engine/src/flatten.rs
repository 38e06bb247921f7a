//! Recursive key flattening (`spec.md` §4.6). Applied after tracked-value
//! filtering, and only to mappings — sequences are left as-is.

use serde_json::{Map, Value};

pub(crate) fn flatten(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            flatten_into(map, "", &mut out);
            Value::Object(out)
        }
        other => other.clone(),
    }
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, out: &mut Map<String, Value>) {
    for (key, value) in map {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(nested, &full_key, out),
            other => {
                out.insert(full_key, other.clone());
            }
        }
    }
}

#[cfg(test)]
#[path = "flatten_tests.rs"]
mod tests;
