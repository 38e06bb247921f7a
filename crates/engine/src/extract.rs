//! Tracked-value extraction (`spec.md` §4.5).

use multitrack_core::{MultitrackError, TailValueSelector, ValueSelector};
use serde_json::{Map, Value};

/// Filter a parsed full-file record's top-level keys against `selectors`.
/// With no selectors every key passes through unchanged.
pub(crate) fn filter_full_file_record(record: &Value, selectors: &[ValueSelector]) -> Value {
    let Value::Object(map) = record else {
        return record.clone();
    };
    if selectors.is_empty() {
        return Value::Object(map.clone());
    }
    let filtered: Map<String, Value> = map
        .iter()
        .filter(|(key, _)| selectors.iter().any(|selector| selector.matches(key)))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Value::Object(filtered)
}

/// Extract `(label, value)` pairs from one tail line, applying the
/// capture-group rules of `spec.md` §4.5:
///
/// - zero groups: the whole match is the value, a label override is required
/// - one group: the group is the value, a label override is required
/// - two groups: the first is the label, the second the value, unless a
///   label override is supplied, in which case the override wins
/// - three or more groups: a schema error
pub(crate) fn extract_from_line(
    line: &str,
    selectors: &[TailValueSelector],
    convert_numeric: bool,
) -> Result<Vec<(String, Value)>, MultitrackError> {
    let mut out = Vec::new();
    for selector in selectors {
        let Some(caps) = selector.pattern.captures(line) else {
            continue;
        };
        let groups: Vec<&str> = caps
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str()).unwrap_or(""))
            .collect();

        let (label, raw_value) = match groups.len() {
            0 => {
                let label = require_label(selector, "no capture groups")?;
                let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
                (label, whole.to_string())
            }
            1 => {
                let label = require_label(selector, "one capture group")?;
                (label, groups[0].to_string())
            }
            2 => {
                let label = selector
                    .label
                    .clone()
                    .unwrap_or_else(|| groups[0].to_string());
                (label, groups[1].to_string())
            }
            n => {
                return Err(MultitrackError::schema(format!(
                    "tail pattern has {n} capture groups; at most two are supported"
                )));
            }
        };

        let value = if convert_numeric {
            coerce_numeric(&raw_value)
        } else {
            Value::String(raw_value)
        };
        out.push((label, value));
    }
    Ok(out)
}

fn require_label(selector: &TailValueSelector, shape: &str) -> Result<String, MultitrackError> {
    selector.label.clone().ok_or_else(|| {
        MultitrackError::schema(format!(
            "tail pattern has {shape} and no label override was supplied"
        ))
    })
}

fn coerce_numeric(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            if let Some(n) = serde_json::Number::from_f64(f) {
                return Value::Number(n);
            }
        }
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
