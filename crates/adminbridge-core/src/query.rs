//! Query-string flattening: nested objects use dot notation, arrays use
//! indexed brackets, nulls are dropped.

use serde_json::Value;

/// Flatten a JSON object into `(key, value)` query pairs.
///
/// `{"page": 1, "filter": {"dept_id": 3}, "ids": [1, 2]}` becomes
/// `page=1`, `filter.dept_id=3`, `ids[0]=1`, `ids[1]=2`.
pub fn to_query_pairs(params: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Value::Object(map) = params {
        for (key, value) in map {
            flatten(key.clone(), value, &mut pairs);
        }
    }
    pairs
}

fn flatten(prefix: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => pairs.push((prefix, flag.to_string())),
        Value::Number(number) => pairs.push((prefix, number.to_string())),
        Value::String(text) => pairs.push((prefix, text.clone())),
        Value::Array(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                flatten(format!("{}[{}]", prefix, index), entry, pairs);
            }
        }
        Value::Object(map) => {
            for (key, entry) in map {
                flatten(format!("{}.{}", prefix, key), entry, pairs);
            }
        }
    }
}
