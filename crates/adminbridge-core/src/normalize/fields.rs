//! Legacy/new field-name bridging.
//!
//! Each alias copies a source field into a target field on the same record.
//! A target that already holds a value is never overwritten, which keeps the
//! walk idempotent.

use serde_json::{Map, Value};

/// One source -> target copy rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAlias {
    pub source: &'static str,
    pub target: &'static str,
    /// Copy only when the source is truthy (non-empty, non-zero).
    pub require_truthy: bool,
}

const fn alias(source: &'static str, target: &'static str) -> FieldAlias {
    FieldAlias {
        source,
        target,
        require_truthy: false,
    }
}

const fn truthy_alias(source: &'static str, target: &'static str) -> FieldAlias {
    FieldAlias {
        source,
        target,
        require_truthy: true,
    }
}

/// Applied in order; earlier rules win when two sources share a target.
pub const FIELD_ALIASES: &[FieldAlias] = &[
    // timestamps
    truthy_alias("created_at", "creation_date"),
    truthy_alias("updated_at", "updation_date"),
    alias("remark", "remarks"),
    // roles
    alias("role_ids", "roles"),
    alias("role_name", "name"),
    alias("role_code", "code"),
    alias("order_num", "sort"),
    // menus
    alias("menu_name", "title"),
    alias("perms", "permission"),
    // dictionaries
    alias("dict_code", "code"),
    alias("dict_name", "name"),
    alias("dict_label", "label"),
    alias("dict_value", "value"),
];

const CHILDREN_FIELD: &str = "children";

/// Remap one record and, recursively, every record under `children`.
///
/// Non-object values are returned untouched.
pub fn remap_record(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(remap_object(map)),
        other => other,
    }
}

fn remap_object(mut map: Map<String, Value>) -> Map<String, Value> {
    for rule in FIELD_ALIASES {
        if is_defined(map.get(rule.target)) {
            continue;
        }
        let Some(source) = map.get(rule.source) else {
            continue;
        };
        if rule.require_truthy && !is_truthy(source) {
            continue;
        }
        let copied = source.clone();
        map.insert(rule.target.to_string(), copied);
    }

    if let Some(Value::Array(children)) = map.get_mut(CHILDREN_FIELD) {
        let remapped = std::mem::take(children)
            .into_iter()
            .map(remap_record)
            .collect();
        *children = remapped;
    }

    map
}

fn is_defined(value: Option<&Value>) -> bool {
    matches!(value, Some(v) if !v.is_null())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
