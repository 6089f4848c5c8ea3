//! Response normalization.
//!
//! Every JSON body goes through [`normalize_envelope`]: the embedded `code`
//! decides success, paginated payloads gain `rows`/`rowTotal` aliases and
//! records gain the field aliases from [`fields::FIELD_ALIASES`].

pub mod fields;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};

pub use fields::{FIELD_ALIASES, FieldAlias, remap_record};

/// Embedded codes that mean success: legacy `0` and new `200`.
pub const SUCCESS_CODES: &[i64] = &[0, 200];

pub const ROWS_FIELD: &str = "rows";
pub const ROW_TOTAL_FIELD: &str = "rowTotal";
const ITEMS_FIELD: &str = "items";
const TOTAL_FIELD: &str = "total";

pub fn is_success(code: i64) -> bool {
    SUCCESS_CODES.contains(&code)
}

/// The uniform shape every caller receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl NormalizedResponse {
    /// A success with no payload (empty 2xx body).
    pub fn empty() -> Self {
        Self {
            code: None,
            message: None,
            data: Value::Null,
        }
    }

    /// `data.rows`, present only for paginated payloads.
    pub fn rows(&self) -> Option<&Vec<Value>> {
        self.data.get(ROWS_FIELD).and_then(Value::as_array)
    }

    /// `data.rowTotal`, present only for paginated payloads.
    pub fn row_total(&self) -> Option<u64> {
        self.data.get(ROW_TOTAL_FIELD).and_then(Value::as_u64)
    }

    pub fn is_paginated(&self) -> bool {
        self.rows().is_some()
    }

    /// Deserialize the payload into a typed value.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.data.clone()).map_err(ClientError::from)
    }

    pub fn into_data(self) -> Value {
        self.data
    }
}

/// Outcome of classifying an envelope by its embedded code.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success(NormalizedResponse),
    Failure { code: i64, body: Value },
}

/// Read the embedded status code, accepting numeric strings.
pub fn embedded_code(body: &Value) -> Option<i64> {
    let code = body.get("code")?;
    code.as_i64()
        .or_else(|| code.as_str().and_then(|text| text.trim().parse().ok()))
}

/// Classify and reshape one response body.
///
/// A body with no `code` (or a null one) is treated as a success.
pub fn normalize_envelope(body: Value) -> Envelope {
    let code = embedded_code(&body);
    if let Some(code) = code
        && !is_success(code)
    {
        return Envelope::Failure { code, body };
    }

    let (message, data) = match body {
        Value::Object(mut map) => {
            let message = map
                .get("message")
                .or_else(|| map.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_string);
            (message, map.remove("data").unwrap_or(Value::Null))
        }
        _ => (None, Value::Null),
    };

    Envelope::Success(NormalizedResponse {
        code,
        message,
        data: normalize_payload(data),
    })
}

/// Reshape a success payload. Idempotent.
pub fn normalize_payload(data: Value) -> Value {
    match data {
        Value::Array(records) => Value::Array(records.into_iter().map(remap_record).collect()),
        Value::Object(mut map) => {
            let remapped: Vec<Value> = match map.remove(ITEMS_FIELD) {
                Some(Value::Array(items)) => items.into_iter().map(remap_record).collect(),
                Some(other) => {
                    map.insert(ITEMS_FIELD.to_string(), other);
                    return remap_record(Value::Object(map));
                }
                None => return remap_record(Value::Object(map)),
            };
            map.insert(ITEMS_FIELD.to_string(), Value::Array(remapped.clone()));

            // A present but null total still marks the payload as paginated.
            if let Some(total) = map.get(TOTAL_FIELD).cloned() {
                map.insert(ROWS_FIELD.to_string(), Value::Array(remapped));
                map.insert(ROW_TOTAL_FIELD.to_string(), total);
            }
            Value::Object(map)
        }
        other => other,
    }
}
