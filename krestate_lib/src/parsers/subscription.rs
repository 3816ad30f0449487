//! Normalizer for the odcloud subscription JSON payloads.
//!
//! The odcloud datasets share one envelope (`data` array plus paging
//! counters). Records keep their upstream field names and are passed
//! through untyped.

use serde::Serialize;
use serde_json::{Map, Value};

use super::ParseError;

/// One page of an odcloud dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionPage {
    pub total_count: i64,
    pub items: Vec<Value>,
    pub page: i64,
    pub per_page: i64,
}

pub fn parse_subscription_page(payload: &Value) -> Result<SubscriptionPage, ParseError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ParseError::json("unexpected response type"))?;

    let items = match obj.get("data") {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => return Err(ParseError::json("data field is not an array")),
    };

    Ok(SubscriptionPage {
        total_count: int_field(obj, "totalCount"),
        items,
        page: int_field(obj, "page"),
        per_page: int_field(obj, "perPage"),
    })
}

/// Integer counters arrive as numbers or numeric strings depending on the
/// dataset; anything else counts as 0.
pub(crate) fn int_field(obj: &Map<String, Value>, key: &str) -> i64 {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
