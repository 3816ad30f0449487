//! Normalizers for the Onbid public-auction payloads.
//!
//! The Onbid services answer in two shapes: the next-gen bid-result
//! services return JSON (sometimes wrapped in a `response` envelope,
//! sometimes flat), while the thing-info and code-lookup services return
//! XML whose items are passed through as raw tag → text maps.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{parse_xml_document, ParseError};

/// Onbid reports success as "00" or "000"; an absent code is treated as
/// success as well.
pub fn is_success_code(code: &str) -> bool {
    code.is_empty() || code == "00" || code == "000"
}

/// Extracted pieces of an Onbid JSON response.
#[derive(Debug, Clone, PartialEq)]
pub struct OnbidJson {
    pub result_code: String,
    pub result_msg: String,
    pub body: Map<String, Value>,
    pub items: Vec<Value>,
}

/// Pull result code, body, and item list out of an Onbid JSON payload.
///
/// Handles the wrapped `response.header/body` shape, the flat shape with
/// everything at the root, `items.item` as either a list or a single
/// object, and `items` directly as a list.
pub fn extract_onbid_json(payload: &Value) -> Result<OnbidJson, ParseError> {
    let root = payload
        .as_object()
        .ok_or_else(|| ParseError::json("unexpected response type"))?;

    let (header, body) = match root.get("response").and_then(Value::as_object) {
        Some(response) => (
            response
                .get("header")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            response
                .get("body")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        ),
        None => (root.clone(), root.clone()),
    };

    let result_code = scalar_string(header.get("resultCode"));
    let result_msg = scalar_string(header.get("resultMsg").or_else(|| root.get("resultMsg")));

    let items = match body.get("items") {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Object(items)) => match items.get("item") {
            Some(Value::Array(list)) => list.clone(),
            Some(item @ Value::Object(_)) => vec![item.clone()],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    Ok(OnbidJson {
        result_code,
        result_msg,
        body,
        items,
    })
}

/// Integer field from the body, tolerating numeric strings. 0 when absent.
pub fn body_int(body: &Map<String, Value>, key: &str) -> i64 {
    super::subscription::int_field(body, key)
}

fn scalar_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Parsed Onbid XML list page.
#[derive(Debug, Clone, PartialEq)]
pub struct OnbidXmlPage {
    pub items: Vec<BTreeMap<String, String>>,
    pub total_count: i64,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

/// Shared parser for the Onbid XML list services: raw tag → text items
/// plus the envelope fields.
fn parse_onbid_xml_items(xml: &str) -> Result<OnbidXmlPage, ParseError> {
    let doc = parse_xml_document(xml)?;
    if !is_success_code(&doc.result_code) {
        return Ok(OnbidXmlPage {
            items: Vec::new(),
            total_count: 0,
            error_code: Some(doc.result_code),
            error_message: (!doc.result_msg.is_empty()).then_some(doc.result_msg),
        });
    }
    Ok(OnbidXmlPage {
        items: doc.items.into_iter().map(|item| item.into_map()).collect(),
        total_count: doc.total_count,
        error_code: None,
        error_message: None,
    })
}

/// Parse a ThingInfoInquireSvc (물건정보조회) list response.
pub fn parse_thing_info_list(xml: &str) -> Result<OnbidXmlPage, ParseError> {
    parse_onbid_xml_items(xml)
}

/// Parse an OnbidCodeInfoInquireSvc (코드조회) response.
pub fn parse_code_info(xml: &str) -> Result<OnbidXmlPage, ParseError> {
    parse_onbid_xml_items(xml)
}
