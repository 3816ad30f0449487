//! Payload normalizers for the upstream endpoint families.
//!
//! Every family parser is a pure function from a raw XML/JSON body to
//! typed records plus the upstream result code. Raw `<item>` nodes pass
//! through [`RawItem`], a generic tag → text map, before any field-level
//! coercion.

pub mod onbid;
pub mod rent;
pub mod subscription;
pub mod trade;

use std::collections::BTreeMap;

use quick_xml::events::Event;
use quick_xml::Reader;

/// A payload that could not be decoded at all.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{format} parse failed: {detail}")]
pub struct ParseError {
    pub format: &'static str,
    pub detail: String,
}

impl ParseError {
    pub(crate) fn xml(detail: impl Into<String>) -> Self {
        Self {
            format: "XML",
            detail: detail.into(),
        }
    }

    pub(crate) fn json(detail: impl Into<String>) -> Self {
        Self {
            format: "JSON",
            detail: detail.into(),
        }
    }
}

/// Output of one family parser: the normalized records, the upstream error
/// code when the result code was not a success, and the reported total.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub error_code: Option<String>,
    pub total_count: i64,
}

impl<T> Parsed<T> {
    fn error(code: String, total_count: i64) -> Self {
        Self {
            records: Vec::new(),
            error_code: Some(code),
            total_count,
        }
    }
}

/// One raw `<item>` as a tag → trimmed-text map.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct RawItem(BTreeMap<String, String>);

impl RawItem {
    /// Text content of a child element, empty when absent.
    pub fn text(&self, tag: &str) -> &str {
        self.0.get(tag).map(String::as_str).unwrap_or("")
    }

    /// Comma-formatted monetary amount; `None` when missing or unparsable.
    pub fn amount(&self, tag: &str) -> Option<i64> {
        let raw = self.text(tag).replace(',', "");
        if raw.is_empty() {
            return None;
        }
        raw.parse().ok()
    }

    /// Amount fields that default to 0 when absent (e.g. monthly rent).
    pub fn amount_or_zero(&self, tag: &str) -> i64 {
        self.amount(tag).unwrap_or(0)
    }

    /// Floating-point field, 0.0 on parse failure.
    pub fn float(&self, tag: &str) -> f64 {
        self.text(tag).parse().unwrap_or(0.0)
    }

    /// Integer field, 0 on parse failure.
    pub fn int(&self, tag: &str) -> i64 {
        self.text(tag).parse().unwrap_or(0)
    }

    /// Assemble a `YYYY-MM-DD` date from the dealYear/dealMonth/dealDay
    /// elements, zero-padding month and day. Empty when the year is
    /// missing.
    pub fn deal_date(&self) -> String {
        let year = self.text("dealYear");
        if year.is_empty() {
            return String::new();
        }
        format!(
            "{}-{:0>2}-{:0>2}",
            year,
            self.text("dealMonth"),
            self.text("dealDay")
        )
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }

    fn set(&mut self, tag: String, text: String) {
        self.0.insert(tag, text);
    }

    fn ensure(&mut self, tag: &str) {
        if !self.0.contains_key(tag) {
            self.0.insert(tag.to_string(), String::new());
        }
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Envelope fields shared by the government XML responses.
#[derive(Debug, Default)]
pub struct XmlDocument {
    pub result_code: String,
    pub result_msg: String,
    pub total_count: i64,
    pub items: Vec<RawItem>,
}

/// Parse a response envelope, collecting the header fields and every
/// `<item>` node as a [`RawItem`]. Child elements of an item are recorded
/// even when empty, so raw passthrough families keep their full field set.
pub fn parse_xml_document(xml: &str) -> Result<XmlDocument, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut doc = XmlDocument::default();
    let mut current: Option<RawItem> = None;
    let mut tag_stack: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "item" {
                    current = Some(RawItem::default());
                } else if let Some(item) = current.as_mut() {
                    item.ensure(&name);
                }
                tag_stack.push(name);
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "item" {
                    if let Some(item) = current.take() {
                        doc.items.push(item);
                    }
                }
                tag_stack.pop();
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "item" {
                    doc.items.push(RawItem::default());
                } else if let Some(item) = current.as_mut() {
                    item.ensure(&name);
                }
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| ParseError::xml(e.to_string()))?
                    .trim()
                    .to_string();
                record_text(&mut doc, &mut current, &tag_stack, text);
            }
            // Onbid wraps Korean text in CDATA sections.
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner())
                    .trim()
                    .to_string();
                record_text(&mut doc, &mut current, &tag_stack, text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ParseError::xml(e.to_string())),
        }
    }

    Ok(doc)
}

/// Route element text to the right slot: a field of the current item, or
/// one of the envelope header fields.
fn record_text(
    doc: &mut XmlDocument,
    current: &mut Option<RawItem>,
    tag_stack: &[String],
    text: String,
) {
    if text.is_empty() {
        return;
    }
    let Some(tag) = tag_stack.last() else {
        return;
    };
    if let Some(item) = current.as_mut() {
        if tag != "item" {
            item.set(tag.clone(), text);
        }
    } else {
        match tag.as_str() {
            "resultCode" => doc.result_code = text,
            "resultMsg" => doc.result_msg = text,
            // Onbid spells the count three different ways.
            "totalCount" | "TotalCount" | "totalcount" => {
                doc.total_count = text.parse().unwrap_or(0);
            }
            _ => {}
        }
    }
}
