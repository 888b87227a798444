//! Response normalization.
//!
//! Servers return options in many shapes. This module extracts the item list
//! from a response body and coerces every item into an [`OptionRecord`]:
//!
//! | item                              | record                          |
//! |-----------------------------------|---------------------------------|
//! | `null`                            | dropped                         |
//! | `"de"` / `49`                     | `{de, de}` / `{49, 49}`         |
//! | `["de", "Germany"]`               | `{de, Germany}`                 |
//! | `{"id": 3, "label": "Three"}`     | `{3, Three}`                    |
//!
//! Coercion to text follows the usual script-engine rules, so `true` reads
//! `"true"`, a missing pair element reads `"undefined"` and an object reads
//! `"[object Object]"`.

use horizon_select_core::logging::targets;
use serde_json::{Map, Number, Value};

use crate::mapper::ResponseMapper;
use crate::option::OptionRecord;

/// One item of a response, classified by shape.
#[derive(Debug, Clone, PartialEq)]
enum RawItem<'a> {
    /// A string or number.
    Scalar(&'a Value),
    /// A sequence read as `[value, text]`.
    Pair(&'a [Value]),
    /// Anything keyed: objects, and booleans which carry no keys.
    Keyed(Option<&'a Map<String, Value>>),
}

impl<'a> RawItem<'a> {
    fn classify(item: &'a Value) -> Option<Self> {
        match item {
            Value::Null => None,
            Value::String(_) | Value::Number(_) => Some(Self::Scalar(item)),
            Value::Array(items) => Some(Self::Pair(items)),
            Value::Object(map) => Some(Self::Keyed(Some(map))),
            Value::Bool(_) => Some(Self::Keyed(None)),
        }
    }

    fn into_record(self) -> OptionRecord {
        match self {
            Self::Scalar(value) => OptionRecord::from_value(string_of(Some(value))),
            Self::Pair(items) => OptionRecord::new(string_of(items.first()), string_of(items.get(1))),
            Self::Keyed(map) => {
                let field = |name: &str| map.and_then(|m| m.get(name)).filter(|v| !v.is_null());
                let value = field("value")
                    .or_else(|| field("id"))
                    .map_or_else(String::new, |v| string_of(Some(v)));
                let text = field("text")
                    .or_else(|| field("label"))
                    .map_or_else(|| value.clone(), |v| string_of(Some(v)));
                OptionRecord::new(value, text)
            }
        }
    }
}

/// Coerce a JSON value to text; `None` stands for a missing value.
pub fn string_of(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => number_string(n),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => string_of(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// Integral floats print without a fraction, as `1.0` parsed by a browser
/// prints `1`.
fn number_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// The item list of a body: the body itself when it is an array, else its
/// `data` array, else nothing.
pub fn extract_items(body: &Value) -> &[Value] {
    match body {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    }
}

/// Coerce every item, dropping nulls.
pub fn coerce_items(items: &[Value]) -> Vec<OptionRecord> {
    items
        .iter()
        .filter_map(RawItem::classify)
        .map(RawItem::into_record)
        .collect()
}

/// Turn a response body into option records.
///
/// With a mapper, its output is the item list; a failed mapper or an output
/// that is not an array yields no records.
pub fn normalize_response(body: &Value, mapper: Option<&ResponseMapper>) -> Vec<OptionRecord> {
    let records = match mapper {
        Some(mapper) => match mapper.invoke(body) {
            Some(Value::Array(items)) => coerce_items(&items),
            Some(_) | None => Vec::new(),
        },
        None => coerce_items(extract_items(body)),
    };
    tracing::trace!(target: targets::NORMALIZE, count = records.len(), "response normalized");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapperError;
    use serde_json::json;

    fn records(pairs: &[(&str, &str)]) -> Vec<OptionRecord> {
        pairs.iter().map(|&(v, t)| OptionRecord::new(v, t)).collect()
    }

    #[test]
    fn test_top_level_array() {
        let body = json!([{"value": "1", "text": "A"}]);
        assert_eq!(normalize_response(&body, None), records(&[("1", "A")]));
    }

    #[test]
    fn test_data_envelope() {
        let body = json!({"data": ["x", 2], "total": 2});
        assert_eq!(normalize_response(&body, None), records(&[("x", "x"), ("2", "2")]));
    }

    #[test]
    fn test_unrecognized_bodies_are_empty() {
        for body in [json!({"items": [1]}), json!({"data": "x"}), json!("text"), json!(null), json!(3)] {
            assert!(normalize_response(&body, None).is_empty(), "{body}");
        }
    }

    #[test]
    fn test_nulls_dropped() {
        let body = json!([null, {"value": "1", "text": "A"}]);
        assert_eq!(normalize_response(&body, None), records(&[("1", "A")]));
    }

    #[test]
    fn test_pairs() {
        let body = json!([["de", "Germany"], [1], [[1, 2], null]]);
        assert_eq!(
            normalize_response(&body, None),
            records(&[("de", "Germany"), ("1", "undefined"), ("1,2", "null")])
        );
    }

    #[test]
    fn test_object_fallbacks() {
        let body = json!([
            {"id": 3, "label": "Three"},
            {"value": null, "id": 4},
            {"text": "orphan"},
            {"value": 1.0, "text": true},
            {"value": {"nested": 1}},
            {}
        ]);
        assert_eq!(
            normalize_response(&body, None),
            records(&[
                ("3", "Three"),
                ("4", "4"),
                ("", "orphan"),
                ("1", "true"),
                ("[object Object]", "[object Object]"),
                ("", ""),
            ])
        );
    }

    #[test]
    fn test_booleans_read_as_keyless_objects() {
        assert_eq!(coerce_items(&[json!(true)]), records(&[("", "")]));
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(string_of(Some(&json!(42))), "42");
        assert_eq!(string_of(Some(&json!(-7))), "-7");
        assert_eq!(string_of(Some(&json!(2.5))), "2.5");
        assert_eq!(string_of(Some(&json!(3.0))), "3");
    }

    #[test]
    fn test_mapper_output_is_coerced() {
        let mapper = ResponseMapper::new(|body| Ok(body["items"].clone()));
        let body = json!({"items": [{"id": 1, "label": "One"}, null, "two"]});
        assert_eq!(
            normalize_response(&body, Some(&mapper)),
            records(&[("1", "One"), ("two", "two")])
        );
    }

    #[test]
    fn test_mapper_failures_are_empty() {
        let body = json!([1, 2]);
        let null = ResponseMapper::new(|_| Ok(Value::Null));
        let object = ResponseMapper::new(|_| Ok(json!({"data": [1]})));
        let failing = ResponseMapper::new(|_| Err(MapperError::failed("nope")));
        let panicking = ResponseMapper::new(|_| panic!("nope"));
        for mapper in [null, object, failing, panicking] {
            assert!(normalize_response(&body, Some(&mapper)).is_empty());
        }
    }
}
