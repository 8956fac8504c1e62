//! Rendering between BSON documents and the JSON bodies served over HTTP.
//!
//! Clients see ObjectIds as plain 24-character hex strings and datetimes as
//! RFC 3339 strings with millisecond precision. Everything else follows
//! relaxed extended JSON, so ordinary numbers, strings and booleans come out
//! unchanged.

use bson::{Bson, Document};
use chrono::SecondsFormat;
use serde_json::{Map, Value};

use crate::error::CoreResult;

/// Converts a single BSON value into its JSON rendering.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => {
            Value::String(dt.to_chrono().to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Converts a whole document into a JSON object, preserving key order.
pub fn document_to_json(doc: Document) -> Value {
    let map: Map<String, Value> = doc
        .into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect();
    Value::Object(map)
}

/// Converts a JSON request body into a document ready for insertion.
///
/// No shape checks are applied; any JSON object is accepted. BSON has no
/// unsigned 64-bit type, so integers above `i64::MAX` are stored as doubles.
pub fn json_object_to_document(object: &Map<String, Value>) -> CoreResult<Document> {
    let object: Map<String, Value> = object
        .iter()
        .map(|(key, value)| (key.clone(), widen_unsigned(value)))
        .collect();
    Ok(bson::to_document(&object)?)
}

fn widen_unsigned(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.as_i64().is_none() && n.is_u64() => {
            n.as_f64().map_or(Value::Null, Value::from)
        }
        Value::Array(items) => Value::Array(items.iter().map(widen_unsigned).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), widen_unsigned(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}
