//! ncdu export envelope: `[major, minor, metadata, root]`

use crate::error::TransformError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Minimum number of elements in a well-formed envelope.
pub const ENVELOPE_LEN: usize = 4;

/// Position of the root record inside the envelope.
pub const ROOT_INDEX: usize = 3;

/// Decode raw scanner output into a generic JSON value.
///
/// Nesting depth is unbounded: deep exports decode on a heap-grown stack and
/// the depth limit is applied later by the tree builder.
pub fn decode_document(bytes: &[u8]) -> Result<Value, TransformError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    deserializer.disable_recursion_limit();
    let document = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    if let Err(e) = deserializer.end() {
        release(document);
        return Err(e.into());
    }
    Ok(document)
}

/// Drop a decoded document without recursing into it.
pub fn release(document: Value) {
    let mut pending = vec![document];
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(items) => pending.extend(items),
            Value::Object(map) => pending.extend(map.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
}

/// Borrow the root record, validating the envelope shape.
pub fn root_record(document: &Value) -> Result<&Value, TransformError> {
    match document {
        Value::Array(items) if items.len() >= ENVELOPE_LEN => Ok(&items[ROOT_INDEX]),
        Value::Array(items) => Err(TransformError::MalformedInput(format!(
            "expected an array of at least {} elements, got {}",
            ENVELOPE_LEN,
            items.len()
        ))),
        _ => Err(TransformError::MalformedInput(format!(
            "expected a top-level array, got {}",
            json_type_name(document)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Export header, read for diagnostics only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanHeader {
    pub major_version: Option<u64>,
    pub minor_version: Option<u64>,
    pub progname: Option<String>,
    pub progver: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Read the header fields of a well-formed envelope; missing fields stay `None`.
pub fn read_header(document: &Value) -> Option<ScanHeader> {
    let items = document.as_array()?;
    if items.len() < ENVELOPE_LEN {
        return None;
    }
    let metadata = items[2].as_object();
    let text = |key: &str| {
        metadata
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let timestamp = metadata
        .and_then(|m| m.get("timestamp"))
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    Some(ScanHeader {
        major_version: items[0].as_u64(),
        minor_version: items[1].as_u64(),
        progname: text("progname"),
        progver: text("progver"),
        timestamp,
    })
}

impl fmt::Display for ScanHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progname = self.progname.as_deref().unwrap_or("unknown scanner");
        write!(f, "{}", progname)?;
        if let Some(ver) = &self.progver {
            write!(f, " {}", ver)?;
        }
        if let (Some(major), Some(minor)) = (self.major_version, self.minor_version) {
            write!(f, " (format {}.{})", major, minor)?;
        }
        if let Some(ts) = &self.timestamp {
            write!(f, " at {}", ts.to_rfc3339())?;
        }
        Ok(())
    }
}
