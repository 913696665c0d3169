//! Shape classification for raw ncdu records
//!
//! An ncdu export encodes a directory as an array whose first element is the
//! directory's own metadata object, followed by its children. A file is a bare
//! metadata object. Everything else is malformed.

use serde_json::{Map, Value};
use std::fmt;

/// Metadata object attached to every record.
pub type Metadata = Map<String, Value>;

/// Result of matching one raw value against the admissible record shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordShape<'a> {
    Directory {
        metadata: &'a Metadata,
        children: &'a [Value],
    },
    File {
        metadata: &'a Metadata,
    },
    Malformed(MalformedReason),
}

/// Why a record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    EmptyArray,
    MetadataNotObject,
    MissingName,
    UnexpectedType,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            MalformedReason::EmptyArray => "empty array",
            MalformedReason::MetadataNotObject => "directory metadata is not an object",
            MalformedReason::MissingName => "missing string name",
            MalformedReason::UnexpectedType => "neither array nor object",
        };
        f.write_str(reason)
    }
}

/// Match a raw value against the directory and file shapes.
///
/// Both shapes require a string `name` in their metadata.
pub fn shape_of(raw: &Value) -> RecordShape<'_> {
    match raw {
        Value::Array(items) => match items.split_first() {
            None => RecordShape::Malformed(MalformedReason::EmptyArray),
            Some((Value::Object(metadata), children)) => {
                if name_of(metadata).is_none() {
                    return RecordShape::Malformed(MalformedReason::MissingName);
                }
                RecordShape::Directory { metadata, children }
            }
            Some(_) => RecordShape::Malformed(MalformedReason::MetadataNotObject),
        },
        Value::Object(metadata) => {
            if name_of(metadata).is_none() {
                return RecordShape::Malformed(MalformedReason::MissingName);
            }
            RecordShape::File { metadata }
        }
        _ => RecordShape::Malformed(MalformedReason::UnexpectedType),
    }
}

pub fn name_of(metadata: &Metadata) -> Option<&str> {
    metadata.get("name").and_then(Value::as_str)
}

/// Apparent size of a file record in bytes.
///
/// Fractional values are truncated. Missing, non-numeric and negative values
/// count as zero; values beyond `u64::MAX` saturate.
pub fn apparent_size(metadata: &Metadata) -> u64 {
    match metadata.get("asize") {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f as u64))
            .unwrap_or(0),
        _ => 0,
    }
}
