//! Record normalization and metadata merge.
//!
//! One shared routine maps a raw JSON record to a [`DocumentNode`], used by
//! every reader whose records are JSON objects. The merge rule is fixed:
//! loader-level provenance keys are written first, then the record's own keys
//! are appended, overriding loader-level keys on collision.

use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::ReaderError;
use rag_ingest_shared::DocumentNode;

/// Merge loader-level metadata with a record's own data.
///
/// The record's keys win on collision. Insertion order of the result is
/// loader keys first (minus overridden ones, which keep their loader-side
/// position but take the record's value), then record-only keys.
pub fn merge_extra_info(
    loader_meta: &Map<String, Value>,
    record: &Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = loader_meta.clone();
    for (key, value) in record {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Map one raw JSON record to a [`DocumentNode`].
///
/// * `field` names the record attribute used as text. A string value is used
///   verbatim; any other value is JSON-encoded (the source schema is not
///   ours to validate). A missing field is a [`ReaderError::FieldMissing`].
/// * `embedding_field`, when given, pulls a precomputed vector from the
///   record. Absence is not an error; a present value that is not a numeric
///   array is a [`ReaderError::MalformedResponse`].
///
/// Empty extracted text is flagged with a `warn!` event but still produces a
/// node.
pub fn record_to_document(
    record: &Map<String, Value>,
    field: &str,
    embedding_field: Option<&str>,
    loader_meta: &Map<String, Value>,
    endpoint: &str,
    target: &str,
) -> Result<DocumentNode, ReaderError> {
    let text = match record.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => return Err(ReaderError::field_missing(field, target)),
    };

    if text.is_empty() {
        warn!(target_name = %target, field = %field, "record produced empty text");
    }

    let embedding = match embedding_field.and_then(|name| record.get(name)) {
        Some(value) => Some(parse_embedding(value, endpoint, target)?),
        None => None,
    };

    let mut node = DocumentNode::new(text).with_extra_info(merge_extra_info(loader_meta, record));
    if let Some(embedding) = embedding {
        node = node.with_embedding(embedding);
    }
    Ok(node)
}

fn parse_embedding(value: &Value, endpoint: &str, target: &str) -> Result<Vec<f32>, ReaderError> {
    let items = value.as_array().ok_or_else(|| {
        ReaderError::malformed(endpoint, target, "embedding field is not an array")
    })?;

    items
        .iter()
        .map(|item| {
            item.as_f64().map(|f| f as f32).ok_or_else(|| {
                ReaderError::malformed(endpoint, target, "embedding array contains a non-number")
            })
        })
        .collect()
}
