//! The normalized document type produced by every reader.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One normalized unit of ingested content.
///
/// A `DocumentNode` is created exactly once per raw record returned by a
/// single `load` call and is immutable afterwards: all fields are private and
/// only readable through accessors. Ownership passes to the caller (the
/// embedding/indexing stage); readers hold no reference to emitted nodes.
///
/// # Fields
///
/// * `text` - The primary textual content extracted from one source record.
///   Empty text is valid (readers flag it, they do not reject it).
/// * `extra_info` - Merged metadata: loader-level provenance keys first
///   (endpoint, target, field, query), then the record's own keys, which
///   override loader-level keys on collision. Insertion order is preserved.
/// * `embedding` - A precomputed vector carried through from the source
///   record, present only when the caller named an embedding field and the
///   record contained it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    text: String,
    extra_info: Map<String, Value>,
    embedding: Option<Vec<f32>>,
}

impl DocumentNode {
    /// Create a node holding only text, with empty metadata and no embedding.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra_info: Map::new(),
            embedding: None,
        }
    }

    /// Attach the merged metadata mapping.
    pub fn with_extra_info(mut self, extra_info: Map<String, Value>) -> Self {
        self.extra_info = extra_info;
        self
    }

    /// Attach a precomputed embedding vector.
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// The extracted text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The merged metadata mapping, in insertion order.
    pub fn extra_info(&self) -> &Map<String, Value> {
        &self.extra_info
    }

    /// The precomputed embedding, if the source record carried one.
    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }
}
