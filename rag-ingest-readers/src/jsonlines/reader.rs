//! JSON-lines reader implementation.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::errors::ReaderError;
use crate::interfaces::DocumentReader;
use crate::normalize::record_to_document;
use rag_ingest_shared::DocumentNode;

/// Parameters for one `load` call against a JSON-lines file.
///
/// Field semantics match the search-index reader: `field` names the record
/// attribute used as text (fail-fast when absent), `embedding_field`
/// optionally pulls a precomputed vector.
#[derive(Debug, Clone)]
pub struct JsonLinesLoadParams {
    pub field: String,
    pub embedding_field: Option<String>,
}

impl JsonLinesLoadParams {
    /// Create parameters extracting text from the given field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            embedding_field: None,
        }
    }

    /// Set the embedding field name.
    pub fn with_embedding_field(mut self, field: impl Into<String>) -> Self {
        self.embedding_field = Some(field.into());
        self
    }
}

/// Reader over a local file with one JSON object per line.
///
/// Blank lines are skipped; any other unparseable line fails the whole call
/// with a `MalformedResponse` naming the line number.
#[derive(Debug)]
pub struct JsonLinesReader {
    path: PathBuf,
}

impl JsonLinesReader {
    /// Create a reader over the given file.
    ///
    /// Fails with `ConnectionSetup` if the path does not exist or is not a
    /// regular file.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ReaderError> {
        let path = path.into();
        if !path.is_file() {
            return Err(ReaderError::connection_setup(
                path.display().to_string(),
                "path is not an existing file",
            ));
        }
        Ok(Self { path })
    }
}

#[async_trait]
impl DocumentReader for JsonLinesReader {
    type Params = JsonLinesLoadParams;

    async fn load(&self, params: &JsonLinesLoadParams) -> Result<Vec<DocumentNode>, ReaderError> {
        if params.field.is_empty() {
            return Err(ReaderError::validation("text field name must not be empty"));
        }

        let endpoint = self.path.display().to_string();
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ReaderError::source_unavailable(&endpoint, &endpoint, e.to_string()))?;

        let mut loader_meta = Map::new();
        loader_meta.insert("source".to_string(), json!(endpoint));
        loader_meta.insert("field".to_string(), json!(params.field));
        loader_meta.insert("query".to_string(), Value::Null);

        let mut documents = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line).map_err(|e| {
                ReaderError::malformed(
                    &endpoint,
                    &endpoint,
                    format!("line {line_number} is not valid JSON: {e}"),
                )
            })?;
            let record = value.as_object().ok_or_else(|| {
                ReaderError::malformed(
                    &endpoint,
                    &endpoint,
                    format!("line {line_number} is not a JSON object"),
                )
            })?;

            let mut meta = loader_meta.clone();
            meta.insert("line".to_string(), json!(line_number));

            documents.push(record_to_document(
                record,
                &params.field,
                params.embedding_field.as_deref(),
                &meta,
                &endpoint,
                &endpoint,
            )?);
        }

        debug!(path = %endpoint, count = documents.len(), "loaded documents from JSON lines");
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn jsonl_file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_one_node_per_line_in_order() {
        let file = jsonl_file(&[
            r#"{"message": "first", "level": "info"}"#,
            r#"{"message": "second", "level": "warn"}"#,
        ]);

        let reader = JsonLinesReader::new(file.path()).unwrap();
        let documents = reader
            .load(&JsonLinesLoadParams::new("message"))
            .await
            .unwrap();

        let texts: Vec<&str> = documents.iter().map(|d| d.text()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(documents[0].extra_info()["level"], json!("info"));
        assert_eq!(documents[0].extra_info()["line"], json!(1));
        assert_eq!(documents[1].extra_info()["line"], json!(2));
    }

    #[tokio::test]
    async fn test_blank_lines_skipped() {
        let file = jsonl_file(&[r#"{"message": "a"}"#, "", r#"{"message": "b"}"#]);

        let reader = JsonLinesReader::new(file.path()).unwrap();
        let documents = reader
            .load(&JsonLinesLoadParams::new("message"))
            .await
            .unwrap();

        assert_eq!(documents.len(), 2);
        // Line numbers track the file, not the batch position.
        assert_eq!(documents[1].extra_info()["line"], json!(3));
    }

    #[tokio::test]
    async fn test_missing_field_fails_fast() {
        let file = jsonl_file(&[r#"{"message": "ok"}"#, r#"{"other": "nope"}"#]);

        let reader = JsonLinesReader::new(file.path()).unwrap();
        let err = reader
            .load(&JsonLinesLoadParams::new("message"))
            .await
            .unwrap_err();

        assert!(matches!(err, ReaderError::FieldMissing { .. }));
    }

    #[tokio::test]
    async fn test_unparseable_line_names_line_number() {
        let file = jsonl_file(&[r#"{"message": "ok"}"#, "{not json"]);

        let reader = JsonLinesReader::new(file.path()).unwrap();
        let err = reader
            .load(&JsonLinesLoadParams::new("message"))
            .await
            .unwrap_err();

        match err {
            ReaderError::MalformedResponse { reason, .. } => assert!(reason.contains("line 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_embedding_passthrough() {
        let file = jsonl_file(&[r#"{"message": "m", "vector": [0.25, 0.5]}"#]);

        let reader = JsonLinesReader::new(file.path()).unwrap();
        let documents = reader
            .load(&JsonLinesLoadParams::new("message").with_embedding_field("vector"))
            .await
            .unwrap();

        assert_eq!(documents[0].embedding(), Some(&[0.25_f32, 0.5][..]));
    }

    #[test]
    fn test_missing_file_fails_construction() {
        let err = JsonLinesReader::new("/definitely/not/a/file.jsonl").unwrap_err();

        assert!(matches!(err, ReaderError::ConnectionSetup { .. }));
    }
}
