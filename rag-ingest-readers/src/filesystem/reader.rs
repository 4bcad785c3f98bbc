//! Directory reader implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::ReaderError;
use crate::interfaces::DocumentReader;
use crate::normalize::merge_extra_info;
use rag_ingest_shared::DocumentNode;

/// Parameters for one `load` call against a directory root.
#[derive(Debug, Clone, Default)]
pub struct DirectoryLoadParams {
    /// When set, only files with one of these extensions (compared
    /// case-insensitively, without the leading dot) are loaded.
    pub extensions: Option<Vec<String>>,
}

impl DirectoryLoadParams {
    /// Load every file under the root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the load to files with the given extensions.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = Some(extensions);
        self
    }
}

/// Reader over a local directory tree, one node per file.
///
/// File content is decoded as UTF-8 (lossily, so binary-ish files still
/// yield text rather than failing the batch). Traversal order is by file
/// name, which keeps batches deterministic across platforms.
#[derive(Debug)]
pub struct DirectoryReader {
    root: PathBuf,
    recursive: bool,
}

impl DirectoryReader {
    /// Create a reader over the given root directory.
    ///
    /// Fails with `ConnectionSetup` if the root does not exist or is not a
    /// directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ReaderError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ReaderError::connection_setup(
                root.display().to_string(),
                "root is not an existing directory",
            ));
        }
        Ok(Self {
            root,
            recursive: true,
        })
    }

    /// Only load files directly under the root, without descending.
    pub fn non_recursive(mut self) -> Self {
        self.recursive = false;
        self
    }

    fn matches_extension(path: &Path, extensions: Option<&[String]>) -> bool {
        let Some(extensions) = extensions else {
            return true;
        };
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

#[async_trait]
impl DocumentReader for DirectoryReader {
    type Params = DirectoryLoadParams;

    async fn load(&self, params: &DirectoryLoadParams) -> Result<Vec<DocumentNode>, ReaderError> {
        let endpoint = self.root.display().to_string();
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut loader_meta = Map::new();
        loader_meta.insert("source".to_string(), json!(endpoint));
        loader_meta.insert(
            "query".to_string(),
            params
                .extensions
                .as_ref()
                .map(|e| json!(e))
                .unwrap_or(Value::Null),
        );

        let mut documents = Vec::new();
        for entry in WalkDir::new(&self.root)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                ReaderError::source_unavailable(&endpoint, &endpoint, e.to_string())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !Self::matches_extension(path, params.extensions.as_deref()) {
                continue;
            }

            let bytes = tokio::fs::read(path).await.map_err(|e| {
                ReaderError::source_unavailable(&endpoint, path.display().to_string(), e.to_string())
            })?;
            let text = String::from_utf8_lossy(&bytes).into_owned();
            if text.is_empty() {
                warn!(path = %path.display(), "file produced empty text");
            }

            let mut record = Map::new();
            record.insert("path".to_string(), json!(path.display().to_string()));
            record.insert(
                "file_name".to_string(),
                json!(entry.file_name().to_string_lossy()),
            );

            documents.push(
                DocumentNode::new(text).with_extra_info(merge_extra_info(&loader_meta, &record)),
            );
        }

        debug!(root = %endpoint, count = documents.len(), "loaded documents from directory");
        Ok(documents)
    }
}
