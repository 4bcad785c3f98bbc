//! Search-index reader implementation.
//!
//! This module provides the concrete reader that pulls records from an
//! Elasticsearch/OpenSearch index and normalizes them into `DocumentNode`s.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::elasticsearch::config::{LoadConfig, TransportConfig};
use crate::elasticsearch::transport::{HttpTransport, SearchTransport};
use crate::errors::ReaderError;
use crate::interfaces::DocumentReader;
use crate::normalize::record_to_document;
use rag_ingest_shared::DocumentNode;

/// Parameters for one `load` call against a search index.
#[derive(Debug, Clone)]
pub struct SearchLoadParams {
    /// Record attribute used as the node text. Required.
    pub field: String,
    /// Native query-DSL object, passed through opaquely. When absent the
    /// engine's default full scan is issued.
    pub query: Option<Value>,
    /// Record attribute holding a precomputed embedding. When a record lacks
    /// it, the node's embedding is simply absent.
    pub embedding_field: Option<String>,
}

impl SearchLoadParams {
    /// Create parameters extracting text from the given field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            query: None,
            embedding_field: None,
        }
    }

    /// Set the opaque query object.
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Set the embedding field name.
    pub fn with_embedding_field(mut self, field: impl Into<String>) -> Self {
        self.embedding_field = Some(field.into());
        self
    }
}

/// Reader over an Elasticsearch/OpenSearch index.
///
/// Bound to one endpoint and one index for its lifetime, and exclusively
/// owning its transport. One `load` at a time per instance; spawn one reader
/// per worker for parallel ingestion.
///
/// # Example
///
/// ```ignore
/// let reader = ElasticsearchReader::new("http://localhost:9200", "articles")?;
/// let params = SearchLoadParams::new("body")
///     .with_query(json!({"query": {"match": {"body": "rust"}}}));
/// let documents = reader.load(&params).await?;
/// ```
pub struct ElasticsearchReader {
    transport: Box<dyn SearchTransport>,
    endpoint: String,
    index: String,
    config: LoadConfig,
    deadline: Duration,
}

impl std::fmt::Debug for ElasticsearchReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchReader")
            .field("transport", &"<dyn SearchTransport>")
            .field("endpoint", &self.endpoint)
            .field("index", &self.index)
            .field("config", &self.config)
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl ElasticsearchReader {
    /// Create a reader with default transport and load configuration.
    ///
    /// Fails with `ConnectionSetup` if the endpoint URL is malformed.
    pub fn new(endpoint: &str, index: &str) -> Result<Self, ReaderError> {
        Self::with_config(
            endpoint,
            index,
            TransportConfig::default(),
            LoadConfig::default(),
        )
    }

    /// Create a reader with custom transport and load configuration.
    pub fn with_config(
        endpoint: &str,
        index: &str,
        transport_config: TransportConfig,
        load_config: LoadConfig,
    ) -> Result<Self, ReaderError> {
        let deadline = transport_config.timeout;
        let transport = HttpTransport::new(endpoint, index, &transport_config)?;
        Ok(Self::with_transport(
            Box::new(transport),
            endpoint,
            index,
            load_config,
            deadline,
        ))
    }

    /// Create a reader over an injected transport.
    ///
    /// This is the seam used to substitute mock transports in tests.
    pub fn with_transport(
        transport: Box<dyn SearchTransport>,
        endpoint: &str,
        index: &str,
        config: LoadConfig,
        deadline: Duration,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.to_string(),
            index: index.to_string(),
            config,
            deadline,
        }
    }

    /// Loader-level provenance recorded on every emitted node: the exact
    /// external call that produced it.
    fn loader_metadata(&self, params: &SearchLoadParams) -> Map<String, Value> {
        let mut meta = Map::new();
        meta.insert("endpoint".to_string(), json!(self.endpoint));
        meta.insert("index".to_string(), json!(self.index));
        meta.insert("field".to_string(), json!(params.field));
        meta.insert(
            "query".to_string(),
            params.query.clone().unwrap_or(Value::Null),
        );
        meta
    }

    /// Build the body for one page request, injecting `from`/`size` into the
    /// opaque query. Reader-controlled pagination keys override same-named
    /// keys so the loop always terminates.
    fn page_body(query: Option<&Value>, from: usize, size: usize) -> Value {
        let mut body = match query {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        body.insert("from".to_string(), json!(from));
        body.insert("size".to_string(), json!(size));
        Value::Object(body)
    }

    async fn search_page(&self, body: &Value) -> Result<Value, ReaderError> {
        match timeout(self.deadline, self.transport.search(body)).await {
            Ok(result) => result,
            Err(_) => Err(ReaderError::timeout(
                &self.endpoint,
                &self.index,
                self.deadline.as_millis() as u64,
            )),
        }
    }

    async fn search_page_with_retry(&self, body: &Value) -> Result<Value, ReaderError> {
        let retry = &self.config.retry;
        let mut delay = retry.initial_delay;
        let mut attempt = 0;

        loop {
            match self.search_page(body).await {
                Ok(envelope) => {
                    if attempt > 0 {
                        debug!(attempt, index = %self.index, "search succeeded after retry");
                    }
                    return Ok(envelope);
                }
                Err(e) if e.is_retryable() && attempt < retry.max_retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "search request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(retry.max_delay);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Pull the `hits.hits` array out of a response envelope.
    fn parse_hits<'a>(&self, envelope: &'a Value) -> Result<&'a Vec<Value>, ReaderError> {
        envelope
            .get("hits")
            .and_then(|h| h.get("hits"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ReaderError::malformed_with_body(
                    &self.endpoint,
                    &self.index,
                    "response missing hits.hits array",
                    None,
                    &envelope.to_string(),
                )
            })
    }

    fn validate(&self, params: &SearchLoadParams) -> Result<(), ReaderError> {
        if params.field.is_empty() {
            return Err(ReaderError::validation("text field name must not be empty"));
        }
        if let Some(query) = &params.query {
            if !query.is_object() {
                return Err(ReaderError::validation(
                    "query must be a JSON object at the top level",
                ));
            }
        }
        if self.config.page_size == 0 {
            return Err(ReaderError::validation("page_size must be at least 1"));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentReader for ElasticsearchReader {
    type Params = SearchLoadParams;

    /// Load all hits matching the query as an ordered batch of nodes.
    ///
    /// Pages through the result set with repeated `from`/`size` requests
    /// until a short page or the configured `max_records` bound.
    // TODO: switch to search_after pagination for result windows past the
    // engine's index.max_result_window (deep from/size requests get a 4xx).
    async fn load(&self, params: &SearchLoadParams) -> Result<Vec<DocumentNode>, ReaderError> {
        self.validate(params)?;

        let loader_meta = self.loader_metadata(params);
        let mut documents = Vec::new();
        let mut from = 0usize;

        loop {
            let size = match self.config.max_records {
                Some(max) => {
                    let remaining = max.saturating_sub(documents.len());
                    if remaining == 0 {
                        break;
                    }
                    remaining.min(self.config.page_size)
                }
                None => self.config.page_size,
            };

            let body = Self::page_body(params.query.as_ref(), from, size);
            let envelope = self.search_page_with_retry(&body).await?;
            let hits = self.parse_hits(&envelope)?;

            for hit in hits {
                let source = hit.get("_source").and_then(Value::as_object).ok_or_else(|| {
                    ReaderError::malformed(&self.endpoint, &self.index, "hit missing _source object")
                })?;

                match record_to_document(
                    source,
                    &params.field,
                    params.embedding_field.as_deref(),
                    &loader_meta,
                    &self.endpoint,
                    &self.index,
                ) {
                    Ok(node) => documents.push(node),
                    Err(ReaderError::FieldMissing { .. }) if self.config.skip_missing_text => {
                        warn!(
                            index = %self.index,
                            field = %params.field,
                            "skipping record without text field"
                        );
                    }
                    Err(e) => return Err(e),
                }
            }

            if hits.len() < size {
                break;
            }
            from += hits.len();
        }

        debug!(
            index = %self.index,
            count = documents.len(),
            "loaded documents from search index"
        );
        Ok(documents)
    }
}
