//! Elasticsearch/OpenSearch reader.
//!
//! This module provides a concrete implementation of `DocumentReader` that
//! pulls records from a search-index cluster over its REST search API. It
//! only uses the basic search API, so it works with both Elasticsearch and
//! OpenSearch.

mod config;
mod reader;
mod transport;

pub use config::{Auth, LoadConfig, RetryConfig, TransportConfig};
pub use reader::{ElasticsearchReader, SearchLoadParams};
pub use transport::{HttpTransport, SearchTransport};
