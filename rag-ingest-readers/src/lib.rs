//! # RAG Ingest Readers
//!
//! This crate provides the document-loading layer for RAG ingestion: a
//! pluggable reader contract plus concrete readers that pull heterogeneous
//! external sources into normalized [`DocumentNode`](rag_ingest_shared::DocumentNode)
//! batches for the downstream embedding/indexing stage.
//!
//! ## Architecture
//!
//! 1. **Interfaces**: the [`DocumentReader`] capability every reader
//!    implements
//! 2. **Readers**: one standalone type per source kind (search index,
//!    directory, JSON lines)
//! 3. **Transport**: the HTTP wrapper owned by the search-index reader
//! 4. **Normalization**: the shared record-to-node mapping and metadata
//!    merge rule

pub mod elasticsearch;
pub mod errors;
pub mod filesystem;
pub mod interfaces;
pub mod jsonlines;
pub mod normalize;

pub use elasticsearch::{ElasticsearchReader, SearchLoadParams};
pub use errors::ReaderError;
pub use filesystem::{DirectoryLoadParams, DirectoryReader};
pub use interfaces::DocumentReader;
pub use jsonlines::{JsonLinesLoadParams, JsonLinesReader};
