//! # RAG Ingest Shared
//!
//! Shared data structures for the RAG document ingestion layer. The central
//! type is [`DocumentNode`], the normalized unit of ingested content handed
//! off to the downstream embedding/indexing stage.

pub mod document;

pub use document::DocumentNode;
