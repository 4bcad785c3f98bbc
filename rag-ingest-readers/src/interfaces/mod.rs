//! Interface definitions for the document readers.
//!
//! This module defines the abstract `DocumentReader` trait that every
//! source-specific reader implements.

mod document_reader;

pub use document_reader::DocumentReader;
