//! Error types for the document readers.

mod reader_error;

pub use reader_error::ReaderError;
