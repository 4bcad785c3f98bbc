//! JSON-lines reader.
//!
//! Loads documents from a local file holding one JSON object per line.

mod reader;

pub use reader::{JsonLinesLoadParams, JsonLinesReader};
