//! Document reader trait definition.
//!
//! This module defines the abstract capability every source-specific reader
//! implements (search index, filesystem, JSON lines, etc.). Each concrete
//! reader is a standalone type satisfying the same contract with its own
//! parameter type.

use async_trait::async_trait;

use crate::errors::ReaderError;
use rag_ingest_shared::DocumentNode;

/// Abstract capability for loading documents from one external data source.
///
/// A reader binds to one source (and one target within it) for its lifetime
/// and converts the source's native records into [`DocumentNode`]s. Readers
/// may be reused across multiple `load` calls against the same target.
///
/// # Contract
///
/// * The returned sequence is finite and fully materialized; either the
///   whole batch succeeds or the call fails. No partial results.
/// * Output order matches the order records were returned by the source; no
///   reordering or deduplication.
/// * Caller-supplied parameters are never mutated (taken by shared
///   reference).
///
/// # Thread Safety
///
/// Implementations are `Send + Sync` so distinct reader instances can be
/// driven from parallel tasks. A single instance is intended for one
/// in-flight `load` at a time unless its transport documents otherwise.
#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// Source-specific load parameters.
    type Params: Send + Sync;

    /// Load all matching records from the source as an ordered batch of
    /// [`DocumentNode`]s.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<DocumentNode>)` - The full ordered batch (possibly empty)
    /// * `Err(ReaderError)` - If the source is unreachable, the response is
    ///   malformed, or a record violates the fail-fast field policy
    async fn load(&self, params: &Self::Params) -> Result<Vec<DocumentNode>, ReaderError>;
}
