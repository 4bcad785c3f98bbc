//! Reader error types.
//!
//! This module defines the error taxonomy shared by all document readers.
//! Every variant carries enough context (endpoint, target, field) to diagnose
//! a failure without re-deriving it from caller state.

use thiserror::Error;

/// Maximum number of raw response bytes attached to a malformed-response
/// error for diagnostics.
const BODY_SNIPPET_LIMIT: usize = 2048;

/// Errors that can occur while constructing a reader or loading documents.
///
/// A `load` call never returns partial results alongside an error: either the
/// whole batch succeeds or one of these variants is returned.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// Malformed endpoint or configuration at construction time. Fatal,
    /// surfaced immediately, never retried.
    #[error("connection setup failed for {endpoint}: {reason}")]
    ConnectionSetup { endpoint: String, reason: String },

    /// Network or connection failure during a load. Recoverable by retrying
    /// with backoff.
    #[error("source unavailable at {endpoint} (target {target}): {reason}")]
    SourceUnavailable {
        endpoint: String,
        target: String,
        reason: String,
    },

    /// Deadline exceeded during a load. Treated like `SourceUnavailable` for
    /// retry purposes.
    #[error("timed out after {elapsed_ms}ms querying {endpoint} (target {target})")]
    Timeout {
        endpoint: String,
        target: String,
        elapsed_ms: u64,
    },

    /// Response did not match the expected envelope shape. Fatal for the
    /// call and never retried; carries the raw status and a truncated body
    /// for diagnostics.
    #[error("malformed response from {endpoint} (target {target}): {reason}")]
    MalformedResponse {
        endpoint: String,
        target: String,
        reason: String,
        status: Option<u16>,
        body: Option<String>,
    },

    /// The configured text field was absent from a record. Fatal for the
    /// whole call under the default fail-fast policy.
    #[error("field '{field}' missing from record in target {target}")]
    FieldMissing { field: String, target: String },

    /// Invalid caller-supplied parameters (empty field name, non-object
    /// query).
    #[error("validation error: {0}")]
    Validation(String),
}

impl ReaderError {
    /// Create a connection setup error.
    pub fn connection_setup(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConnectionSetup {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Create a source unavailable error.
    pub fn source_unavailable(
        endpoint: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::SourceUnavailable {
            endpoint: endpoint.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(endpoint: impl Into<String>, target: impl Into<String>, elapsed_ms: u64) -> Self {
        Self::Timeout {
            endpoint: endpoint.into(),
            target: target.into(),
            elapsed_ms,
        }
    }

    /// Create a malformed response error without status/body context.
    pub fn malformed(
        endpoint: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            target: target.into(),
            reason: reason.into(),
            status: None,
            body: None,
        }
    }

    /// Create a malformed response error carrying the raw status (when one
    /// was received) and a truncated copy of the body.
    pub fn malformed_with_body(
        endpoint: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
        status: Option<u16>,
        body: &str,
    ) -> Self {
        let mut snippet = body.to_string();
        let mut end = BODY_SNIPPET_LIMIT.min(snippet.len());
        while !snippet.is_char_boundary(end) {
            end -= 1;
        }
        snippet.truncate(end);
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            target: target.into(),
            reason: reason.into(),
            status,
            body: Some(snippet),
        }
    }

    /// Create a missing field error.
    pub fn field_missing(field: impl Into<String>, target: impl Into<String>) -> Self {
        Self::FieldMissing {
            field: field.into(),
            target: target.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether a caller-level retry with backoff can be expected to help.
    ///
    /// Only transient transport failures qualify; a malformed contract or a
    /// missing field will not change on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ReaderError::source_unavailable("http://x", "idx", "refused").is_retryable());
        assert!(ReaderError::timeout("http://x", "idx", 30_000).is_retryable());

        assert!(!ReaderError::connection_setup("http://x", "bad url").is_retryable());
        assert!(!ReaderError::malformed("http://x", "idx", "no hits").is_retryable());
        assert!(!ReaderError::field_missing("text", "idx").is_retryable());
        assert!(!ReaderError::validation("empty field").is_retryable());
    }

    #[test]
    fn test_malformed_body_is_truncated() {
        let long_body = "x".repeat(10_000);
        let err =
            ReaderError::malformed_with_body("http://x", "idx", "bad envelope", Some(500), &long_body);

        match err {
            ReaderError::MalformedResponse { status, body, .. } => {
                assert_eq!(status, Some(500));
                assert_eq!(body.unwrap().len(), 2048);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_display_carries_context() {
        let err = ReaderError::source_unavailable("http://es:9200", "logs", "connection refused");
        let msg = err.to_string();

        assert!(msg.contains("http://es:9200"));
        assert!(msg.contains("logs"));
        assert!(msg.contains("connection refused"));
    }
}
