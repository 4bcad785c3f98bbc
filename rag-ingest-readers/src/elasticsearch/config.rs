//! Configuration types for the search-index reader.

use std::collections::HashMap;
use std::time::Duration;

/// Credentials applied to every request issued by the transport.
#[derive(Debug, Clone)]
pub enum Auth {
    /// HTTP basic authentication.
    Basic { username: String, password: String },
    /// Bearer token authentication.
    Bearer(String),
}

/// Transport options applied uniformly to every request.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request deadline. A stalled request fails with `Timeout` once the
    /// deadline elapses.
    pub timeout: Duration,
    /// Optional credentials.
    pub auth: Option<Auth>,
    /// Whether to verify TLS certificates.
    pub tls_verify: bool,
    /// Additional headers sent with every request.
    pub extra_headers: HashMap<String, String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            auth: None,
            tls_verify: true,
            extra_headers: HashMap::new(),
        }
    }
}

/// Retry policy for transient failures during a load.
///
/// Disabled by default: retries are a caller-level concern unless explicitly
/// opted into. Only errors classified retryable (`SourceUnavailable`,
/// `Timeout`) are retried; a malformed contract never is.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the initial request.
    pub max_retries: u32,
    /// Initial retry delay.
    pub initial_delay: Duration,
    /// Upper bound for the exponentially growing delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

/// Load behavior of the search-index reader.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Number of hits requested per page.
    pub page_size: usize,
    /// Upper bound on the total number of records returned by one `load`
    /// call. `None` means paginate until the result set is exhausted.
    pub max_records: Option<usize>,
    /// When set, records lacking the text field are skipped with a warning
    /// instead of failing the whole call. Off by default: silent loss
    /// corrupts downstream retrieval, so fail-fast is the contract.
    pub skip_missing_text: bool,
    /// Retry policy for transient per-page failures.
    pub retry: RetryConfig,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            page_size: 1000,
            max_records: None,
            skip_missing_text: false,
            retry: RetryConfig::default(),
        }
    }
}

impl LoadConfig {
    /// Cap the total number of records returned per `load` call.
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }

    /// Set the per-page hit count.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Skip records lacking the text field instead of failing the call.
    pub fn skip_missing_text(mut self) -> Self {
        self.skip_missing_text = true;
        self
    }

    /// Enable retries for transient failures.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}
