//! HTTP transport for the search-index reader.
//!
//! The transport owns the underlying HTTP client and applies the configured
//! timeout, credentials, TLS and header settings uniformly to every request.
//! Low-level network failures are translated into the reader error taxonomy
//! here; retries are a reader-level policy, not a transport concern.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::elasticsearch::config::{Auth, TransportConfig};
use crate::errors::ReaderError;

/// Abstracts the wire call to the search endpoint.
///
/// The production implementation is [`HttpTransport`]; tests substitute mock
/// implementations to exercise envelope parsing and failure handling without
/// a live cluster.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Issue one search request with the given body and return the decoded
    /// JSON response envelope.
    async fn search(&self, body: &Value) -> Result<Value, ReaderError>;
}

/// Transport issuing `POST {index}/_search` requests over HTTP(S).
///
/// Each reader instance exclusively owns its transport (and the client
/// inside it); there is no shared client registry.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    search_url: Url,
    endpoint: String,
    index: String,
    auth: Option<Auth>,
    timeout_ms: u64,
}

impl HttpTransport {
    /// Build a transport bound to one cluster endpoint and index.
    ///
    /// # Returns
    ///
    /// * `Ok(HttpTransport)` - A transport ready to issue search requests
    /// * `Err(ReaderError::ConnectionSetup)` - If the endpoint URL or a
    ///   configured header is malformed, or the client cannot be built
    pub fn new(endpoint: &str, index: &str, config: &TransportConfig) -> Result<Self, ReaderError> {
        let mut base = Url::parse(endpoint)
            .map_err(|e| ReaderError::connection_setup(endpoint, e.to_string()))?;

        // Url::join replaces the last path segment unless the base ends in a
        // slash, which would silently drop a path prefix on the endpoint.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let search_url = base
            .join(&format!("{index}/_search"))
            .map_err(|e| ReaderError::connection_setup(endpoint, e.to_string()))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ReaderError::connection_setup(endpoint, format!("invalid header name '{name}': {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ReaderError::connection_setup(endpoint, format!("invalid header value: {e}"))
            })?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers);
        if !config.tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| ReaderError::connection_setup(endpoint, e.to_string()))?;

        debug!(endpoint = %endpoint, index = %index, "created search transport");

        Ok(Self {
            client,
            search_url,
            endpoint: endpoint.to_string(),
            index: index.to_string(),
            auth: config.auth.clone(),
            timeout_ms: config.timeout.as_millis() as u64,
        })
    }

    fn translate_send_error(&self, err: reqwest::Error) -> ReaderError {
        if err.is_timeout() {
            return ReaderError::timeout(&self.endpoint, &self.index, self.timeout_ms);
        }
        ReaderError::source_unavailable(&self.endpoint, &self.index, err.to_string())
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn search(&self, body: &Value) -> Result<Value, ReaderError> {
        let mut request = self.client.post(self.search_url.clone()).json(body);
        match &self.auth {
            Some(Auth::Basic { username, password }) => {
                request = request.basic_auth(username, Some(password));
            }
            Some(Auth::Bearer(token)) => {
                request = request.bearer_auth(token);
            }
            None => {}
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.translate_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            // 5xx and 429 are transient; any other non-success status is a
            // contract error.
            if status.is_server_error() || status.as_u16() == 429 {
                return Err(ReaderError::source_unavailable(
                    &self.endpoint,
                    &self.index,
                    format!("search returned status {status}"),
                ));
            }
            return Err(ReaderError::malformed_with_body(
                &self.endpoint,
                &self.index,
                format!("search returned status {status}"),
                Some(status.as_u16()),
                &body_text,
            ));
        }

        response.json::<Value>().await.map_err(|e| {
            ReaderError::malformed(
                &self.endpoint,
                &self.index,
                format!("response body is not valid JSON: {e}"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_shape() {
        let transport =
            HttpTransport::new("http://localhost:9200", "docs", &TransportConfig::default())
                .unwrap();

        assert_eq!(
            transport.search_url.as_str(),
            "http://localhost:9200/docs/_search"
        );
    }

    #[test]
    fn test_search_url_keeps_endpoint_path_prefix() {
        let transport = HttpTransport::new(
            "https://cluster.example.com/es",
            "logs-2024",
            &TransportConfig::default(),
        )
        .unwrap();

        assert_eq!(
            transport.search_url.as_str(),
            "https://cluster.example.com/es/logs-2024/_search"
        );
    }

    #[test]
    fn test_malformed_endpoint_fails_construction() {
        let err = HttpTransport::new("not a url", "docs", &TransportConfig::default()).unwrap_err();

        assert!(matches!(err, ReaderError::ConnectionSetup { .. }));
    }

    #[test]
    fn test_invalid_extra_header_fails_construction() {
        let mut config = TransportConfig::default();
        config
            .extra_headers
            .insert("bad header\n".to_string(), "v".to_string());

        let err = HttpTransport::new("http://localhost:9200", "docs", &config).unwrap_err();

        assert!(matches!(err, ReaderError::ConnectionSetup { .. }));
    }
}
