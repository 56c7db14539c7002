//! HTTP transport (v0.1)
//!
//! `Transport` is the seam between picking and the network: given a URL,
//! headers and a timeout it returns a parsed JSON document. `HttpTransport`
//! is the reqwest-backed implementation with a shared, pooled client.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::PickError;
use crate::util::{CONNECT_TIMEOUT, DEFAULT_TIMEOUT, REDIRECT_LIMIT, USER_AGENT};

/// One GET request for a JSON document
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    /// Bounds the whole exchange: connect, headers and body
    pub timeout: Duration,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Fetches and parses JSON documents
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_json(&self, request: &FetchRequest) -> Result<Value, PickError>;
}

/// reqwest-backed transport (cheap to clone, clones share the pool)
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, PickError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(REDIRECT_LIMIT))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PickError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (proxies, TLS roots, ...)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn get_json(
        &self,
        url: Url,
        headers: &HashMap<String, String>,
    ) -> Result<Value, PickError> {
        let mut request = self.client.get(url.as_str());
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| PickError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Non-success HTTP status");
            return Err(PickError::HttpStatus {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PickError::Transport(format!("Failed to read response: {}", e)))?;
        debug!(bytes = body.len(), "Response received");

        serde_json::from_str(&body).map_err(|e| PickError::InvalidJson {
            details: e.to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn fetch_json(&self, request: &FetchRequest) -> Result<Value, PickError> {
        let url = parse_http_url(&request.url)?;

        // Dropping the request future on expiry cancels it
        tokio::time::timeout(request.timeout, self.get_json(url, &request.headers))
            .await
            .map_err(|_| PickError::Timeout {
                timeout_ms: u64::try_from(request.timeout.as_millis()).unwrap_or(u64::MAX),
            })?
    }
}

/// Parse a URL, accepting only http and https
pub fn parse_http_url(raw: &str) -> Result<Url, PickError> {
    let url = Url::parse(raw).map_err(|e| PickError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(PickError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", scheme),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let request = FetchRequest::new("https://example.com");
        assert_eq!(request.timeout, DEFAULT_TIMEOUT);
        assert!(request.headers.is_empty());
    }

    #[test]
    fn request_builder() {
        let request = FetchRequest::new("https://example.com")
            .header("Accept", "application/json")
            .timeout(Duration::from_millis(250));
        assert_eq!(
            request.headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(request.timeout, Duration::from_millis(250));
    }

    #[test]
    fn accepts_http_and_https() {
        assert!(parse_http_url("http://localhost:8080/a").is_ok());
        assert!(parse_http_url("https://horizon-testnet.stellar.org/accounts/G").is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        for raw in ["ftp://example.com", "file:///etc/passwd", "not a url", "/relative"] {
            assert!(
                matches!(parse_http_url(raw), Err(PickError::InvalidUrl { .. })),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn transport_is_clone() {
        let transport = HttpTransport::new().unwrap();
        let _cloned = transport.clone();
    }

    #[tokio::test]
    async fn invalid_url_fails_before_network() {
        let transport = HttpTransport::new().unwrap();
        let err = transport
            .fetch_json(&FetchRequest::new("ftp://example.com/data.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, PickError::InvalidUrl { .. }));
    }
}
