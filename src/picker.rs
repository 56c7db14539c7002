//! Fetch-then-pick orchestration (v0.1)
//!
//! `Picker` fetches one document through a `Transport` and evaluates the
//! selectors against it. Transport failures propagate; nothing is retried.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{info, instrument};

use crate::error::PickError;
use crate::fetch::{FetchRequest, HttpTransport, Transport};
use crate::selector::{evaluate, EvalOptions, Picked, Selector};
use crate::util::DEFAULT_TIMEOUT;

/// Request and evaluation options for one pick
#[derive(Debug, Clone)]
pub struct PickOptions {
    /// Coerce numeric strings ("100.5") to numbers
    pub parse_numbers: bool,
    pub timeout: Duration,
    pub headers: HashMap<String, String>,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            parse_numbers: false,
            timeout: DEFAULT_TIMEOUT,
            headers: HashMap::new(),
        }
    }
}

/// Picks fields out of remote JSON documents
#[derive(Debug, Clone)]
pub struct Picker<T = HttpTransport> {
    transport: T,
}

impl Picker<HttpTransport> {
    /// Picker over a fresh reqwest transport
    pub fn new() -> Result<Self, PickError> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }
}

impl<T: Transport> Picker<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch `url` and evaluate `selectors` against the document
    #[instrument(skip(self, selectors, options), fields(selector_count = selectors.len()))]
    pub async fn pick(
        &self,
        url: &str,
        selectors: &[Selector],
        options: &PickOptions,
    ) -> Result<Picked, PickError> {
        let request = FetchRequest {
            url: url.to_string(),
            headers: options.headers.clone(),
            timeout: options.timeout,
        };

        let document = self.transport.fetch_json(&request).await?;
        let picked = evaluate(
            selectors,
            &document,
            &EvalOptions {
                parse_numbers: options.parse_numbers,
            },
        );

        info!(picked = picked.len(), "Picked fields");
        Ok(picked)
    }
}

/// One-shot pick over a new HTTP transport
pub async fn fetch_json_pick(
    url: &str,
    selectors: &[Selector],
    options: &PickOptions,
) -> Result<Picked, PickError> {
    Picker::new()?.pick(url, selectors, options).await
}
