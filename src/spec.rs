//! Pick spec files (v0.1)
//!
//! A YAML file describing one pick job:
//!
//! ```yaml
//! url: https://horizon-testnet.stellar.org/accounts/${env.ACCOUNT_ID}
//! headers:
//!   Authorization: "Bearer ${env.API_TOKEN}"
//! timeout_ms: 15000
//! parse_numbers: true
//! selectors:
//!   - balances[0].balance
//!   - { key: all_balances, path: "balances[*].balance" }
//!   - { key: memo, path: memo, default: null }
//! ```
//!
//! `${env.NAME}` in `url` and header values is expanded at load time.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::PickError;
use crate::picker::PickOptions;
use crate::selector::Selector;
use crate::util::DEFAULT_TIMEOUT;

/// Pattern for ${env.NAME} references
static ENV_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{env\.(\w+)\}").expect("Invalid regex pattern"));

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PickSpec {
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub parse_numbers: bool,
    pub selectors: Vec<Selector>,
}

impl PickSpec {
    /// Parse a spec, expanding `${env.NAME}` from the process environment
    pub fn from_yaml(yaml: &str) -> Result<Self, PickError> {
        Self::from_yaml_with(yaml, |name| std::env::var(name).ok())
    }

    /// Parse a spec with a custom variable lookup
    pub fn from_yaml_with<F>(yaml: &str, lookup: F) -> Result<Self, PickError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut spec: PickSpec = serde_yaml::from_str(yaml)?;

        spec.url = expand_env(&spec.url, &lookup)?;
        for value in spec.headers.values_mut() {
            *value = expand_env(value, &lookup)?;
        }

        Ok(spec)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, PickError> {
        let yaml = tokio::fs::read_to_string(path).await?;
        Self::from_yaml(&yaml)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn options(&self) -> PickOptions {
        PickOptions {
            parse_numbers: self.parse_numbers,
            timeout: self.timeout(),
            headers: self.headers.clone(),
        }
    }
}

/// Replace every `${env.NAME}`; the first unset variable is an error
pub fn expand_env<F>(input: &str, lookup: F) -> Result<String, PickError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for caps in ENV_PATTERN.captures_iter(input) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = lookup(name.as_str()).ok_or_else(|| PickError::MissingEnvVar {
            name: name.as_str().to_string(),
        })?;
        out.push_str(&input[last..whole.start()]);
        out.push_str(&value);
        last = whole.end();
    }

    out.push_str(&input[last..]);
    Ok(out)
}
