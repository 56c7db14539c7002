//! Error types with fix suggestions (v0.1)
//!
//! Path resolution never fails: a missing value is `None`, not an error.
//! Everything here comes from the edges (HTTP, spec files, CLI arguments).

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum PickError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Request errors (PICK-010 to PICK-030)
    // ─────────────────────────────────────────────────────────────
    #[error("PICK-010: Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("PICK-011: Invalid header '{header}' (expected 'Name: value')")]
    InvalidHeader { header: String },

    #[error("PICK-020: HTTP {status} {status_text}")]
    HttpStatus { status: u16, status_text: String },

    #[error("PICK-021: Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("PICK-022: HTTP request failed: {0}")]
    Transport(String),

    #[error("PICK-030: Invalid JSON document: {details}")]
    InvalidJson { details: String },

    // ─────────────────────────────────────────────────────────────
    // Selector errors (PICK-040 to PICK-041)
    // ─────────────────────────────────────────────────────────────
    #[error("PICK-040: Invalid selector '{selector}'")]
    InvalidSelector { selector: String },

    #[error("PICK-041: Unknown transform '{name}'")]
    UnknownTransform { name: String },

    // ─────────────────────────────────────────────────────────────
    // Spec file errors (PICK-050 to PICK-051)
    // ─────────────────────────────────────────────────────────────
    #[error("PICK-050: Spec parse error: {0}")]
    SpecParse(#[from] serde_yaml::Error),

    #[error("PICK-051: Environment variable '{name}' is not set")]
    MissingEnvVar { name: String },
}

impl FixSuggestion for PickError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            PickError::Io(_) => Some("Check file path and permissions"),
            PickError::InvalidUrl { .. } => Some("Use an absolute http:// or https:// URL"),
            PickError::InvalidHeader { .. } => Some("Pass headers as -H 'Accept: application/json'"),
            PickError::HttpStatus { .. } => {
                Some("Check the URL and any required auth headers (-H 'Authorization: ...')")
            }
            PickError::Timeout { .. } => Some("Raise the timeout with --timeout-ms"),
            PickError::Transport(_) => Some("Check network connectivity and the host name"),
            PickError::InvalidJson { .. } => {
                Some("The endpoint must return a JSON body (try it with curl | jq)")
            }
            PickError::InvalidSelector { .. } => {
                Some("Use 'path' or 'key=path', e.g. usd=balances[0].balance")
            }
            PickError::UnknownTransform { .. } => {
                Some("Use one of: length, first, last, compact, string, sum")
            }
            PickError::SpecParse(_) => Some("Check YAML syntax: indentation and quoting"),
            PickError::MissingEnvVar { .. } => {
                Some("Export the variable before running, or drop the ${env.NAME} reference")
            }
        }
    }
}
