//! Centralized constants for HTTP picking
//!
//! All timeout and limit values in one place for easy tuning.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════
// Timeouts
// ═══════════════════════════════════════════════════════════════

/// Whole-request timeout when the caller sets none
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for establishing HTTP connections
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ═══════════════════════════════════════════════════════════════
// HTTP Client Limits
// ═══════════════════════════════════════════════════════════════

/// Maximum number of HTTP redirects to follow
pub const REDIRECT_LIMIT: usize = 5;

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("jsonpick/", env!("CARGO_PKG_VERSION"));

// ═══════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_timeout_is_shorter_than_request() {
        assert!(CONNECT_TIMEOUT < DEFAULT_TIMEOUT);
    }

    #[test]
    fn redirect_limit_is_reasonable() {
        const _: () = {
            assert!(REDIRECT_LIMIT >= 3);
            assert!(REDIRECT_LIMIT <= 10);
        };
        assert_eq!(REDIRECT_LIMIT, 5);
    }

    #[test]
    fn user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("jsonpick/"));
    }
}
