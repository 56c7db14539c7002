//! Utilities Module - shared infrastructure
//!
//! - `constants`: Centralized timeouts and limits

pub mod constants;

pub use constants::{CONNECT_TIMEOUT, DEFAULT_TIMEOUT, REDIRECT_LIMIT, USER_AGENT};
