//! Utility modules supporting retrieval.
//!
//! - [`HttpClient`]: shared reqwest client with user agent and timeouts

mod http;

pub use http::{HttpClient, DEFAULT_TIMEOUT_SECS};
