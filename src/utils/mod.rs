//! Utility modules supporting provider implementations.
//!
//! - [`HttpClient`]: shared reqwest client with a configurable timeout
//!
//! ```rust,no_run
//! use materials_master::utils::HttpClient;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::with_timeout(Duration::from_secs(10))?;
//! # let _ = client;
//! # Ok(())
//! # }
//! ```

mod http;

pub use http::{HttpClient, DEFAULT_TIMEOUT};
