//! # Materials Master
//!
//! Search the Materials Project database for crystalline materials by
//! chemical formula, material ID, or chemical system, and normalize the
//! matches into a stable tabular shape.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Credential, QueryDescriptor, MaterialRecord)
//! - [`lifecycle`]: Query builder and the request state machine
//! - [`providers`]: Search provider trait, Materials Project client, and mock
//! - [`ui`]: Terminal rendering of search state
//! - [`utils`]: HTTP client
//! - [`config`]: Configuration management

pub mod config;
pub mod lifecycle;
pub mod models;
pub mod providers;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use lifecycle::{RequestState, SearchSession, SearchState};
pub use models::{Credential, MaterialRecord, QueryMode};
pub use providers::SearchProvider;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
