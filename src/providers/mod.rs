//! Search providers: the external services that actually execute a query.
//!
//! The request lifecycle only depends on the [`SearchProvider`] trait. The
//! real implementation talks to the Materials Project REST API; the
//! [`MockProvider`] returns scripted fixtures for tests.
//!
//! # Implementing a New Provider
//!
//! 1. Create a struct that implements `SearchProvider`
//! 2. Translate the [`QueryDescriptor`] into the service's own query syntax
//! 3. Return the raw items as [`ProviderMaterial`]s; normalization into
//!    display records happens in the lifecycle controller

mod materials_project;
pub mod mock;

pub use materials_project::{MaterialsProjectProvider, MATERIALS_PROJECT_API_BASE};
pub use mock::{sample_materials, MockProvider, MockResponse};

use crate::models::{Credential, ProviderMaterial, QueryDescriptor};
use async_trait::async_trait;

/// Interface for every materials search backend
#[async_trait]
pub trait SearchProvider: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this provider (e.g. "materials_project")
    fn id(&self) -> &str;

    /// Human-readable name of this provider
    fn name(&self) -> &str;

    /// Run a single search.
    ///
    /// The credential is passed through untouched; deciding whether it is
    /// valid is entirely up to the provider.
    async fn search(
        &self,
        credential: &Credential,
        query: &QueryDescriptor,
    ) -> Result<Vec<ProviderMaterial>, ProviderError>;
}

/// Errors that can occur when talking to a provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider rejected the credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// API error from the provider
    #[error("API error: {0}")]
    Api(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(format!("JSON: {}", err))
    }
}
