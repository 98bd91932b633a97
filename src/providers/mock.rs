//! Mock provider for testing purposes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::models::{Credential, ProviderMaterial, QueryDescriptor};
use crate::providers::{ProviderError, SearchProvider};

/// A scripted outcome for one call to the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockResponse {
    /// Resolve with these items
    Materials(Vec<ProviderMaterial>),
    /// Reject with an API error carrying this message
    Fail(String),
}

/// A provider that returns predefined responses and records every call.
///
/// Queued responses are consumed in order; once the queue is empty the
/// fallback response is used for every further call.
#[derive(Debug)]
pub struct MockProvider {
    queued: Mutex<VecDeque<MockResponse>>,
    fallback: Mutex<MockResponse>,
    calls: Mutex<Vec<(Credential, QueryDescriptor)>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a mock that resolves with no materials
    pub fn new() -> Self {
        Self::with_response(MockResponse::Materials(Vec::new()))
    }

    /// Create a mock that always answers with `response`
    pub fn with_response(response: MockResponse) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always resolves with `items`
    pub fn with_materials(items: Vec<ProviderMaterial>) -> Self {
        Self::with_response(MockResponse::Materials(items))
    }

    /// Create a mock that always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_response(MockResponse::Fail(message.into()))
    }

    /// Replace the fallback response
    pub fn set_response(&self, response: MockResponse) {
        *self.fallback.lock().unwrap_or_else(PoisonError::into_inner) = response;
    }

    /// Queue a response for the next unanswered call
    pub fn push_response(&self, response: MockResponse) {
        self.queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Number of searches received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Queries received so far, in call order
    pub fn queries(&self) -> Vec<QueryDescriptor> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, query)| query.clone())
            .collect()
    }

    /// Credentials received so far, in call order
    pub fn credentials(&self) -> Vec<Credential> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(credential, _)| credential.clone())
            .collect()
    }

    fn next_response(&self) -> MockResponse {
        let queued = self
            .queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match queued {
            Some(response) => response,
            None => self
                .fallback
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}

#[async_trait]
impl SearchProvider for MockProvider {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Provider"
    }

    async fn search(
        &self,
        credential: &Credential,
        query: &QueryDescriptor,
    ) -> Result<Vec<ProviderMaterial>, ProviderError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((credential.clone(), query.clone()));

        match self.next_response() {
            MockResponse::Materials(items) => Ok(items),
            MockResponse::Fail(message) => Err(ProviderError::Api(message)),
        }
    }
}

/// The two-material fixture used throughout the tests
pub fn sample_materials() -> Vec<ProviderMaterial> {
    vec![
        ProviderMaterial::new("mp-149", "Si", "Fd-3m", -5.425, 1.155),
        ProviderMaterial::new("mp-66", "GaAs", "F-43m", -3.456, 1.429),
    ]
}
