//! Request lifecycle controller.
//!
//! A [`SearchSession`] owns the query draft and the [`SearchState`]. Each
//! valid submission is tagged with a strictly increasing sequence number, and
//! only the outcome of the newest request is ever applied, so a slow response
//! can never overwrite the result of a later one.

use crate::models::{normalize, Credential, QueryDescriptor, QueryMode, ResultSet};
use crate::providers::SearchProvider;

use super::state::{reduce, Event, RequestState, SearchState};
use super::{QueryBuilder, ValidationError};

/// A request that passed validation and still has to be sent
#[derive(Debug, Clone)]
pub struct PendingSearch {
    seq: u64,
    credential: Credential,
    query: QueryDescriptor,
}

impl PendingSearch {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &QueryDescriptor {
        &self.query
    }

    /// Call the provider once and capture the outcome.
    ///
    /// Provider errors are logged here and collapsed; the cause never leaves
    /// this boundary.
    pub async fn execute(self, provider: &dyn SearchProvider) -> Completion {
        let outcome = match provider.search(&self.credential, &self.query).await {
            Ok(items) => {
                tracing::debug!(
                    seq = self.seq,
                    provider = provider.id(),
                    count = items.len(),
                    "Search resolved"
                );
                Outcome::Resolved(normalize(items))
            }
            Err(e) => {
                tracing::warn!(
                    seq = self.seq,
                    provider = provider.id(),
                    query = %self.query,
                    "Search failed: {}",
                    e
                );
                Outcome::Failed
            }
        };

        Completion {
            seq: self.seq,
            outcome,
        }
    }
}

/// What a provider call produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Resolved(ResultSet),
    Failed,
}

/// The outcome of one request, tagged with its sequence number
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub seq: u64,
    pub outcome: Outcome,
}

impl From<Completion> for Event {
    fn from(completion: Completion) -> Self {
        match completion.outcome {
            Outcome::Resolved(results) => Event::Resolved {
                seq: completion.seq,
                results,
            },
            Outcome::Failed => Event::Failed {
                seq: completion.seq,
            },
        }
    }
}

/// One user's search session: draft query plus request state
#[derive(Debug, Default)]
pub struct SearchSession {
    builder: QueryBuilder,
    state: SearchState,
    next_seq: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&mut self, mode: QueryMode) {
        self.builder.set_mode(mode);
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.builder.set_input(text);
    }

    /// The current draft (mode and raw input)
    pub fn draft(&self) -> &QueryBuilder {
        &self.builder
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn request_state(&self) -> &RequestState {
        &self.state.request
    }

    pub fn validation_error(&self) -> Option<ValidationError> {
        self.state.validation_error
    }

    /// Validate the draft and, if it passes, move to Pending.
    ///
    /// Returns `None` when validation fails; the error is then recorded on
    /// the state and no request exists. A submission while another request
    /// is pending supersedes it.
    pub fn submit(&mut self, credential: &Credential) -> Option<PendingSearch> {
        match self.builder.try_submit(credential) {
            Ok(query) => {
                self.next_seq += 1;
                let seq = self.next_seq;
                tracing::debug!(seq, %query, "Submitting search");
                self.apply(Event::Submitted { seq });
                Some(PendingSearch {
                    seq,
                    credential: credential.clone(),
                    query,
                })
            }
            Err(e) => {
                tracing::debug!("Submit rejected: {}", e);
                self.apply(Event::Invalid(e));
                None
            }
        }
    }

    /// Apply a completion. Returns `false` if it was stale and discarded.
    pub fn complete(&mut self, completion: Completion) -> bool {
        if !self.state.is_awaiting(completion.seq) {
            tracing::debug!(
                seq = completion.seq,
                latest = self.state.latest_seq,
                "Discarding stale search outcome"
            );
            return false;
        }
        self.apply(completion.into());
        true
    }

    /// Submit, await the provider, and apply the outcome
    pub async fn search(
        &mut self,
        provider: &dyn SearchProvider,
        credential: &Credential,
    ) -> &SearchState {
        if let Some(pending) = self.submit(credential) {
            let completion = pending.execute(provider).await;
            self.complete(completion);
        }
        &self.state
    }

    fn apply(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::PROVIDER_FAILURE_MESSAGE;
    use crate::providers::{sample_materials, MockProvider, MockResponse};

    fn session(input: &str) -> SearchSession {
        let mut session = SearchSession::new();
        session.set_input(input);
        session
    }

    #[tokio::test]
    async fn test_missing_credential_issues_no_request() {
        let provider = MockProvider::with_materials(sample_materials());
        let mut session = session("Si");

        let state = session.search(&provider, &Credential::new("")).await;

        assert_eq!(state.request, RequestState::Idle);
        assert_eq!(state.validation_error, Some(ValidationError::MissingCredential));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_query_issues_no_request() {
        let provider = MockProvider::with_materials(sample_materials());
        let mut session = session("   ");

        let state = session.search(&provider, &Credential::new("abc")).await;

        assert_eq!(state.request, RequestState::Idle);
        assert_eq!(state.validation_error, Some(ValidationError::MissingQuery));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_success_in_provider_order() {
        let provider = MockProvider::with_materials(sample_materials());
        let mut session = session("Si");

        let state = session.search(&provider, &Credential::new("abc")).await;

        match &state.request {
            RequestState::Success { results } => {
                assert_eq!(results.len(), 2);
                assert_eq!(results[0].id, "mp-149");
                assert_eq!(results[1].id, "mp-66");
            }
            other => panic!("Expected Success, got {:?}", other),
        }
        assert!(state.error_message().is_none());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_uses_generic_message() {
        let provider = MockProvider::failing("503 from upstream");
        let mut session = session("GaAs");

        let state = session.search(&provider, &Credential::new("abc")).await;

        assert_eq!(
            state.request,
            RequestState::Failed {
                message: PROVIDER_FAILURE_MESSAGE.to_string()
            }
        );
        assert!(state.request.visible_results().is_none());
    }

    #[tokio::test]
    async fn test_sequence_numbers_strictly_increase() {
        let provider = MockProvider::new();
        let mut session = session("Si");
        let credential = Credential::new("abc");

        let mut seqs = Vec::new();
        for _ in 0..4 {
            let pending = session.submit(&credential).unwrap();
            seqs.push(pending.seq());
            let completion = pending.execute(&provider).await;
            assert!(session.complete(completion));
        }

        assert_eq!(provider.call_count(), 4);
        assert!(seqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_invalid_submit_does_not_consume_sequence() {
        let mut session = session("");
        let credential = Credential::new("abc");
        assert!(session.submit(&credential).is_none());

        session.set_input("Si");
        let pending = session.submit(&credential).unwrap();
        assert_eq!(pending.seq(), 1);
    }

    #[tokio::test]
    async fn test_older_response_cannot_overwrite_newer() {
        let provider = MockProvider::new();
        provider.push_response(MockResponse::Materials(sample_materials()));
        provider.push_response(MockResponse::Fail("late".to_string()));
        let credential = Credential::new("abc");
        let mut session = session("Si");

        let first = session.submit(&credential).unwrap();
        session.set_input("GaAs");
        let second = session.submit(&credential).unwrap();

        let first_done = first.execute(&provider).await;
        let second_done = second.execute(&provider).await;

        // second request finishes first, then the first straggles in
        assert!(session.complete(second_done));
        assert!(!session.complete(first_done));

        assert_eq!(
            session.request_state().error_message(),
            Some(PROVIDER_FAILURE_MESSAGE)
        );
        assert_eq!(session.state().latest_seq, 2);
    }

    #[tokio::test]
    async fn test_stale_response_while_newer_pending() {
        let provider = MockProvider::with_materials(sample_materials());
        let credential = Credential::new("abc");
        let mut session = session("Si");

        let first = session.submit(&credential).unwrap();
        let _second = session.submit(&credential).unwrap();

        let first_done = first.execute(&provider).await;
        assert!(!session.complete(first_done));
        assert!(session.request_state().is_pending());
    }

    #[tokio::test]
    async fn test_repeat_submission_is_idempotent() {
        let provider = MockProvider::with_materials(sample_materials());
        let credential = Credential::new("abc");
        let mut session = session("Si");

        let first = session.search(&provider, &credential).await.request.clone();
        let second = session.search(&provider, &credential).await.request.clone();

        assert_eq!(first, second);
        assert!(matches!(first, RequestState::Success { .. }));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_response_is_success() {
        let provider = MockProvider::new();
        let mut session = session("Xx");

        let state = session.search(&provider, &Credential::new("abc")).await;
        assert_eq!(state.request, RequestState::Success { results: Vec::new() });
    }

    #[tokio::test]
    async fn test_provider_receives_trimmed_query() {
        let provider = MockProvider::new();
        let mut session = session("  Li-O  ");
        session.set_mode(QueryMode::ChemicalSystem);

        session.search(&provider, &Credential::new("abc")).await;

        let queries = provider.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].mode(), QueryMode::ChemicalSystem);
        assert_eq!(queries[0].value(), "Li-O");
        assert_eq!(session.draft().input(), "  Li-O  ");
    }
}
