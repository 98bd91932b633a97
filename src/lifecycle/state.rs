//! Request state and its pure transition function.

use serde::Serialize;

use super::ValidationError;
use crate::models::ResultSet;

/// User-facing message for every provider failure
pub const PROVIDER_FAILURE_MESSAGE: &str = "Failed to fetch data from the materials database";

/// Where the current request stands
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    /// Waiting on request `seq`. `stale` holds the results of the previous
    /// successful request, which stay visible until the new outcome arrives.
    Pending { seq: u64, stale: Option<ResultSet> },
    Success { results: ResultSet },
    Failed { message: String },
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending { .. })
    }

    /// Results to display right now, stale ones included
    pub fn visible_results(&self) -> Option<&ResultSet> {
        match self {
            RequestState::Success { results } => Some(results),
            RequestState::Pending { stale, .. } => stale.as_ref(),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Everything that can happen to a search session
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Submit was rejected locally
    Invalid(ValidationError),
    /// Request `seq` was issued
    Submitted { seq: u64 },
    /// Request `seq` resolved with normalized results
    Resolved { seq: u64, results: ResultSet },
    /// Request `seq` failed
    Failed { seq: u64 },
}

/// Observable state of a search session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub request: RequestState,
    pub validation_error: Option<ValidationError>,
    /// Sequence number of the most recently issued request, 0 before any
    pub latest_seq: u64,
}

impl SearchState {
    /// The banner to show, if any: a validation error wins over a provider failure
    pub fn error_message(&self) -> Option<String> {
        self.validation_error
            .map(|e| e.to_string())
            .or_else(|| self.request.error_message().map(str::to_string))
    }

    /// Whether an outcome for request `seq` would be applied
    pub fn is_awaiting(&self, seq: u64) -> bool {
        seq == self.latest_seq
            && matches!(self.request, RequestState::Pending { seq: pending, .. } if pending == seq)
    }
}

/// Apply one event.
///
/// Completions are only accepted for the latest issued request while it is
/// still pending; anything else leaves the state untouched.
pub fn reduce(state: SearchState, event: Event) -> SearchState {
    match event {
        Event::Invalid(error) => SearchState {
            validation_error: Some(error),
            ..state
        },

        Event::Submitted { seq } => {
            if seq <= state.latest_seq {
                return state;
            }
            let stale = match state.request {
                RequestState::Success { results } => Some(results),
                RequestState::Pending { stale, .. } => stale,
                RequestState::Idle | RequestState::Failed { .. } => None,
            };
            SearchState {
                request: RequestState::Pending { seq, stale },
                validation_error: None,
                latest_seq: seq,
            }
        }

        Event::Resolved { seq, results } => {
            if !state.is_awaiting(seq) {
                return state;
            }
            SearchState {
                request: RequestState::Success { results },
                ..state
            }
        }

        Event::Failed { seq } => {
            if !state.is_awaiting(seq) {
                return state;
            }
            SearchState {
                request: RequestState::Failed {
                    message: PROVIDER_FAILURE_MESSAGE.to_string(),
                },
                ..state
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MaterialRecord;

    fn record(id: &str) -> MaterialRecord {
        MaterialRecord {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn submitted(seq: u64) -> SearchState {
        reduce(SearchState::default(), Event::Submitted { seq })
    }

    #[test]
    fn test_initial_state_is_idle() {
        let state = SearchState::default();
        assert_eq!(state.request, RequestState::Idle);
        assert!(state.error_message().is_none());
        assert!(state.request.visible_results().is_none());
    }

    #[test]
    fn test_invalid_keeps_request_state() {
        let state = reduce(SearchState::default(), Event::Invalid(ValidationError::MissingQuery));
        assert_eq!(state.request, RequestState::Idle);
        assert_eq!(state.validation_error, Some(ValidationError::MissingQuery));

        let pending = reduce(submitted(1), Event::Invalid(ValidationError::MissingCredential));
        assert!(pending.request.is_pending());
        assert_eq!(pending.validation_error, Some(ValidationError::MissingCredential));
    }

    #[test]
    fn test_invalid_overwrites_previous_error() {
        let state = reduce(SearchState::default(), Event::Invalid(ValidationError::MissingCredential));
        let state = reduce(state, Event::Invalid(ValidationError::MissingQuery));
        assert_eq!(state.validation_error, Some(ValidationError::MissingQuery));
    }

    #[test]
    fn test_submit_clears_errors() {
        let state = reduce(SearchState::default(), Event::Invalid(ValidationError::MissingQuery));
        let state = reduce(state, Event::Submitted { seq: 1 });
        assert!(state.validation_error.is_none());
        assert_eq!(state.request, RequestState::Pending { seq: 1, stale: None });

        let failed = reduce(state, Event::Failed { seq: 1 });
        assert_eq!(failed.error_message().as_deref(), Some(PROVIDER_FAILURE_MESSAGE));
        let retried = reduce(failed, Event::Submitted { seq: 2 });
        assert!(retried.error_message().is_none());
        assert_eq!(retried.request, RequestState::Pending { seq: 2, stale: None });
    }

    #[test]
    fn test_resolve_and_fail() {
        let ok = reduce(submitted(1), Event::Resolved { seq: 1, results: vec![record("mp-149")] });
        assert_eq!(ok.request, RequestState::Success { results: vec![record("mp-149")] });

        let failed = reduce(submitted(1), Event::Failed { seq: 1 });
        assert_eq!(failed.request.error_message(), Some(PROVIDER_FAILURE_MESSAGE));
        assert!(failed.request.visible_results().is_none());
    }

    #[test]
    fn test_previous_results_stay_visible_while_pending() {
        let ok = reduce(submitted(1), Event::Resolved { seq: 1, results: vec![record("mp-149")] });
        let pending = reduce(ok, Event::Submitted { seq: 2 });
        assert!(pending.request.is_pending());
        assert_eq!(pending.request.visible_results(), Some(&vec![record("mp-149")]));

        let superseded = reduce(pending, Event::Submitted { seq: 3 });
        assert_eq!(superseded.request.visible_results(), Some(&vec![record("mp-149")]));
    }

    #[test]
    fn test_stale_completion_discarded() {
        let state = reduce(submitted(1), Event::Submitted { seq: 2 });
        let after_old = reduce(state.clone(), Event::Resolved { seq: 1, results: vec![record("old")] });
        assert_eq!(after_old, state);
        let after_old_fail = reduce(state.clone(), Event::Failed { seq: 1 });
        assert_eq!(after_old_fail, state);
    }

    #[test]
    fn test_late_completion_after_newer_outcome_discarded() {
        let state = reduce(submitted(1), Event::Submitted { seq: 2 });
        let state = reduce(state, Event::Resolved { seq: 2, results: vec![record("new")] });
        let state = reduce(state, Event::Failed { seq: 1 });
        assert_eq!(state.request, RequestState::Success { results: vec![record("new")] });
    }

    #[test]
    fn test_duplicate_completion_ignored() {
        let state = reduce(submitted(1), Event::Resolved { seq: 1, results: vec![record("a")] });
        let state = reduce(state, Event::Failed { seq: 1 });
        assert_eq!(state.request, RequestState::Success { results: vec![record("a")] });
    }

    #[test]
    fn test_out_of_order_submit_ignored() {
        let state = submitted(5);
        assert_eq!(reduce(state.clone(), Event::Submitted { seq: 3 }), state);
    }

    #[test]
    fn test_state_serializes_with_status_tag() {
        let json = serde_json::to_value(&submitted(1)).unwrap();
        assert_eq!(json["request"]["status"], "pending");
        assert_eq!(json["latest_seq"], 1);
    }
}
