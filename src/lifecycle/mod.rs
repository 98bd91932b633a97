//! Query building and the request lifecycle.
//!
//! - [`QueryBuilder`] / [`try_submit`]: turn a mode and raw text into a
//!   [`QueryDescriptor`](crate::models::QueryDescriptor), or a
//!   [`ValidationError`]
//! - [`reduce`]: pure transition function over [`SearchState`]
//! - [`SearchSession`]: drives one session against a
//!   [`SearchProvider`](crate::providers::SearchProvider), with a
//!   sequence-number guard against out-of-order completions
//!
//! ```rust,no_run
//! use materials_master::lifecycle::SearchSession;
//! use materials_master::models::{Credential, QueryMode};
//! use materials_master::providers::MockProvider;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new();
//! let mut session = SearchSession::new();
//! session.set_mode(QueryMode::Formula);
//! session.set_input("GaAs");
//!
//! let state = session.search(&provider, &Credential::new("my-key")).await;
//! println!("{:?}", state.request);
//! # }
//! ```

mod builder;
mod controller;
mod state;

pub use builder::{try_submit, QueryBuilder, ValidationError};
pub use controller::{Completion, Outcome, PendingSearch, SearchSession};
pub use state::{reduce, Event, RequestState, SearchState, PROVIDER_FAILURE_MESSAGE};
