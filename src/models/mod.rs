//! Core data models for materials queries and their normalized results.

mod credential;
mod material;
mod query;

pub use credential::Credential;
pub use material::{normalize, MaterialRecord, ProviderMaterial, ResultSet};
pub use query::{QueryDescriptor, QueryMode};
