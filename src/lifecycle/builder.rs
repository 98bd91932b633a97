//! Query builder: the active mode, the raw input, and the submit gate.

use serde::Serialize;

use crate::models::{Credential, QueryDescriptor, QueryMode};

/// Local validation failures, reported before any request is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Please enter your Materials Project API key")]
    MissingCredential,

    #[error("Please enter a search query")]
    MissingQuery,
}

/// Validate a submission and build its descriptor.
///
/// The credential is checked before the query text, so a user missing both
/// sees the credential error.
pub fn try_submit(
    mode: QueryMode,
    credential: &Credential,
    raw_input: &str,
) -> Result<QueryDescriptor, ValidationError> {
    if !credential.is_set() {
        return Err(ValidationError::MissingCredential);
    }

    let value = raw_input.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingQuery);
    }

    Ok(QueryDescriptor::new(mode, value))
}

/// The editable query draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryBuilder {
    mode: QueryMode,
    raw_input: String,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch mode; the input is kept and reinterpreted under the new mode
    pub fn set_mode(&mut self, mode: QueryMode) {
        self.mode = mode;
    }

    /// Replace the input verbatim, untrimmed
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.raw_input = text.into();
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn input(&self) -> &str {
        &self.raw_input
    }

    pub fn try_submit(&self, credential: &Credential) -> Result<QueryDescriptor, ValidationError> {
        try_submit(self.mode, credential, &self.raw_input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential() {
        for key in ["", "  ", "\t"] {
            assert_eq!(
                try_submit(QueryMode::Formula, &Credential::new(key), "Si"),
                Err(ValidationError::MissingCredential)
            );
        }
    }

    #[test]
    fn test_missing_query() {
        for input in ["", "   ", "\n"] {
            assert_eq!(
                try_submit(QueryMode::Formula, &Credential::new("abc"), input),
                Err(ValidationError::MissingQuery)
            );
        }
    }

    #[test]
    fn test_credential_checked_first() {
        assert_eq!(
            try_submit(QueryMode::MaterialId, &Credential::empty(), " "),
            Err(ValidationError::MissingCredential)
        );
    }

    #[test]
    fn test_value_is_trimmed() {
        let descriptor = try_submit(QueryMode::ChemicalSystem, &Credential::new("abc"), "  Li-O \n").unwrap();
        assert_eq!(descriptor.mode(), QueryMode::ChemicalSystem);
        assert_eq!(descriptor.value(), "Li-O");
    }

    #[test]
    fn test_input_stored_verbatim() {
        let mut builder = QueryBuilder::new();
        builder.set_input("  GaAs ");
        assert_eq!(builder.input(), "  GaAs ");
    }

    #[test]
    fn test_mode_switch_keeps_input() {
        let mut builder = QueryBuilder::new();
        builder.set_input("mp-149");
        builder.set_mode(QueryMode::MaterialId);
        assert_eq!(builder.input(), "mp-149");

        let descriptor = builder.try_submit(&Credential::new("abc")).unwrap();
        assert_eq!(descriptor.mode(), QueryMode::MaterialId);
        assert_eq!(descriptor.value(), "mp-149");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::MissingCredential.to_string(),
            "Please enter your Materials Project API key"
        );
        assert_eq!(ValidationError::MissingQuery.to_string(), "Please enter a search query");
    }
}
