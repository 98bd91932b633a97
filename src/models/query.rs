//! Query modes and the immutable descriptor built at submit time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which material field a query is matched against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Chemical formula, e.g. `GaAs`
    #[default]
    Formula,
    /// Stable material identifier, e.g. `mp-149`
    MaterialId,
    /// Chemical system, e.g. `Li-O`
    ChemicalSystem,
}

impl QueryMode {
    /// All modes in display order
    pub const ALL: [QueryMode; 3] = [
        QueryMode::Formula,
        QueryMode::MaterialId,
        QueryMode::ChemicalSystem,
    ];

    /// Short identifier used on the command line
    pub fn id(&self) -> &'static str {
        match self {
            QueryMode::Formula => "formula",
            QueryMode::MaterialId => "material-id",
            QueryMode::ChemicalSystem => "chemsys",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            QueryMode::Formula => "Chemical Formula",
            QueryMode::MaterialId => "Material ID",
            QueryMode::ChemicalSystem => "Chemical System",
        }
    }

    /// Example input shown as a placeholder
    pub fn placeholder(&self) -> &'static str {
        match self {
            QueryMode::Formula => "e.g., Si, GaAs, Li2O",
            QueryMode::MaterialId => "e.g., mp-149, mp-66",
            QueryMode::ChemicalSystem => "e.g., Li-O, Ga-As",
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QueryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "formula" => Ok(QueryMode::Formula),
            "material-id" | "id" | "mpid" => Ok(QueryMode::MaterialId),
            "chemsys" | "system" | "chemical-system" => Ok(QueryMode::ChemicalSystem),
            other => Err(format!("Unknown query mode: {}", other)),
        }
    }
}

/// A validated query, ready to hand to a search provider.
///
/// Only [`crate::lifecycle::try_submit`] builds one, so `value` is always
/// trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDescriptor {
    mode: QueryMode,
    value: String,
}

impl QueryDescriptor {
    pub(crate) fn new(mode: QueryMode, value: impl Into<String>) -> Self {
        Self {
            mode,
            value: value.into(),
        }
    }

    /// The mode the value is interpreted under
    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    /// The trimmed query text
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.mode.id(), self.value)
    }
}
