//! Material records, both as providers return them and as they are displayed.

use serde::{Deserialize, Serialize};

/// A material as returned by a search provider.
///
/// Every field is optional: providers differ in what they fill in, and a
/// missing field must not fail the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderMaterial {
    pub material_id: Option<String>,
    pub formula: Option<String>,
    pub spacegroup: Option<String>,
    pub energy_per_atom: Option<f64>,
    pub band_gap: Option<f64>,
}

impl ProviderMaterial {
    /// Create a fully populated provider item
    pub fn new(
        material_id: impl Into<String>,
        formula: impl Into<String>,
        spacegroup: impl Into<String>,
        energy_per_atom: f64,
        band_gap: f64,
    ) -> Self {
        Self {
            material_id: Some(material_id.into()),
            formula: Some(formula.into()),
            spacegroup: Some(spacegroup.into()),
            energy_per_atom: Some(energy_per_atom),
            band_gap: Some(band_gap),
        }
    }
}

/// Normalized material summary, one row of the results table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRecord {
    /// Stable external identifier, e.g. `mp-149`
    pub id: String,
    pub formula: String,
    pub space_group: String,
    /// Energy per atom in eV/atom
    pub energy_per_atom: f64,
    /// Band gap in eV
    pub band_gap: f64,
}

impl From<ProviderMaterial> for MaterialRecord {
    fn from(item: ProviderMaterial) -> Self {
        Self {
            id: item.material_id.unwrap_or_default(),
            formula: item.formula.unwrap_or_default(),
            space_group: item.spacegroup.unwrap_or_default(),
            energy_per_atom: item.energy_per_atom.unwrap_or_default(),
            band_gap: item.band_gap.unwrap_or_default(),
        }
    }
}

/// Ordered results, in the order the provider returned them
pub type ResultSet = Vec<MaterialRecord>;

/// Map provider items onto display records, preserving order
pub fn normalize(items: Vec<ProviderMaterial>) -> ResultSet {
    items.into_iter().map(MaterialRecord::from).collect()
}
