//! Materials Project search provider.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::models::{Credential, ProviderMaterial, QueryDescriptor, QueryMode};
use crate::providers::{ProviderError, SearchProvider};
use crate::utils::HttpClient;

/// Production API root
pub const MATERIALS_PROJECT_API_BASE: &str = "https://api.materialsproject.org";

const SUMMARY_ENDPOINT: &str = "materials/summary/";

const SUMMARY_FIELDS: &str = "material_id,formula_pretty,symmetry,energy_per_atom,band_gap";

const DEFAULT_MAX_RESULTS: usize = 100;

/// Materials Project search provider
///
/// Uses the `/materials/summary/` endpoint of the Materials Project REST API.
/// The API key is sent in the `X-API-KEY` header.
#[derive(Debug, Clone)]
pub struct MaterialsProjectProvider {
    client: HttpClient,
    base_url: Url,
    max_results: usize,
}

impl MaterialsProjectProvider {
    /// Create a provider for the public API
    pub fn new(client: HttpClient) -> Result<Self, ProviderError> {
        Self::with_base_url(client, MATERIALS_PROJECT_API_BASE)
    }

    /// Create a provider against a custom API root (mirrors, test servers)
    pub fn with_base_url(client: HttpClient, base_url: &str) -> Result<Self, ProviderError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ProviderError::InvalidRequest(format!("Invalid base URL: {}", e)))?;
        // Url::join drops the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            max_results: DEFAULT_MAX_RESULTS,
        })
    }

    /// Cap the number of documents requested per search
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    /// Query parameter carrying the search value for each mode
    fn query_param(mode: QueryMode) -> &'static str {
        match mode {
            QueryMode::Formula => "formula",
            QueryMode::MaterialId => "material_ids",
            QueryMode::ChemicalSystem => "chemsys",
        }
    }

    /// Build the summary URL for a query
    fn build_url(&self, query: &QueryDescriptor) -> Result<Url, ProviderError> {
        let mut url = self
            .base_url
            .join(SUMMARY_ENDPOINT)
            .map_err(|e| ProviderError::InvalidRequest(format!("Invalid URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair(Self::query_param(query.mode()), query.value())
            .append_pair("_fields", SUMMARY_FIELDS)
            .append_pair("_limit", &self.max_results.to_string());

        Ok(url)
    }

    /// Flatten a summary document into the provider item shape
    fn parse_doc(doc: MpSummaryDoc) -> ProviderMaterial {
        ProviderMaterial {
            material_id: doc.material_id,
            formula: doc.formula_pretty,
            spacegroup: doc.symmetry.and_then(|s| s.symbol),
            energy_per_atom: doc.energy_per_atom,
            band_gap: doc.band_gap,
        }
    }
}

#[async_trait]
impl SearchProvider for MaterialsProjectProvider {
    fn id(&self) -> &str {
        "materials_project"
    }

    fn name(&self) -> &str {
        "Materials Project"
    }

    async fn search(
        &self,
        credential: &Credential,
        query: &QueryDescriptor,
    ) -> Result<Vec<ProviderMaterial>, ProviderError> {
        let url = self.build_url(query)?;
        tracing::debug!(%url, "Querying Materials Project");

        let response = self
            .client
            .client()
            .get(url)
            .header("X-API-KEY", credential.expose())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                ProviderError::Network(format!("Failed to search Materials Project: {}", e))
            })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ProviderError::Unauthorized(format!(
                    "Materials Project rejected the API key ({})",
                    response.status()
                )));
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(ProviderError::RateLimit),
            status => {
                return Err(ProviderError::Api(format!(
                    "Materials Project API returned status: {}",
                    status
                )));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to read response: {}", e)))?;
        let data: MpSummaryResponse = serde_json::from_str(&body)?;

        Ok(data.data.into_iter().map(Self::parse_doc).collect())
    }
}

// ===== Materials Project API Types =====

#[derive(Debug, Deserialize)]
struct MpSummaryResponse {
    data: Vec<MpSummaryDoc>,
}

#[derive(Debug, Deserialize)]
struct MpSummaryDoc {
    #[serde(default)]
    material_id: Option<String>,
    #[serde(default)]
    formula_pretty: Option<String>,
    #[serde(default)]
    symmetry: Option<MpSymmetry>,
    #[serde(default)]
    energy_per_atom: Option<f64>,
    #[serde(default)]
    band_gap: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MpSymmetry {
    #[serde(default)]
    symbol: Option<String>,
}
