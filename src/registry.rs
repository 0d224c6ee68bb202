//! French company-registry lookup
//!
//! Queries the recherche-entreprises search API by name. The adapter never
//! fails the cascade: non-200 responses, network errors and parse failures
//! all degrade to an empty result list.

use crate::config::AppConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// A company record returned by the registry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryRecord {
    pub legal_name: String,
    /// NAF/APE code, e.g. "62.02A"
    pub industry_code: Option<String>,
    /// Human-readable activity label when the API provides one
    pub activity_label: Option<String>,
    pub address: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    /// INSEE headcount bracket code
    pub headcount_code: Option<String>,
    pub siren: Option<String>,
}

impl RegistryRecord {
    /// Works-council and staff-committee registrations shadow the real
    /// company and carry meaningless sector codes.
    pub fn is_committee(&self) -> bool {
        let upper = self.legal_name.to_uppercase();
        upper.contains("COMITE") || upper.contains("CSE ")
    }
}

/// Pick the first record that is not a works-council entity, falling back
/// to the first record when every candidate is one.
pub fn pick_best(records: &[RegistryRecord]) -> Option<&RegistryRecord> {
    records
        .iter()
        .find(|r| !r.is_committee())
        .or_else(|| records.first())
}

/// Registry lookup collaborator
#[async_trait]
pub trait RegistrySearch: Send + Sync {
    /// Search the registry by company name. Failures yield an empty list.
    async fn search(&self, query: &str) -> Vec<RegistryRecord>;
}

// Wire format of the recherche-entreprises API (partial)

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    results: Vec<ApiResult>,
}

#[derive(Debug, Deserialize)]
struct ApiResult {
    nom_complet: Option<String>,
    activite_principale: Option<String>,
    libelle_activite_principale: Option<String>,
    tranche_effectif_salarie: Option<String>,
    siren: Option<String>,
    adresse: Option<String>,
    region: Option<String>,
    #[serde(default)]
    siege: ApiSiege,
}

#[derive(Debug, Deserialize, Default)]
struct ApiSiege {
    adresse: Option<String>,
    libelle_region: Option<String>,
    code_postal: Option<String>,
}

impl From<ApiResult> for RegistryRecord {
    fn from(res: ApiResult) -> Self {
        let address = res.siege.adresse.filter(|a| !a.is_empty()).or(res.adresse);
        let region = res
            .siege
            .libelle_region
            .filter(|r| !r.is_empty())
            .or(res.region);

        RegistryRecord {
            legal_name: res.nom_complet.unwrap_or_default(),
            industry_code: res.activite_principale,
            activity_label: res.libelle_activite_principale,
            address,
            region,
            postal_code: res.siege.code_postal,
            headcount_code: res.tranche_effectif_salarie,
            siren: res.siren,
        }
    }
}

/// HTTP client for the recherche-entreprises search endpoint
pub struct GouvRegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl GouvRegistryClient {
    /// Build the client from application configuration
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.request_timeout_secs))
            .user_agent(config.http.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.endpoints.registry_url.clone(),
        })
    }

    /// Build a client against an explicit base URL (tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(8))
                .build()
                .expect("default reqwest client must build"),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RegistrySearch for GouvRegistryClient {
    async fn search(&self, query: &str) -> Vec<RegistryRecord> {
        debug!("Registry search: {}", query);

        let response = match self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("per_page", "5")])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Registry call failed for '{}': {}", query, e);
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            debug!(
                "Registry returned status {} for '{}', treating as no results",
                response.status(),
                query
            );
            return Vec::new();
        }

        match response.json::<ApiResponse>().await {
            Ok(parsed) => {
                debug!("Registry returned {} results for '{}'", parsed.results.len(), query);
                parsed.results.into_iter().map(RegistryRecord::from).collect()
            }
            Err(e) => {
                warn!("Registry response parse failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }
}
