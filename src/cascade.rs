//! The sector-resolution cascade
//!
//! Takes one raw input (name, email, pasted row) and resolves it to a
//! [`ClassificationResult`] through ordered stages with distinct confidence
//! semantics: user corrections and the hardcoded override table first, then
//! the company registry and its NAF code, then keyword scoring of a web
//! snippet, then the hosted model as last resort. Every input yields exactly
//! one well-formed result; internal faults become a `Crash` result instead
//! of propagating.

use crate::ai::SectorModel;
use crate::competitor;
use crate::corrections::{CorrectionStore, CustomSectorStore};
use crate::normalizer::InputNormalizer;
use crate::overrides::{self, OverrideRecord};
use crate::region;
use crate::registry::{self, RegistryRecord, RegistrySearch};
use crate::scorer::{TextScorer, SNIPPET_WEIGHT};
use crate::taxonomy::{self, SECTOR_ERROR, SECTOR_NOT_FOUND, SECTOR_OUT_OF_SCOPE, SECTOR_TO_VERIFY};
use crate::websearch::SnippetSearch;
use anyhow::Result;
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use tracing::{debug, info};

const ANNUAIRE_COMPANY_URL: &str = "https://annuaire-entreprises.data.gouv.fr/entreprise";
const ANNUAIRE_SEARCH_URL: &str = "https://annuaire-entreprises.data.gouv.fr/rechercher";

/// Which cascade stage produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum ResolutionSource {
    /// Personal email filtered before resolution
    Filtered,
    /// Hardcoded override or user correction
    Override,
    /// Registry record with a classified NAF code
    Registry,
    /// Registry activity label matched by keywords
    RegistryLabel,
    /// Web snippet matched by keywords
    Web,
    /// Hosted model verdict
    Ai,
    /// A web trace existed but nothing scored
    WebTrace,
    /// Every stage ran, nothing matched
    NotFound,
    /// Internal fault while processing the input
    Crash,
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ResolutionSource::Filtered => "Filtre",
            ResolutionSource::Override => "Base Interne",
            ResolutionSource::Registry => "Officiel (API)",
            ResolutionSource::RegistryLabel => "Officiel (Libellé NAF)",
            ResolutionSource::Web => "Analyse Web",
            ResolutionSource::Ai => "IA",
            ResolutionSource::WebTrace => "À Vérifier",
            ResolutionSource::NotFound => "Échec",
            ResolutionSource::Crash => "Crash",
        };
        write!(f, "{}", label)
    }
}

impl From<ResolutionSource> for String {
    fn from(source: ResolutionSource) -> Self {
        source.to_string()
    }
}

/// One resolution, created fresh per input and never mutated afterwards
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    #[serde(rename = "Input")]
    pub input: String,
    #[serde(rename = "Nom Officiel")]
    pub official_name: String,
    #[serde(rename = "Secteur")]
    pub sector: String,
    #[serde(rename = "Détail")]
    pub detail: String,
    #[serde(rename = "Source")]
    pub source: ResolutionSource,
    #[serde(rename = "Score")]
    pub score: String,
    #[serde(rename = "Adresse")]
    pub address: String,
    #[serde(rename = "Région")]
    pub region: String,
    #[serde(rename = "Effectif")]
    pub headcount: String,
    #[serde(rename = "Lien")]
    pub permalink: String,
    #[serde(rename = "Concurrent")]
    pub is_competitor: bool,
}

/// Mutable classification state: user corrections and custom sectors.
/// Injected into the cascade so the pre-classification freshness re-read
/// is an explicit, testable call.
pub struct ResolverState {
    pub corrections: CorrectionStore,
    pub custom_sectors: CustomSectorStore,
}

impl ResolverState {
    /// Re-read both stores from disk so corrections made by concurrent
    /// worker processes become visible
    pub fn reload(&self) {
        self.corrections.reload();
        self.custom_sectors.reload();
    }

    /// Built-in sectors plus user-defined ones, the vocabulary offered to
    /// the AI classifier
    pub fn allowed_sectors(&self) -> Vec<String> {
        let mut sectors = taxonomy::builtin_sector_names();
        sectors.extend(self.custom_sectors.list());
        sectors
    }

    /// Record a user correction and make its sector part of the vocabulary
    pub fn record_correction(&self, name: &str, sector: &str) -> Result<()> {
        self.corrections.save(name, sector)?;
        self.custom_sectors.register(sector)?;
        Ok(())
    }
}

/// Sector-resolution cascade over injectable collaborators
pub struct Cascade {
    normalizer: InputNormalizer,
    scorer: TextScorer,
    registry: Box<dyn RegistrySearch>,
    web: Box<dyn SnippetSearch>,
    model: Box<dyn SectorModel>,
    state: ResolverState,
}

/// Identity and location data accumulated while walking the cascade
#[derive(Debug, Default)]
struct ResolvedIdentity {
    official_name: String,
    address: String,
    region: String,
    headcount: String,
    permalink: String,
}

impl Cascade {
    pub fn new(
        normalizer: InputNormalizer,
        registry: Box<dyn RegistrySearch>,
        web: Box<dyn SnippetSearch>,
        model: Box<dyn SectorModel>,
        state: ResolverState,
    ) -> Self {
        Self {
            normalizer,
            scorer: TextScorer::new(),
            registry,
            web,
            model,
            state,
        }
    }

    /// Access the mutable classification state (corrections, custom sectors)
    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    /// Classify one raw input. Never fails: internal faults, including
    /// panics in a collaborator, come back as a `Crash` result so batch
    /// processing always gets one row per input.
    pub async fn classify(&self, raw: &str) -> ClassificationResult {
        let outcome = AssertUnwindSafe(self.resolve(raw)).catch_unwind().await;
        let mut result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                info!("Classification failed for '{}': {:#}", raw, e);
                crash_record(raw, format!("{:#}", e))
            }
            Err(panic) => {
                let message = panic_message(panic);
                info!("Classification panicked for '{}': {}", raw, message);
                crash_record(raw, message)
            }
        };
        result.is_competitor = competitor::is_competitor(&result.official_name);
        result
    }

    async fn resolve(&self, raw: &str) -> Result<ClassificationResult> {
        let candidate = self.normalizer.normalize(raw);
        if !candidate.eligible {
            return Ok(ClassificationResult {
                input: raw.to_string(),
                official_name: "N/A".to_string(),
                sector: SECTOR_OUT_OF_SCOPE.to_string(),
                detail: "Email personnel ignoré".to_string(),
                source: ResolutionSource::Filtered,
                score: "0".to_string(),
                address: "-".to_string(),
                region: "-".to_string(),
                headcount: "-".to_string(),
                permalink: "-".to_string(),
                is_competitor: false,
            });
        }

        if candidate.name.is_empty() {
            return Ok(self.not_found(raw, &ResolvedIdentity::default()));
        }

        // Freshness re-read, then both lookup layers: the correction map
        // forces a sector, the hardcoded table pins identity data.
        self.state.reload();
        let forced = self.state.corrections.get(&candidate.name);
        let override_rec = overrides::lookup(&candidate.name);

        // A hardcoded record with a known address is ground truth for
        // identity and location; no network call happens at all.
        if let Some(rec) = override_rec {
            if !rec.address.is_empty() {
                debug!("Override short-circuit for '{}'", candidate.name);
                return Ok(self.from_override(raw, rec, forced.as_deref()));
            }
        }

        // Query the registry with the canonical name when an alias matched;
        // the official spelling searches far better than a typo.
        let query = override_rec
            .map(|r| r.official_name.to_string())
            .unwrap_or_else(|| candidate.name.clone());
        let records = self.registry.search(&query).await;
        let best = registry::pick_best(&records).cloned();

        let mut identity = ResolvedIdentity {
            official_name: candidate.name.clone(),
            ..Default::default()
        };
        if let Some(rec) = &best {
            self.fill_identity(&mut identity, rec);
        }

        // NAF code is the authoritative sector signal when present
        if let Some(rec) = &best {
            if let Some(code) = rec.industry_code.as_deref() {
                if let Some(code_sector) = taxonomy::classify_by_code(code) {
                    let (sector, detail) = match &forced {
                        Some(s) => (s.clone(), format!("Correction + Code NAF: {}", code)),
                        None => (code_sector.to_string(), format!("Code NAF: {}", code)),
                    };
                    let permalink = self.permalink_or_search(&identity, &query);
                    return Ok(ClassificationResult {
                        input: raw.to_string(),
                        official_name: identity.official_name,
                        sector,
                        detail,
                        source: ResolutionSource::Registry,
                        score: "100%".to_string(),
                        address: non_empty_or(&identity.address, "Non renseigné"),
                        region: non_empty_or(&identity.region, "Non renseigné"),
                        headcount: non_empty_or(&identity.headcount, "-"),
                        permalink,
                        is_competitor: false,
                    });
                }
            }

            // No classified code but corrections outrank label scoring
            if forced.is_none() {
                if let Some(label) = rec.activity_label.as_deref() {
                    if let Some((sector, score)) = self.scorer.best_match(label, SNIPPET_WEIGHT) {
                        let permalink = self.permalink_or_search(&identity, &query);
                        return Ok(ClassificationResult {
                            input: raw.to_string(),
                            official_name: identity.official_name,
                            sector: sector.to_string(),
                            detail: format!("Libellé NAF \"{}\" ({})", label, score),
                            source: ResolutionSource::RegistryLabel,
                            score: format!("{}", score),
                            address: non_empty_or(&identity.address, "Non renseigné"),
                            region: non_empty_or(&identity.region, "Non renseigné"),
                            headcount: non_empty_or(&identity.headcount, "-"),
                            permalink,
                            is_competitor: false,
                        });
                    }
                }
            }
        }

        // Registry gave no sector: a forced sector or an address-less
        // override still beats the web fallbacks.
        if forced.is_some() || override_rec.is_some() {
            return Ok(self.from_override_or_forced(
                raw,
                override_rec,
                forced.as_deref(),
                &identity,
                best.is_some(),
            ));
        }

        // Web snippet scoring
        let snippet = self.web.search_top(&candidate.name).await;
        if let Some(snip) = &snippet {
            if let Some((sector, score)) = self.scorer.best_match(&snip.scoring_text(), SNIPPET_WEIGHT) {
                let official_name = if !snip.title.is_empty() && snip.title.chars().count() < 60 {
                    snip.title.clone()
                } else {
                    identity.official_name.clone()
                };
                return Ok(ClassificationResult {
                    input: raw.to_string(),
                    official_name,
                    sector: sector.to_string(),
                    detail: format!("Analyse Web ({})", snip.url),
                    source: ResolutionSource::Web,
                    score: format!("{}", score),
                    address: non_empty_or(&identity.address, "International / Web"),
                    region: non_empty_or(&identity.region, "Monde"),
                    headcount: non_empty_or(&identity.headcount, "-"),
                    permalink: self.permalink_or_search(&identity, &candidate.name),
                    is_competitor: false,
                });
            }
        }

        // Hosted model, constrained to the closed vocabulary
        let allowed = self.state.allowed_sectors();
        if let Some(verdict) = self.model.classify(&candidate.name, &allowed).await {
            return Ok(ClassificationResult {
                input: raw.to_string(),
                official_name: identity.official_name.clone(),
                sector: verdict.sector,
                detail: format!("IA ({}) - {}", verdict.confidence_label, verdict.reasoning),
                source: ResolutionSource::Ai,
                score: "100%".to_string(),
                address: non_empty_or(&identity.address, "-"),
                region: non_empty_or(&identity.region, "-"),
                headcount: non_empty_or(&identity.headcount, "-"),
                permalink: self.permalink_or_search(&identity, &candidate.name),
                is_competitor: false,
            });
        }

        // A web trace without any keyword signal is still worth surfacing
        if let Some(snip) = snippet {
            return Ok(ClassificationResult {
                input: raw.to_string(),
                official_name: identity.official_name.clone(),
                sector: SECTOR_TO_VERIFY.to_string(),
                detail: format!("Analyse Web ({}) - aucun mot-clé", snip.url),
                source: ResolutionSource::WebTrace,
                score: "0".to_string(),
                address: non_empty_or(&identity.address, "-"),
                region: non_empty_or(&identity.region, "-"),
                headcount: non_empty_or(&identity.headcount, "-"),
                permalink: self.permalink_or_search(&identity, &candidate.name),
                is_competitor: false,
            });
        }

        Ok(self.not_found(raw, &identity))
    }

    /// Copy registry identity data, with the postal-code région fallback
    fn fill_identity(&self, identity: &mut ResolvedIdentity, rec: &RegistryRecord) {
        if !rec.legal_name.is_empty() {
            identity.official_name = rec.legal_name.clone();
        }
        if let Some(address) = &rec.address {
            identity.address = address.clone();
        }
        identity.region = match &rec.region {
            Some(region) if !region.is_empty() => region.clone(),
            _ => rec
                .postal_code
                .as_deref()
                .map(region::region_from_postal_code)
                .unwrap_or_default(),
        };
        if let Some(code) = &rec.headcount_code {
            if let Some(bracket) = region::headcount_bracket(code) {
                identity.headcount = bracket.to_string();
            }
        }
        if let Some(siren) = &rec.siren {
            identity.permalink = format!("{}/{}", ANNUAIRE_COMPANY_URL, siren);
        }
    }

    fn permalink_or_search(&self, identity: &ResolvedIdentity, query: &str) -> String {
        if !identity.permalink.is_empty() {
            identity.permalink.clone()
        } else {
            format!("{}?q={}", ANNUAIRE_SEARCH_URL, query.replace(' ', "+"))
        }
    }

    /// Terminal result for a hardcoded override (short-circuit path)
    fn from_override(
        &self,
        raw: &str,
        rec: &OverrideRecord,
        forced: Option<&str>,
    ) -> ClassificationResult {
        let (sector, detail) = match forced {
            Some(s) => (s.to_string(), "Correction utilisateur + base interne".to_string()),
            None => (rec.sector.to_string(), "Base interne (adresse connue)".to_string()),
        };
        let permalink = match rec.siren {
            Some(siren) => format!("{}/{}", ANNUAIRE_COMPANY_URL, siren),
            None => format!(
                "{}?q={}",
                ANNUAIRE_SEARCH_URL,
                rec.official_name.replace(' ', "+")
            ),
        };
        ClassificationResult {
            input: raw.to_string(),
            official_name: rec.official_name.to_string(),
            sector,
            detail,
            source: ResolutionSource::Override,
            score: "100%".to_string(),
            address: non_empty_or(rec.address, "Non renseigné"),
            region: non_empty_or(rec.region, "Non renseigné"),
            headcount: non_empty_or(rec.headcount, "-"),
            permalink,
            is_competitor: false,
        }
    }

    /// Terminal result when the registry produced no sector but a user
    /// correction or an address-less override still decides
    fn from_override_or_forced(
        &self,
        raw: &str,
        rec: Option<&OverrideRecord>,
        forced: Option<&str>,
        identity: &ResolvedIdentity,
        registry_succeeded: bool,
    ) -> ClassificationResult {
        let sector = forced
            .map(|s| s.to_string())
            .or_else(|| rec.map(|r| r.sector.to_string()))
            .unwrap_or_else(|| SECTOR_NOT_FOUND.to_string());

        let official_name = if registry_succeeded && !identity.official_name.is_empty() {
            identity.official_name.clone()
        } else {
            rec.map(|r| r.official_name.to_string())
                .unwrap_or_else(|| identity.official_name.clone())
        };

        let detail = match (forced, registry_succeeded) {
            (Some(_), true) => "Correction utilisateur + API".to_string(),
            (Some(_), false) => "Correction utilisateur".to_string(),
            (None, true) => "Base interne + API".to_string(),
            (None, false) => "Base interne (API sans résultat)".to_string(),
        };

        let address = non_empty_or(&identity.address, rec.map(|r| r.address).unwrap_or("-"));
        let region = non_empty_or(&identity.region, rec.map(|r| r.region).unwrap_or("-"));
        let headcount = non_empty_or(&identity.headcount, rec.map(|r| r.headcount).unwrap_or("-"));

        ClassificationResult {
            input: raw.to_string(),
            official_name: official_name.clone(),
            sector,
            detail,
            source: ResolutionSource::Override,
            score: "100%".to_string(),
            address: non_empty_or(&address, "-"),
            region: non_empty_or(&region, "-"),
            headcount,
            permalink: self.permalink_or_search(identity, &official_name),
            is_competitor: false,
        }
    }

    fn not_found(&self, raw: &str, identity: &ResolvedIdentity) -> ClassificationResult {
        ClassificationResult {
            input: raw.to_string(),
            official_name: non_empty_or(&identity.official_name, raw.trim()),
            sector: SECTOR_NOT_FOUND.to_string(),
            detail: "Aucun résultat probant".to_string(),
            source: ResolutionSource::NotFound,
            score: "0".to_string(),
            address: "-".to_string(),
            region: "-".to_string(),
            headcount: "-".to_string(),
            permalink: "-".to_string(),
            is_competitor: false,
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn crash_record(raw: &str, detail: String) -> ClassificationResult {
    ClassificationResult {
        input: raw.to_string(),
        official_name: SECTOR_ERROR.to_string(),
        sector: SECTOR_ERROR.to_string(),
        detail,
        source: ResolutionSource::Crash,
        score: "0".to_string(),
        address: "-".to_string(),
        region: "-".to_string(),
        headcount: "-".to_string(),
        permalink: "-".to_string(),
        is_competitor: false,
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected panic".to_string()
    }
}
