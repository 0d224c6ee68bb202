//! Hosted-model sector classification (last-resort cascade stage)
//!
//! Sends the company name and the allowed sector vocabulary to a
//! generateContent-compatible endpoint and parses the JSON verdict. The
//! returned sector is only accepted when it belongs to the allowed list;
//! anything else - "Unknown", hallucinated labels, parse failures, missing
//! API key - degrades to `None`.

use crate::config::AppConfig;
use crate::rate_limit::SharedRateLimiter;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// A model verdict that passed vocabulary validation
#[derive(Debug, Clone, PartialEq)]
pub struct AiVerdict {
    /// One of the allowed sectors
    pub sector: String,
    /// Model's self-reported confidence label (Haut/Moyen/Bas)
    pub confidence_label: String,
    /// Short justification, surfaced in the result detail
    pub reasoning: String,
}

/// AI classifier collaborator
#[async_trait]
pub trait SectorModel: Send + Sync {
    /// Classify a company name into one of the allowed sectors.
    /// `None` means no usable verdict (unavailable, uncertain or off-list).
    async fn classify(&self, name: &str, allowed: &[String]) -> Option<AiVerdict>;
}

/// Raw model answer before vocabulary validation
#[derive(Debug, Deserialize)]
struct RawVerdict {
    sector: Option<String>,
    confidence: Option<String>,
    reasoning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GenerateCandidate>,
}

#[derive(Debug, Deserialize)]
struct GenerateCandidate {
    content: Option<GenerateContent>,
}

#[derive(Debug, Deserialize)]
struct GenerateContent {
    #[serde(default)]
    parts: Vec<GeneratePart>,
}

#[derive(Debug, Deserialize)]
struct GeneratePart {
    text: Option<String>,
}

/// Client for a Gemini generateContent-compatible endpoint
pub struct GeminiClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    limiter: SharedRateLimiter,
}

impl GeminiClient {
    /// Build the client from configuration; the API key is read from the
    /// configured environment variable and its absence is not an error.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var(&config.endpoints.ai_key_env).ok();
        if api_key.is_none() {
            warn!(
                "{} is not set - the AI classification stage will be skipped",
                config.endpoints.ai_key_env
            );
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.request_timeout_secs))
            .user_agent(config.http.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            url: config.endpoints.ai_url.clone(),
            api_key,
            limiter: SharedRateLimiter::per_minute(config.rate_limit.ai_requests_per_minute),
        })
    }

    /// Build a client against an explicit URL and key (tests)
    pub fn with_url_and_key(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(8))
                .build()
                .expect("default reqwest client must build"),
            url: url.into(),
            api_key: Some(api_key.into()),
            limiter: SharedRateLimiter::per_minute(0),
        }
    }

    fn build_prompt(name: &str, allowed: &[String]) -> String {
        let sectors = allowed
            .iter()
            .map(|s| format!("\"{}\"", s))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Tu es un expert en classification d'entreprises.\n\
             Identifie le secteur d'activité de l'entreprise suivante : \"{name}\".\n\n\
             Tu DOIS choisir le secteur le plus pertinent PARMI cette liste stricte :\n\
             [{sectors}]\n\n\
             Si tu ne trouves aucune correspondance ou que l'entreprise n'existe pas, réponds \"Unknown\".\n\n\
             Réponds UNIQUEMENT au format JSON :\n\
             {{\n    \"sector\": \"Nom du secteur choisi\",\n    \"confidence\": \"Haut/Moyen/Bas\",\n    \"reasoning\": \"Courte justification\"\n}}"
        )
    }

    /// Validate a raw model answer against the allowed vocabulary
    fn validate(raw: RawVerdict, allowed: &[String]) -> Option<AiVerdict> {
        let sector = raw.sector?;
        if sector.is_empty() || sector == "Unknown" || !allowed.iter().any(|s| *s == sector) {
            debug!("Model verdict '{}' rejected (off-list or unknown)", sector);
            return None;
        }
        Some(AiVerdict {
            sector,
            confidence_label: raw.confidence.unwrap_or_else(|| "Moyen".to_string()),
            reasoning: raw.reasoning.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl SectorModel for GeminiClient {
    async fn classify(&self, name: &str, allowed: &[String]) -> Option<AiVerdict> {
        let api_key = match &self.api_key {
            Some(key) => key.clone(),
            None => {
                debug!("AI stage skipped for '{}': no API key", name);
                return None;
            }
        };

        self.limiter.acquire().await;

        let body = json!({
            "contents": [{
                "parts": [{ "text": Self::build_prompt(name, allowed) }]
            }],
            "generationConfig": { "response_mime_type": "application/json" }
        });

        let response = match self
            .client
            .post(&self.url)
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!("AI call failed for '{}': {}", name, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "AI endpoint returned status {} for '{}'",
                response.status(),
                name
            );
            return None;
        }

        let parsed: GenerateResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!("AI response parse failed for '{}': {}", name, e);
                return None;
            }
        };

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)?;

        let raw: RawVerdict = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                debug!("Model answer was not valid JSON for '{}': {}", name, e);
                return None;
            }
        };

        Self::validate(raw, allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec![
            "Tech / Software".to_string(),
            "Retail".to_string(),
            "Custom Widgets".to_string(),
        ]
    }

    #[test]
    fn test_validate_accepts_listed_sector() {
        let raw = RawVerdict {
            sector: Some("Tech / Software".to_string()),
            confidence: Some("Haut".to_string()),
            reasoning: Some("éditeur de logiciels".to_string()),
        };
        let verdict = GeminiClient::validate(raw, &allowed()).unwrap();
        assert_eq!(verdict.sector, "Tech / Software");
        assert_eq!(verdict.confidence_label, "Haut");
    }

    #[test]
    fn test_validate_accepts_custom_sector() {
        let raw = RawVerdict {
            sector: Some("Custom Widgets".to_string()),
            confidence: None,
            reasoning: None,
        };
        let verdict = GeminiClient::validate(raw, &allowed()).unwrap();
        assert_eq!(verdict.sector, "Custom Widgets");
        assert_eq!(verdict.confidence_label, "Moyen");
    }

    #[test]
    fn test_validate_rejects_unknown() {
        let raw = RawVerdict {
            sector: Some("Unknown".to_string()),
            confidence: Some("Haut".to_string()),
            reasoning: None,
        };
        assert!(GeminiClient::validate(raw, &allowed()).is_none());
    }

    #[test]
    fn test_validate_rejects_off_list_sector() {
        let raw = RawVerdict {
            sector: Some("Basket Weaving".to_string()),
            confidence: Some("Haut".to_string()),
            reasoning: None,
        };
        assert!(GeminiClient::validate(raw, &allowed()).is_none());
    }

    #[test]
    fn test_validate_rejects_empty_or_missing() {
        let raw = RawVerdict {
            sector: Some(String::new()),
            confidence: None,
            reasoning: None,
        };
        assert!(GeminiClient::validate(raw, &allowed()).is_none());

        let raw = RawVerdict {
            sector: None,
            confidence: None,
            reasoning: None,
        };
        assert!(GeminiClient::validate(raw, &allowed()).is_none());
    }

    #[test]
    fn test_prompt_lists_all_sectors() {
        let prompt = GeminiClient::build_prompt("Doctolib", &allowed());
        assert!(prompt.contains("\"Doctolib\""));
        assert!(prompt.contains("\"Tech / Software\""));
        assert!(prompt.contains("\"Custom Widgets\""));
        assert!(prompt.contains("Unknown"));
    }
}
