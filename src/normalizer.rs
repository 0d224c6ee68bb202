//! Input normalization
//!
//! Extracts a usable company-name candidate from whatever the caller pastes
//! in: a bare name, a corporate email address, a tab-delimited spreadsheet
//! row, or prose copied from a company-directory page. Personal mailbox
//! domains are filtered out entirely rather than classified.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// Global mailbox providers that never identify a company
const PERSONAL_EMAIL_PROVIDERS: &[&str] = &["gmail", "outlook", "hotmail", "yahoo", "icloud"];

/// "ACME a été créée le 12/03/2001 ..." -> "ACME"
static PROSE_CREATED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.+?)\s+a été créée le\b").unwrap());

/// "ACME est une société de conseil ..." -> "ACME"
static PROSE_IS_A: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.+?)\s+est une (?:société|entreprise|association)\b").unwrap());

/// Detaches a legal-entity suffix glued to the preceding word so the
/// keyword scorer sees it as its own token ("serfigroup" -> "serfi group")
static ATTACHED_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(group|france|partners|holdings|corp|inc|ltd)$").unwrap());

/// Outcome of input normalization
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Extracted company-name candidate (the raw input when ineligible)
    pub name: String,
    /// False when the input is a personal email and must not be resolved
    pub eligible: bool,
}

/// Input normalizer with the configured personal-domain filter
#[derive(Debug, Clone)]
pub struct InputNormalizer {
    personal_domains: HashSet<String>,
}

impl Default for InputNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl InputNormalizer {
    /// Create a normalizer with the built-in personal-domain filter
    pub fn new() -> Self {
        Self {
            personal_domains: PERSONAL_EMAIL_PROVIDERS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }

    /// Extend the filter with configured local ISP domains (wanadoo, laposte, ...)
    pub fn with_extra_domains(extra: &[String]) -> Self {
        let mut normalizer = Self::new();
        for domain in extra {
            normalizer.personal_domains.insert(domain.to_lowercase());
        }
        normalizer
    }

    /// Extract a company-name candidate from raw free text.
    ///
    /// Returns `eligible = false` for personal emails; those inputs are
    /// excluded from resolution, not classified as unknown.
    pub fn normalize(&self, raw: &str) -> Candidate {
        let mut text = raw.lines().next().unwrap_or("").trim().to_string();

        // Spreadsheet row: "email<TAB>name<TAB>..." keeps the name column,
        // otherwise the first column wins.
        if text.contains('\t') {
            let fields: Vec<&str> = text.split('\t').collect();
            let first = fields.first().copied().unwrap_or("").trim();
            text = if first.contains('@') {
                fields.get(1).copied().unwrap_or(first).trim().to_string()
            } else {
                first.to_string()
            };
        }

        let mut company = text.clone();

        if company.contains('@') && !company.starts_with("http") {
            if let Some(domain) = company.split('@').nth(1) {
                if let Some(label) = domain.split('.').next() {
                    if !label.is_empty() {
                        if self.personal_domains.contains(&label.to_lowercase()) {
                            debug!("Filtered personal email input: {}", raw.trim());
                            return Candidate {
                                name: raw.to_string(),
                                eligible: false,
                            };
                        }
                        company = label.to_string();
                    }
                }
            }
        }

        if let Some(caps) = PROSE_CREATED.captures(&company) {
            company = caps[1].to_string();
        } else if let Some(caps) = PROSE_IS_A.captures(&company) {
            company = caps[1].to_string();
        }

        company = company.replace(['-', '.'], " ");
        company = ATTACHED_SUFFIX.replace(&company, " $1").to_string();
        // Collapse any doubled spaces the suffix split may have introduced
        company = company.split_whitespace().collect::<Vec<_>>().join(" ");

        Candidate {
            name: company,
            eligible: true,
        }
    }
}
