//! Competitor detection
//!
//! Flags resolved companies whose display name matches one of the tracked
//! competitor names. Matching is whole-word and case-insensitive: the
//! two-letter "EY" must match "EY Consulting" but never "KEYRUS".

use once_cell::sync::Lazy;
use regex::Regex;

/// Tracked competitor names
const COMPETITORS: &[&str] = &[
    "EY",
    "KPMG",
    "Deloitte",
    "PwC",
    "Accenture",
    "Capgemini",
    "Wavestone",
    "Sopra Steria",
    "Alten",
    "CGI",
];

static COMPETITOR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    COMPETITORS
        .iter()
        .map(|name| {
            Regex::new(&format!(r"(?i)\b{}\b", regex::escape(name)))
                .expect("competitor pattern must compile")
        })
        .collect()
});

/// Whether a display name contains a tracked competitor as a whole word
pub fn is_competitor(display_name: &str) -> bool {
    COMPETITOR_PATTERNS.iter().any(|re| re.is_match(display_name))
}
