//! Keyword scoring of free text against the sector taxonomy
//!
//! Counts whole-word keyword occurrences per sector. Word boundaries matter:
//! "EY" must not score inside "KEYRUS". Used on web-search snippets and on
//! registry activity labels, both with weight 5.0.

use crate::taxonomy::SECTORS;
use regex::Regex;
use std::collections::HashMap;

/// Weight applied when scoring a web snippet or a registry activity label
pub const SNIPPET_WEIGHT: f64 = 5.0;

/// Pre-compiled keyword matchers, one regex per keyword per sector
pub struct TextScorer {
    patterns: Vec<(&'static str, Vec<Regex>)>,
}

impl Default for TextScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextScorer {
    /// Compile word-boundary matchers for every keyword in the taxonomy
    pub fn new() -> Self {
        let patterns = SECTORS
            .iter()
            .map(|sector| {
                let regexes = sector
                    .keywords
                    .iter()
                    .map(|kw| {
                        Regex::new(&format!(r"\b{}\b", regex::escape(kw)))
                            .expect("keyword pattern must compile")
                    })
                    .collect();
                (sector.name, regexes)
            })
            .collect();
        Self { patterns }
    }

    /// Score lowercased `text` against every sector's keyword list.
    /// Each whole-word occurrence counts `weight` points.
    pub fn score(&self, text: &str, weight: f64) -> HashMap<&'static str, f64> {
        let text = text.to_lowercase();
        let mut scores = HashMap::new();
        for (sector, regexes) in &self.patterns {
            let mut score = 0.0;
            for re in regexes {
                score += re.find_iter(&text).count() as f64 * weight;
            }
            scores.insert(*sector, score);
        }
        scores
    }

    /// Highest-scoring sector with a strictly positive score.
    ///
    /// Ties keep the first sector in taxonomy declaration order; an
    /// all-zero score map yields `None` (the caller distinguishes this
    /// "no keyword signal" outcome from a lookup failure).
    pub fn best(&self, scores: &HashMap<&'static str, f64>) -> Option<(&'static str, f64)> {
        let mut best: Option<(&'static str, f64)> = None;
        for (sector, _) in &self.patterns {
            let score = scores.get(sector).copied().unwrap_or(0.0);
            if score > 0.0 && best.map_or(true, |(_, b)| score > b) {
                best = Some((sector, score));
            }
        }
        best
    }

    /// Convenience: score then pick the best sector in one call
    pub fn best_match(&self, text: &str, weight: f64) -> Option<(&'static str, f64)> {
        let scores = self.score(text, weight);
        self.best(&scores)
    }
}
