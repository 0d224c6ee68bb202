//! Batch classification of inputs from CSV or plain-text files
//!
//! Supports:
//! - CSV files, first column taken as the input (no header expected)
//! - Plain text files with one input per line
//! - Error resilience: a crash on one input becomes its result row,
//!   never an omission, and results stay in input order

use crate::cascade::{Cascade, ClassificationResult, ResolutionSource};
use crate::logger::BatchLogger;
use crate::rate_limit::SharedRateLimiter;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Input format for batch files
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    Csv,
    Text,
}

impl InputFormat {
    /// Detect format from file extension; anything but .csv is plain text
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("csv") => Self::Csv,
            _ => Self::Text,
        }
    }
}

/// Parse inputs from a file (auto-detects format from extension)
pub fn parse_input_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    match InputFormat::from_path(path) {
        InputFormat::Csv => parse_csv_inputs(&content),
        InputFormat::Text => Ok(parse_text_inputs(&content)),
    }
}

/// Parse the first column of CSV content, skipping blanks and comments
pub fn parse_csv_inputs(content: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut inputs = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to parse CSV record")?;
        let value = record.get(0).map(|s| s.trim()).unwrap_or("");
        if value.is_empty() || value.starts_with('#') {
            continue;
        }
        inputs.push(value.to_string());
    }
    Ok(inputs)
}

/// Parse plain text content, one input per line
pub fn parse_text_inputs(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.to_string())
        .collect()
}

/// Summary of a batch classification run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total_inputs: usize,
    /// Inputs resolved to a real sector (override, registry, web or AI)
    pub resolved: usize,
    /// Personal emails filtered before resolution
    pub filtered: usize,
    /// Inputs where every stage ran without a match
    pub unresolved: usize,
    /// Inputs that hit an internal fault
    pub crashed: usize,
    pub competitors: usize,
    pub started_at: String,
    pub completed_at: String,
    pub total_duration_secs: f64,
}

impl BatchSummary {
    /// Tally results into a summary
    pub fn from_results(results: &[ClassificationResult], started_at: String, duration_secs: f64) -> Self {
        let mut summary = Self {
            total_inputs: results.len(),
            resolved: 0,
            filtered: 0,
            unresolved: 0,
            crashed: 0,
            competitors: 0,
            started_at,
            completed_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            total_duration_secs: duration_secs,
        };

        for result in results {
            match result.source {
                ResolutionSource::Filtered => summary.filtered += 1,
                ResolutionSource::Crash => summary.crashed += 1,
                ResolutionSource::NotFound | ResolutionSource::WebTrace => {
                    summary.unresolved += 1
                }
                _ => summary.resolved += 1,
            }
            if result.is_competitor {
                summary.competitors += 1;
            }
        }

        summary
    }
}

/// Classify a list of inputs sequentially, in order, pacing each item
/// through the shared rate limiter. One result per input, always.
pub async fn run_batch(
    cascade: &Cascade,
    inputs: &[String],
    limiter: &SharedRateLimiter,
    logger: &BatchLogger,
) -> Vec<ClassificationResult> {
    let mut results = Vec::with_capacity(inputs.len());

    logger.start_progress(inputs.len() as u64);
    for input in inputs {
        limiter.acquire().await;
        logger.update_progress(input);

        let result = cascade.classify(input).await;
        logger.debug(&format!(
            "{} -> {} ({})",
            input, result.sector, result.source
        ));
        results.push(result);
        logger.advance_progress(1);
    }
    logger.finish_progress(&format!("Classified {} inputs", results.len()));

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_inputs() {
        let content = "APPLE\ncontact@acme.fr\n\n# comment\n  TESLA  ";
        let inputs = parse_text_inputs(content);
        assert_eq!(inputs, vec!["APPLE", "contact@acme.fr", "TESLA"]);
    }

    #[test]
    fn test_parse_csv_first_column() {
        let content = "APPLE,extra,columns\nTESLA\n,empty-first-col\nDANONE,x";
        let inputs = parse_csv_inputs(content).unwrap();
        assert_eq!(inputs, vec!["APPLE", "TESLA", "DANONE"]);
    }

    #[test]
    fn test_parse_csv_empty() {
        assert!(parse_csv_inputs("").unwrap().is_empty());
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(InputFormat::from_path(Path::new("inputs.csv")), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("inputs.CSV")), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("inputs.txt")), InputFormat::Text);
        assert_eq!(InputFormat::from_path(Path::new("inputs")), InputFormat::Text);
    }

    #[test]
    fn test_summary_tallies_sources() {
        use crate::cascade::ResolutionSource;

        fn result(source: ResolutionSource, competitor: bool) -> ClassificationResult {
            ClassificationResult {
                input: "x".to_string(),
                official_name: "x".to_string(),
                sector: "Retail".to_string(),
                detail: String::new(),
                source,
                score: "0".to_string(),
                address: "-".to_string(),
                region: "-".to_string(),
                headcount: "-".to_string(),
                permalink: "-".to_string(),
                is_competitor: competitor,
            }
        }

        let results = vec![
            result(ResolutionSource::Override, false),
            result(ResolutionSource::Registry, true),
            result(ResolutionSource::Filtered, false),
            result(ResolutionSource::NotFound, false),
            result(ResolutionSource::Crash, false),
        ];

        let summary = BatchSummary::from_results(&results, "now".to_string(), 1.5);
        assert_eq!(summary.total_inputs, 5);
        assert_eq!(summary.resolved, 2);
        assert_eq!(summary.filtered, 1);
        assert_eq!(summary.unresolved, 1);
        assert_eq!(summary.crashed, 1);
        assert_eq!(summary.competitors, 1);
        assert!((summary.total_duration_secs - 1.5).abs() < f64::EPSILON);
    }
}
