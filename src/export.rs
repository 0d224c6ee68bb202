use crate::batch::BatchSummary;
use crate::cascade::ClassificationResult;
use anyhow::Result;
use csv::Writer;
use std::fs::File;
use std::io::Write as _;
use tracing::{debug, info};

/// Export results to CSV, one row per input, in input order
pub fn export_csv(results: &[ClassificationResult], output_path: &str) -> Result<()> {
    debug!("Exporting {} results to CSV: {}", results.len(), output_path);

    let file = File::create(output_path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record([
        "Input",
        "Nom Officiel",
        "Secteur",
        "Détail",
        "Source",
        "Score",
        "Adresse",
        "Région",
        "Effectif",
        "Lien",
        "Concurrent",
    ])?;

    for result in results {
        wtr.write_record([
            result.input.as_str(),
            result.official_name.as_str(),
            result.sector.as_str(),
            result.detail.as_str(),
            &result.source.to_string(),
            result.score.as_str(),
            result.address.as_str(),
            result.region.as_str(),
            result.headcount.as_str(),
            result.permalink.as_str(),
            if result.is_competitor { "Oui" } else { "Non" },
        ])?;
    }

    wtr.flush()?;
    info!("Successfully exported {} results to CSV: {}", results.len(), output_path);

    Ok(())
}

#[derive(serde::Serialize)]
struct JsonExport<'a> {
    summary: &'a BatchSummary,
    results: &'a [ClassificationResult],
}

/// Export results plus the run summary to pretty-printed JSON
pub fn export_json(
    results: &[ClassificationResult],
    summary: &BatchSummary,
    output_path: &str,
) -> Result<()> {
    debug!("Exporting {} results to JSON: {}", results.len(), output_path);

    let json_output = JsonExport { summary, results };
    let json_string = serde_json::to_string_pretty(&json_output)?;

    let mut file = File::create(output_path)?;
    file.write_all(json_string.as_bytes())?;

    info!("Successfully exported {} results to JSON: {}", results.len(), output_path);

    Ok(())
}

/// Print the run summary to stdout
pub fn print_summary(summary: &BatchSummary) {
    println!("\n=== CLASSIFICATION SUMMARY ===");
    println!("Inputs processed: {}", summary.total_inputs);
    println!("Resolved: {}", summary.resolved);
    println!("Filtered (personal emails): {}", summary.filtered);
    println!("Unresolved: {}", summary.unresolved);
    println!("Crashed: {}", summary.crashed);
    println!("Competitors flagged: {}", summary.competitors);
    println!("Duration: {:.2}s", summary.total_duration_secs);
    println!("==============================\n");
}
