use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sectorfinder")]
#[command(about = "Resolves company names and emails to business sectors via overrides, the company registry, web scoring and an AI fallback")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Create default configuration file at ./config/sectorfinder.toml
    #[arg(long, global = true)]
    pub init: bool,

    /// Single input to classify (shorthand for the 'classify' subcommand)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Verbose logging (use -v for detailed, -vv for debug output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a single company name or email
    Classify {
        /// Raw input: a name, an email address or a pasted directory row
        input: String,
    },

    /// Classify every input in a CSV or text file
    Batch {
        /// Input file (.csv takes the first column, anything else one input per line)
        file: PathBuf,

        /// Output format: 'csv' (default) or 'json'
        #[arg(short = 'f', long, default_value = "csv")]
        format: String,

        /// Output file path (printed to stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Manage user corrections (name -> sector)
    Corrections {
        #[command(subcommand)]
        action: CorrectionCommands,
    },

    /// List the sector vocabulary (built-in + custom)
    Sectors,
}

#[derive(Subcommand, Debug)]
pub enum CorrectionCommands {
    /// Show all stored corrections
    List,
    /// Add or replace a correction
    Add {
        /// Company name (any spelling that normalizes to the same key)
        name: String,
        /// Sector to force for this name
        sector: String,
    },
}
