//! `mnemonic` command-line front end.
//!
//! # Responsibility
//! - Expose the add / search / random-review views over the core store.
//! - Turn duplicate and blank-input errors into warnings, not crashes.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use mnemonic_core::{EntryServiceError, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code used for user-facing warnings (duplicate word, blank input).
const EXIT_WARNING: u8 = 2;

#[derive(Parser)]
#[command(name = "mnemonic", version)]
#[command(about = "Store, search and review mnemonic stories for vocabulary words")]
struct Cli {
    /// Path to the database file (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Path to the TOML config file; ignored when it does not exist
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or migrate the database file
    Init,

    /// Save a mnemonic story for a word
    Add {
        word: String,
        story: String,

        /// Optional note, e.g. the dictionary meaning
        #[arg(short, long)]
        note: Option<String>,

        /// Image file to attach (stored as raw bytes)
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Look up the story for a word (exact, case-sensitive)
    Search { word: String },

    /// Show a random entry for review
    Random {
        /// Skip entries whose story contains this text
        #[arg(short, long)]
        exclude: Option<String>,

        /// Samples drawn before falling back to a filtered query
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Write the entry's image bytes to this file
        #[arg(long)]
        save_image: Option<PathBuf>,
    },

    /// Show version, database location and entry count
    Info,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Add { .. } => "add",
            Self::Search { .. } => "search",
            Self::Random { .. } => "random",
            Self::Info => "info",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<EntryServiceError>() {
            Some(warning) if warning.is_user_facing() => {
                eprintln!("warning: {warning}");
                ExitCode::from(EXIT_WARNING)
            }
            _ => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}
