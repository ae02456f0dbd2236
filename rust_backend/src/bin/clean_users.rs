//! Command-line front end for the user record cleaning pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Clean a JSON export and print the result
//! cargo run --bin clean-users -- --input users_dirty.json
//!
//! # Write JSON Lines, profile the input, fail on validation errors
//! cargo run --bin clean-users -- --input users_dirty.jsonl \
//!   --output users_clean.jsonl --profile --strict
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter, e.g. `debug` or `users_clean=debug` (default: info)

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use users_clean::checksum::fingerprint_records;
use users_clean::config::CleaningSettings;
use users_clean::io::{write_records, write_records_to, RecordFormat, RecordLoader};
use users_clean::preprocessing::{CleaningPipeline, RecordProfile};

#[derive(Parser)]
#[command(name = "clean-users")]
#[command(about = "Deduplicate and enrich raw user records")]
#[command(version)]
struct Cli {
    /// Raw records (.json, .jsonl or .ndjson)
    #[arg(long, short)]
    input: PathBuf,

    /// Output file; cleaned records go to stdout when omitted
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Output format (json or jsonl); defaults to the config file setting
    #[arg(long)]
    format: Option<RecordFormat>,

    /// TOML configuration file; cleaning.toml is searched for when omitted
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Log null and distinct counts for the input and output
    #[arg(long)]
    profile: bool,

    /// Exit with an error when the cleaned records fail validation
    #[arg(long)]
    strict: bool,
}

fn load_settings(path: Option<&PathBuf>) -> Result<CleaningSettings> {
    match path {
        Some(path) => CleaningSettings::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => match CleaningSettings::from_default_location()
            .context("Failed to load cleaning.toml")?
        {
            Some(settings) => Ok(settings),
            None => {
                info!("No cleaning.toml found; using defaults");
                Ok(CleaningSettings::default())
            }
        },
    }
}

fn run(cli: Cli) -> Result<bool> {
    let settings = load_settings(cli.config.as_ref())?;
    let format = match cli.format {
        Some(format) => format,
        None => settings.output_format()?,
    };

    let loaded = RecordLoader::load_from_file(&cli.input)?;
    info!(
        "Loaded {} raw records from {} ({})",
        loaded.num_records,
        cli.input.display(),
        loaded.format
    );
    if cli.profile {
        info!("Input profile: {:?}", RecordProfile::from_raw(&loaded.records));
    }

    let pipeline = CleaningPipeline::with_config(settings.to_pipeline_config())?;
    let outcome = pipeline.clean(&loaded.records)?;
    info!("Cleaning stats: {:?}", outcome.stats);
    if cli.profile {
        info!("Output profile: {:?}", RecordProfile::from_clean(&outcome.records));
    }

    for warning in &outcome.validation.warnings {
        warn!("{}", warning);
    }
    for error in &outcome.validation.errors {
        warn!("Validation error: {}", error);
    }

    match &cli.output {
        Some(path) => {
            write_records(path, &outcome.records, format)?;
            info!("Wrote {} records to {}", outcome.records.len(), path.display());
        }
        None => write_records_to(std::io::stdout().lock(), &outcome.records, format)?,
    }

    let fingerprint = fingerprint_records(&outcome.records).context("Failed to fingerprint output")?;
    info!("Output fingerprint: {}", fingerprint);

    Ok(outcome.validation.is_valid || !cli.strict)
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout carries only the records
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    if run(cli)? {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!("Validation failed in strict mode");
        Ok(ExitCode::FAILURE)
    }
}
