use std::fs::write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{Cli, Config},
    geocode::GoogleGeocoder,
    google::Endpoint,
    places::GooglePlaces,
    records::Dataset,
};

mod config;
mod distance;
mod error;
mod geocode;
mod google;
mod pipeline;
mod places;
mod records;
mod utils;

fn main() -> Result<()> {
    // a missing .env is fine, the key can come from the real environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = Config::try_from(cli)?;
    run(&config)
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_env("ADDRESS_VALIDATOR_LOG")
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))?;

    Ok(())
}

fn run(config: &Config) -> Result<()> {
    let mut dataset = Dataset::load(&config.input, &config.columns, config.window)?;
    info!(
        threshold = config.comparator.threshold(),
        "Validating {} records from {}...",
        dataset.records.len(),
        config.input.display()
    );

    let agent = google::agent(config.timeout);
    let resolver = GooglePlaces::new(Endpoint::new(
        agent.clone(),
        &config.places_url,
        &config.api_key,
    ));
    let geocoder = GoogleGeocoder::new(Endpoint::new(agent, &config.geocode_url, &config.api_key));

    let report = pipeline::validate(
        &mut dataset.records,
        &resolver,
        &geocoder,
        &config.comparator,
    );

    dataset.save(&config.output, &config.columns)?;
    let summary_path = config.summary_path();
    write(&summary_path, report.summary()?)
        .with_context(|| format!("Failed to write summary: {}", summary_path.display()))?;

    info!(
        same = report.same(),
        flagged = report.flagged(),
        not_found = report.not_found(),
        failed = report.failed(),
        "Wrote {} and {}",
        config.output.display(),
        summary_path.display()
    );

    Ok(())
}
