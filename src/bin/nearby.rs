//! Nearby-genus command line interface
//!
//! Finds all observations of the same genus within 1km of a given
//! iNaturalist observation.
//!
//! # Usage
//!
//! ```bash
//! nearby 12345678
//! nearby https://www.inaturalist.org/observations/12345678
//! nearby --debug "https://www.inaturalist.org/observations?observation_id=12345678"
//! ```

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use std::sync::Arc;

use inat_nearby::config::NearbyConfig;
use inat_nearby::finder::{NearbyFinder, NearbyReport};
use inat_nearby::inaturalist::INatClient;
use inat_nearby::locator::RADIUS_KM;
use inat_nearby::reference;

#[derive(Parser)]
#[command(name = "nearby")]
#[command(version)]
#[command(
    about = "Find all observations of the same genus within 1km of a given iNaturalist observation"
)]
struct Cli {
    /// iNaturalist observation ID or URL
    observation: String,

    /// Enable debug output to troubleshoot taxonomy issues
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(&cli).await {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        tracing_subscriber::EnvFilter::new("inat_nearby=debug,nearby=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<NearbyReport> {
    let config = NearbyConfig::from_env()?;
    tracing::debug!(api_base = %config.api_base, "Using iNaturalist API");

    let observation_id = reference::parse(&cli.observation)?;
    println!("Processing observation ID: {}", observation_id);

    let client = Arc::new(INatClient::new(&config)?);
    let finder = NearbyFinder::with_client(client);

    println!("Fetching observation data...");
    Ok(finder.find_by_id(observation_id).await?)
}

fn print_report(report: &NearbyReport) {
    println!();
    println!("Observation Details:");
    println!(
        "  Species: {}",
        report.species_name.as_deref().unwrap_or("N/A")
    );
    println!("  Genus: {}", report.genus.name);
    println!(
        "  Location: {:.6}, {:.6}",
        report.latitude, report.longitude
    );
    println!();
    println!(
        "Generated URL to find all {} observations within {}km:",
        report.genus.name.bold(),
        RADIUS_KM
    );
    println!("{}", report.url);
}
