//! Contact-Harvest main entry point
//!
//! This is the command-line interface for the Contact-Harvest address harvester.

use clap::Parser;
use contact_harvest::config::{load_config_with_hash, Config};
use contact_harvest::harvest::run_harvest;
use contact_harvest::input::{expand_candidates, load_origins, load_routes};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Origins listed by --dry-run before the rest are summarized
const DRY_RUN_PREVIEW: usize = 20;

/// Contact-Harvest: a batched contact-address harvester
///
/// Contact-Harvest probes every origin in a CSV list together with a catalog
/// of common subpaths, collects the email addresses those pages publish, and
/// rewrites a per-origin checkpoint after every batch.
#[derive(Parser, Debug)]
#[command(name = "contact-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A batched contact-address harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the current checkpoint and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_harvest(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("contact_harvest=info,warn"),
            1 => EnvFilter::new("contact_harvest=debug,info"),
            2 => EnvFilter::new("contact_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and input, shows the plan
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Contact-Harvest Dry Run ===\n");

    println!("Harvest Configuration:");
    println!("  Batch size: {}", config.harvest.batch_size);
    println!("  Max workers: {}", config.harvest.max_workers);

    println!("\nHTTP:");
    println!("  Request timeout: {}s", config.http.request_timeout_secs);
    println!("  User agent: {}", config.http.user_agent);
    println!("  Follow redirects: {}", config.http.follow_redirects);

    println!("\nInput:");
    println!("  Origins: {}", config.input.origins_path);
    println!("  Routes: {}", config.input.routes_path);

    println!("\nOutput:");
    println!("  Checkpoint: {}", config.output.checkpoint_path);
    println!("  Format: {:?}", config.output.format);

    let origins = load_origins(Path::new(&config.input.origins_path))?;
    let routes = load_routes(Path::new(&config.input.routes_path))?;
    println!("\nOrigins ({}):", origins.len());
    for origin in origins.iter().take(DRY_RUN_PREVIEW) {
        println!("  - {}", origin);
    }
    if origins.len() > DRY_RUN_PREVIEW {
        println!("  ... and {} more", origins.len() - DRY_RUN_PREVIEW);
    }
    println!("\nRoutes ({}):", routes.len());
    for route in &routes {
        println!("  - {}", route);
    }

    let candidates = expand_candidates(&origins, &routes);
    let batches = candidates.len().div_ceil(config.harvest.batch_size);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would fetch {} candidate URLs in {} batches",
        candidates.len(),
        batches
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the checkpoint
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use contact_harvest::output::{load_statistics, print_statistics};

    println!("Checkpoint: {}\n", config.output.checkpoint_path);

    let stats = load_statistics(&config.output)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Batch size: {}, max workers: {}, timeout: {}s",
        config.harvest.batch_size,
        config.harvest.max_workers,
        config.http.request_timeout_secs
    );

    match run_harvest(config).await {
        Ok(_) => {
            tracing::info!("Harvest completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
