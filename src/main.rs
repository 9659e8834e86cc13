//! bbs-archive main entry point
//!
//! This is the command-line interface for the bbs-archive forum archiver.

use anyhow::{bail, Context};
use bbs_archive::config::{compute_config_hash, read_config, validate, Config};
use bbs_archive::crawler::IdBatches;
use bbs_archive::output::print_summary;
use bbs_archive::{Coordinator, RecordKind, Serializer};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// bbs-archive: archive a forum by walking its numeric ID spaces
///
/// Articles, member profiles and boards are fetched by ID in bounded
/// concurrent batches until the forum reports that an ID was never
/// allocated, and each page is written as one JSON, YAML or Markdown file.
#[derive(Parser, Debug)]
#[command(name = "bbs-archive")]
#[command(version)]
#[command(about = "Archive a forum by walking its ID ranges", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Forum root URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Directory receiving one subdirectory per kind
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Output format: json, yaml or markdown
    #[arg(short, long)]
    serializer: Option<Serializer>,

    /// Record kinds to archive, comma separated (article,user,category)
    #[arg(short, long, value_delimiter = ',')]
    kinds: Option<Vec<RecordKind>>,

    /// First ID to visit
    #[arg(long)]
    start_id: Option<u64>,

    /// Last ID to visit; the scan is open-ended without it
    #[arg(long)]
    max_id: Option<u64>,

    /// Number of pages fetched concurrently per batch
    #[arg(short = 'j', long)]
    max_concurrent: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the settings and show the plan without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_archive(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bbs_archive=info,warn"),
            1 => EnvFilter::new("bbs_archive=debug,info"),
            2 => EnvFilter::new("bbs_archive=trace,debug"),
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

/// Reads the config file, if any, and layers the command-line flags on top
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = read_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            let (Some(base_url), Some(output_dir)) = (&cli.base_url, &cli.output_dir) else {
                bail!("either --config or both --base-url and --output-dir are required");
            };
            Config::new(base_url.clone(), output_dir.clone())
        }
    };

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(serializer) = cli.serializer {
        config.serializer = serializer;
    }
    if let Some(kinds) = &cli.kinds {
        config.kinds = kinds.clone();
    }
    if let Some(start_id) = cli.start_id {
        config.start_id = start_id;
    }
    if cli.max_id.is_some() {
        config.max_id = cli.max_id;
    }
    if let Some(max_concurrent) = cli.max_concurrent {
        config.max_concurrent = max_concurrent;
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows what would be archived
fn handle_dry_run(config: &Config) {
    println!("=== bbs-archive Dry Run ===\n");

    println!("Source: {}", config.base_url);
    println!("Output: {}", config.output_dir.display());
    println!("Format: {}", config.serializer);

    println!("\nScan:");
    println!("  Start ID: {}", config.start_id);
    match config.max_id {
        Some(max_id) => println!("  Max ID: {}", max_id),
        None => println!("  Max ID: none (until the forum runs out)"),
    }
    println!("  Batch size: {}", config.max_concurrent);
    match IdBatches::planned_batches(config.start_id, config.max_id, config.max_concurrent) {
        Some(batches) => println!("  At most {} batches per kind", batches),
        None => println!("  Batches per kind: open-ended"),
    }

    println!("\nKinds ({}):", config.kinds.len());
    for kind in &config.kinds {
        println!("  - {} -> {}/", kind, config.output_dir.join(kind.dir_name()).display());
    }

    println!("\nHTTP:");
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  User agent: {}", config.http.user_agent);
    println!(
        "  Cookie: {}",
        if config.http.cookie.is_some() { "set" } else { "none" }
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main archive operation
async fn handle_archive(config: Config, quiet: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Archiving {} into {} as {}",
        config.base_url,
        config.output_dir.display(),
        config.serializer
    );

    let coordinator = Coordinator::new(config).context("failed to start the archive")?;

    match coordinator.run().await {
        Ok(summary) => {
            tracing::info!("Archive completed: {} files written", summary.total_written());
            if !quiet {
                print_summary(&summary);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Archive failed: {}", e);
            Err(e.into())
        }
    }
}
