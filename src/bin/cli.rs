//! Novita CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use novita::{
    error::Result,
    models::Config,
    pipeline::{self, RunOptions},
    render::HttpRenderer,
    storage::{LocalStorage, RecordSink},
};

/// Novita - Newly listed non-fiction books
#[derive(Parser, Debug)]
#[command(
    name = "novita",
    version,
    about = "Collects newly listed non-fiction books and their synopses"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Traverse listings, fetch priority synopses and export
    Run {
        /// Skip the synopsis phase
        #[arg(long)]
        skip_enrich: bool,

        /// Export directory (default: output.dir from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration file
    Validate,

    /// Show configuration summary and last export
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn storage_for(config: &Config, output: Option<PathBuf>) -> LocalStorage {
    match output {
        Some(dir) => LocalStorage::with_root(dir, &config.output),
        None => LocalStorage::new(&config.output),
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Run {
            skip_enrich,
            output,
        } => {
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }

            let renderer = HttpRenderer::new(&config.crawler)?;
            let storage = storage_for(&config, output);
            let options = RunOptions {
                skip_enrichment: skip_enrich,
            };

            pipeline::run_pipeline(&config, &renderer, &storage, options).await?;
            log::info!("Run complete!");
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} seeds, {} priority publishers)",
                config.seeds.len(),
                config.publishers.len()
            );
        }

        Command::Info => {
            log::info!("Base URL: {}", config.site.base_url);
            log::info!("Page cap per seed: {}", config.site.max_pages);
            for seed in &config.seeds {
                log::info!("  seed: {} -> {}", seed.name, seed.url);
            }
            log::info!("Priority publishers: {}", config.publishers.len());

            let storage = storage_for(&config, None);
            match storage.load_records().await? {
                Some(export) => {
                    let priority = export
                        .records
                        .iter()
                        .filter(|r| r.category_label.is_priority())
                        .count();
                    log::info!(
                        "Last export: {} records ({} priority) at {}",
                        export.count,
                        priority,
                        export.updated_at
                    );
                }
                None => log::info!("No export found yet."),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
