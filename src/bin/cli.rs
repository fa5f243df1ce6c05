//! Course crawler CLI
//!
//! Runs the scrape once, the timetable stage alone, or the HTTP API.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use course_crawler::{
    error::Result,
    models::Config,
    pipeline::Pipeline,
    server::{self, AppState},
    storage::{CatalogStorage, COURSES_KEY, DEPARTMENTS_KEY, LocalStorage, TIMETABLE_KEY},
};

/// Layup List and ORC timetable scraper
#[derive(Parser, Debug)]
#[command(name = "course-crawler", version, about = "Course catalog scraper and API")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the scraped artifacts over HTTP
    Serve,

    /// Run the full scrape once
    Scrape,

    /// Scrape the ORC timetable only
    Timetable,

    /// Validate configuration
    Validate,

    /// Show which artifacts exist in the data directory
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn load_config(path: &Path) -> Result<Config> {
    let mut config = Config::load_or_default(path);
    config.apply_env()?;
    Ok(config)
}

fn build_pipeline(config: Config) -> Result<(Pipeline, Arc<dyn CatalogStorage>)> {
    let storage: Arc<dyn CatalogStorage> = Arc::new(LocalStorage::new(&config.storage.data_dir));
    let pipeline = Pipeline::new(config, Arc::clone(&storage))?;
    Ok((pipeline, storage))
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Ok(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }

    let config = load_config(&cli.config)?;

    match cli.command {
        Command::Serve => {
            config.validate()?;
            let addr = config.server.addr()?;
            let (pipeline, storage) = build_pipeline(config)?;
            server::run(AppState::new(pipeline, storage), addr).await?;
        }

        Command::Scrape => {
            config.validate()?;
            let (pipeline, _) = build_pipeline(config)?;
            let report = pipeline.run().await?;
            if !report.failures.is_empty() {
                log::warn!("{} units were skipped", report.failures.len());
            }
        }

        Command::Timetable => {
            config.validate_timetable()?;
            let (pipeline, _) = build_pipeline(config)?;
            pipeline.run_timetable().await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate().and_then(|_| config.server.addr().map(|_| ())) {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }

        Command::Info => {
            let data_dir = &config.storage.data_dir;
            log::info!("Data directory: {}", data_dir.display());

            for key in [DEPARTMENTS_KEY, COURSES_KEY, TIMETABLE_KEY] {
                let state = if data_dir.join(key).exists() {
                    "exists"
                } else {
                    "not found"
                };
                log::info!("{key}: {state}");
            }
        }
    }

    Ok(())
}
