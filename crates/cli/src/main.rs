use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brickvault_core::{
    load_config, load_themes, validate_config, BricksetClient, Config, ConsoleReporter,
    IngestRunner, SanitizedConfig, SetStore, SqliteSetStore,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(
    name = "brickvault",
    version,
    about = "Download the Brickset set catalog into a local SQLite database"
)]
struct Cli {
    /// Configuration file
    #[arg(long, env = "BRICKVAULT_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Theme list to process (overrides ingest.themes_file)
    #[arg(long)]
    themes: Option<PathBuf>,

    /// Only process the first N themes (overrides ingest.max_themes)
    #[arg(long)]
    max_themes: Option<usize>,

    /// SQLite database path (overrides database.path)
    #[arg(long)]
    db: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(themes) = &self.themes {
            config.ingest.themes_file = themes.clone();
        }
        if let Some(max) = self.max_themes {
            config.ingest.max_themes = Some(max);
        }
        if let Some(db) = &self.db {
            config.database.path = db.clone();
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging (stdout carries the progress report)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    info!("brickvault v{}", VERSION);

    // Load configuration
    info!("Loading configuration from {:?}", cli.config);
    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    cli.apply_overrides(&mut config);

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Configuration loaded: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    // Read theme list
    let themes = load_themes(&config.ingest.themes_file).context("Failed to load theme list")?;
    info!(
        "Loaded {} themes from {:?}",
        themes.len(),
        config.ingest.themes_file
    );

    // Open set store
    let store: Arc<dyn SetStore> = Arc::new(
        SqliteSetStore::new(&config.database.path).context("Failed to open set database")?,
    );
    info!("Database path: {:?}", config.database.path);

    // Create Brickset client
    let client =
        BricksetClient::new(config.brickset.clone()).context("Failed to create Brickset client")?;

    let runner = IngestRunner::new(config.ingest.clone(), client, store)
        .with_reporter(Arc::new(ConsoleReporter));

    let summary = runner
        .run(&themes)
        .await
        .context("Failed to read final database statistics")?;

    if summary.has_failures() {
        info!(
            "Finished with {} failed themes",
            summary.failed_themes.len()
        );
    }

    Ok(())
}
