//! UsedFinder backend entry point.
//!
//! Initializes tracing, loads configuration (optional TOML file plus the
//! `ETSY_API_KEY` environment variable), builds the Etsy client and search
//! service, sets up the Axum router and starts the HTTP server.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use usedfinder::config::{AppConfig, DEFAULT_LOG_FILTER, ETSY_API_KEY_ENV};
use usedfinder::etsy::{EtsyClient, SearchService};
use usedfinder::http::start_server;
use usedfinder::routes::create_router;
use usedfinder::state::AppState;

/// UsedFinder backend: Etsy search proxy for the UsedFinder app
#[derive(Parser, Debug)]
#[command(name = "usedfinder", version, about)]
struct Args {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "usedfinder=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration is needed first to pick the log format
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.apply_env_credential(std::env::var(ETSY_API_KEY_ENV).ok());

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry = tracing_subscriber::registry().with(EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        config = args.config.as_deref().unwrap_or("<defaults>"),
        "Loaded configuration"
    );

    let client = EtsyClient::new(&config.etsy)?;
    tracing::info!(
        endpoint = %client.endpoint(),
        timeout_secs = config.etsy.timeout_seconds,
        "Initialized Etsy client"
    );

    let search = SearchService::new(&config.etsy, Arc::new(client));
    if !search.is_configured() {
        tracing::warn!(
            "{} is not set; /etsy will answer 501 until it is configured",
            ETSY_API_KEY_ENV
        );
    }

    let app = create_router(AppState::new(search));

    start_server(app, &config.http).await?;

    tracing::info!("Server stopped");
    Ok(())
}
