//! hello-counter: a greeting web service that counts its visitors.
//!
//! This is the application entry point. It initializes tracing, loads
//! configuration from an optional TOML file and the `PORT` variable, creates
//! the Redis counter store, sets up the Axum router and starts the HTTP server.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hello_counter::config::{AppConfig, DEFAULT_LOG_FILTER};
use hello_counter::http::start_server;
use hello_counter::{create_router, AppState, RedisStore};

/// hello-counter: a greeting web service that counts its visitors
#[derive(Parser, Debug)]
#[command(name = "hello-counter", version, about)]
struct Args {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "hello_counter=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration first so the log format is known
    let config = AppConfig::load(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Loaded configuration");

    let state = if config.counter.enabled {
        tracing::info!(
            host = %config.counter.host,
            port = config.counter.port,
            key = %config.counter.key,
            retries = config.counter.retries,
            retry_delay_ms = config.counter.retry_delay_ms,
            "Hit counter configured"
        );
        let store = RedisStore::new(&config.counter.host, config.counter.port)?;
        AppState::new(config.clone(), Arc::new(store))
    } else {
        tracing::info!("Hit counter disabled, serving static greeting");
        AppState::without_counter(config.clone())
    };

    // Create router
    let app = create_router(state);

    start_server(app, &config.http).await?;

    Ok(())
}
