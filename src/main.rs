//! Stream Monitor Service - Main Daemon
//!
//! A server-side daemon that continuously:
//! 1. Fetches Waikāne and Waiahōle gauge feeds concurrently
//! 2. Selects the latest valid reading per stream
//! 3. Classifies flood risk against configured thresholds
//! 4. Publishes the snapshot pair, optionally over a JSON endpoint
//!
//! Usage:
//!   cargo run --release
//!
//! Environment:
//!   STREAM_MONITOR_CONFIG - path to the config file (default: streams.toml)
//!   RUST_LOG              - tracing filter (default: monitor.log_level)

use streamwatch_service::config;
use streamwatch_service::daemon::Daemon;
use streamwatch_service::endpoint;
use streamwatch_service::ingest::feed::HttpFeedClient;
use streamwatch_service::logging;
use streamwatch_service::monitor::SnapshotBuilder;
use streamwatch_service::monitor::store::SnapshotStore;
use std::sync::Arc;

fn main() {
    dotenv::dotenv().ok();

    let config = match config::load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init_tracing(&config.monitor.log_level) {
        eprintln!("❌ Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let feed = match HttpFeedClient::from_config(&config) {
        Ok(feed) => Arc::new(feed),
        Err(e) => {
            tracing::error!(error = %e, "failed to build feed client");
            std::process::exit(1);
        }
    };

    let store = Arc::new(SnapshotStore::new());
    let daemon = Daemon::new(SnapshotBuilder::new(feed, Arc::clone(&config)), Arc::clone(&store));

    // Start HTTP endpoint if configured (in background thread)
    if let Some(port) = config.monitor.endpoint_port {
        let config = Arc::clone(&config);
        std::thread::spawn(move || {
            if let Err(e) = endpoint::start_endpoint_server(port, store, config) {
                tracing::error!(error = %e, "endpoint server stopped");
            }
        });
    }

    tracing::info!(
        waikane = %config.streams.waikane.endpoint_url,
        waiahole = %config.streams.waiahole.endpoint_url,
        "monitoring 2 streams"
    );

    daemon.run();
}
