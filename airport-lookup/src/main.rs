use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use airport_lookup::airports::Airports;
use airport_lookup::cache::CacheConfig;
use airport_lookup::config::ServerConfig;
use airport_lookup::dataset::AirportDataset;
use airport_lookup::web::{serve, shutdown_signal};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env();

    // The dataset is required; fail fast if it cannot be loaded
    let dataset = match AirportDataset::load(&config.data_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!(error = %e, "failed to load airport dataset");
            return ExitCode::FAILURE;
        }
    };
    info!(
        count = dataset.len(),
        duplicates = dataset.duplicate_codes().len(),
        "loaded airports"
    );

    let cache_config = CacheConfig::airport_search().with_capacity(config.search_cache_size);
    let airports = Airports::persistent(dataset, &config.cache_dir, &cache_config);
    info!(
        dir = %config.cache_dir.display(),
        namespace = cache_config.namespace(),
        restored = airports.search_cache().len(),
        "opened search cache"
    );

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!("Airport lookup listening on http://{}", config.bind_addr);
    info!("  GET /health");
    info!("  GET /airports/icao/:code");
    info!("  GET /airports/iata/:code");
    info!("  GET /airports/search?q=&limit=");

    if let Err(e) = serve(listener, airports, shutdown_signal()).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
