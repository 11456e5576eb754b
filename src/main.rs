use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use medsafe_core::config::config_from_env_values;
use medsafe_core::SafetyService;

/// Main entry point for the medsafe application
///
/// Starts the REST server on port 3000 (configurable via MEDSAFE_REST_ADDR).
///
/// # Environment Variables
/// - `MEDSAFE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `RXNAV_BASE_URL`: RxNav REST base URL (default: "https://rxnav.nlm.nih.gov/REST")
/// - `OPENFDA_BASE_URL`: openFDA base URL (default: "https://api.fda.gov")
/// - `UPSTREAM_TIMEOUT_MS`: per-request upstream timeout (default: 5000)
/// - `UPSTREAM_MAX_CONCURRENCY`: in-flight requests per upstream service (default: 4)
/// - `UPSTREAM_SPACING_MS`: minimum gap between upstream request starts (default: 0)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - an upstream setting is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medsafe_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(config_from_env_values(
        std::env::var("RXNAV_BASE_URL").ok(),
        std::env::var("OPENFDA_BASE_URL").ok(),
        std::env::var("UPSTREAM_TIMEOUT_MS").ok(),
        std::env::var("UPSTREAM_MAX_CONCURRENCY").ok(),
        std::env::var("UPSTREAM_SPACING_MS").ok(),
    )?);
    let rest_addr = std::env::var("MEDSAFE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!(
        rxnav = cfg.rxnav_base_url(),
        openfda = cfg.openfda_base_url(),
        max_concurrency = cfg.max_concurrent_requests(),
        "upstream configuration loaded"
    );
    tracing::info!("++ Starting medsafe REST on {}", rest_addr);

    let service = SafetyService::new(cfg)?;
    let app = router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
