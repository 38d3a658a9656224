//! Flashpoint - conflict event monitoring over public REST data sources.
//!
//! # API Endpoints
//!
//! - `GET /conflicts/severe` - Most severe recent conflict
//! - `GET /conflicts/watchlist` - Ranked, filterable list of ongoing conflicts
//! - `GET /conflicts/regional/:country` - Conflicts in a country's region
//! - `GET /stats/:country` - Country indicators vs global averages
//! - `GET /health` - Health check
//!
//! # Configuration
//!
//! - `FLASHPOINT_PORT`: listen port (default 3000)
//! - `FLASHPOINT_ACLED_EMAIL` / `FLASHPOINT_ACLED_KEY`: ACLED credentials;
//!   the conflict endpoints answer 503 until both are set
//! - `FLASHPOINT_ACLED_BASE` / `FLASHPOINT_WORLDBANK_BASE`: base URL
//!   overrides for the upstream APIs

use std::env;
use std::net::SocketAddr;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use flashpoint::api::{
    AppState, get_country_stats, get_regional_conflicts, get_severe_conflict, get_watchlist,
    health_check,
};
use flashpoint::data_sources::{AcledClient, WorldBankClient};
use flashpoint::queries::ConflictRepository;
use flashpoint::stats::StatsRepository;

/// Default port if not specified via environment variable.
const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with environment filter
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("flashpoint=info".parse()?))
        .init();

    // Load configuration from environment
    let port: u16 = env::var("FLASHPOINT_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let conflicts = match (
        env::var("FLASHPOINT_ACLED_EMAIL"),
        env::var("FLASHPOINT_ACLED_KEY"),
    ) {
        (Ok(email), Ok(key)) => {
            let client = match env::var("FLASHPOINT_ACLED_BASE") {
                Ok(base) => AcledClient::with_base_url(&base, &email, &key),
                Err(_) => AcledClient::new(&email, &key),
            };
            Some(ConflictRepository::new(client))
        }
        _ => {
            warn!("ACLED credentials not set; conflict endpoints disabled");
            None
        }
    };

    let world_bank = match env::var("FLASHPOINT_WORLDBANK_BASE") {
        Ok(base) => WorldBankClient::with_base_url(&base),
        Err(_) => WorldBankClient::new(),
    };
    let stats = StatsRepository::new(world_bank);

    // One-time fill of the name-to-code table; the seed map covers the
    // common lookups if the listing is unreachable.
    match stats.load_country_codes().await {
        Ok(added) => info!(added, "country code table loaded"),
        Err(e) => warn!(error = %e, "country listing fetch failed; using seed table"),
    }

    let state = AppState { conflicts, stats };

    // Build router
    let app = Router::new()
        .route("/conflicts/severe", get(get_severe_conflict))
        .route("/conflicts/watchlist", get(get_watchlist))
        .route("/conflicts/regional/:country", get(get_regional_conflicts))
        .route("/stats/:country", get(get_country_stats))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Flashpoint is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
