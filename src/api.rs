//! HTTP API handlers for Flashpoint.
//!
//! Upstream failures never surface as 5xx from the conflict endpoints: the
//! repositories degrade them to empty results, so these handlers only fail
//! when the conflict repository itself is not configured (missing ACLED
//! credentials), which is a 503.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::filters::{StaticRegionTable, filter_conflicts};
use crate::model::{
    RegionalQuery, RegionalResponse, SevereConflictResponse, StatsResponse, WatchlistQuery,
    WatchlistResponse,
};
use crate::queries::{ConflictRepository, region_overview};
use crate::stats::StatsRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Conflict queries; absent when ACLED credentials are not configured.
    pub conflicts: Option<ConflictRepository>,
    /// Country statistics lookups.
    pub stats: StatsRepository,
}

impl AppState {
    fn conflicts(&self) -> Result<&ConflictRepository, StatusCode> {
        self.conflicts.as_ref().ok_or_else(|| {
            warn!("conflict repository not configured");
            StatusCode::SERVICE_UNAVAILABLE
        })
    }
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /conflicts/severe - The most severe recent conflict.
///
/// Returns `{"event": null}` when no event in the window clears the fatality
/// threshold, or when the upstream fetch failed.
#[instrument(skip(state))]
pub async fn get_severe_conflict(
    State(state): State<AppState>,
) -> Result<Json<SevereConflictResponse>, StatusCode> {
    let event = state.conflicts()?.most_severe_recent_conflict().await;

    info!(found = event.is_some(), "severe conflict queried");
    Ok(Json(SevereConflictResponse { event }))
}

/// GET /conflicts/watchlist - Ranked list of top ongoing conflicts.
///
/// # Query Parameters
///
/// - `limit` (optional): Maximum entries to return (default: 5)
/// - `region`, `severity`, `event_type`, `timeframe` (optional): filter
///   labels; unknown labels impose no constraint
#[instrument(skip(state))]
pub async fn get_watchlist(
    State(state): State<AppState>,
    Query(query): Query<WatchlistQuery>,
) -> Result<Json<WatchlistResponse>, StatusCode> {
    let events = state.conflicts()?.top_ongoing_conflicts().await;

    let filters = query.to_filter_options();
    let filtered = filter_conflicts(events, &filters, &StaticRegionTable, Utc::now().date_naive());
    let events: Vec<_> = filtered.into_iter().take(query.limit).collect();

    info!(count = events.len(), limit = query.limit, "watchlist queried");
    Ok(Json(WatchlistResponse {
        count: events.len(),
        events,
    }))
}

/// GET /conflicts/regional/:country - Conflicts in the country's region.
///
/// # Query Parameters
///
/// - `exclude` (optional): event identifier to drop from the result, for
///   callers already displaying that event
///
/// The response carries a region overview computed over the returned events;
/// it is null when no event in the window matched the country.
#[instrument(skip(state))]
pub async fn get_regional_conflicts(
    State(state): State<AppState>,
    Path(country): Path<String>,
    Query(query): Query<RegionalQuery>,
) -> Result<Json<RegionalResponse>, StatusCode> {
    let mut events = state.conflicts()?.regional_conflicts(&country).await;

    if let Some(exclude) = &query.exclude {
        events.retain(|event| &event.event_id_cnty != exclude);
    }

    let overview = events
        .first()
        .map(|event| region_overview(&event.region, &events));

    info!(country = %country, count = events.len(), "regional conflicts queried");
    Ok(Json(RegionalResponse {
        overview,
        count: events.len(),
        events,
    }))
}

/// GET /stats/:country - Country indicators compared to global averages.
///
/// Always 200: an unmapped country or a failed indicator lookup comes back
/// as null values with an explanatory note.
#[instrument(skip(state))]
pub async fn get_country_stats(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Json<StatsResponse> {
    let stats = state.stats.get_country_stats(&country).await;

    info!(country = %country, note = %stats.note, "country stats queried");
    Json(StatsResponse::new(&country, stats))
}
