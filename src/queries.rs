//! Windowed event queries and their in-memory reductions.
//!
//! The three public queries fetch a date-windowed batch from the event API
//! and reduce it in memory: the single most severe event, a ranked list of
//! top ongoing conflicts, and the conflicts sharing a country's region. Each
//! call issues its own fetch; nothing is cached between calls.
//!
//! Window lengths, fetch limits, result limits, and the fatality threshold
//! were never settled product requirements upstream, so they live in
//! [`QueryConfig`] rather than in the code.

use std::collections::HashSet;

use tracing::warn;

use crate::data_sources::AcledClient;
use crate::model::{ConflictEvent, RegionOverview};

/// Tunable query parameters.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Events at or below this fatality count are ignored everywhere.
    pub min_fatalities: i64,

    /// Lookback window for the most-severe query, in months.
    pub severe_window_months: u32,

    /// Fetch size for the most-severe query.
    pub severe_fetch_limit: u32,

    /// Lookback window for the watchlist query, in months.
    pub watchlist_window_months: u32,

    /// Fetch size for the watchlist query.
    pub watchlist_fetch_limit: u32,

    /// Maximum entries the watchlist query returns.
    pub watchlist_limit: usize,

    /// Keep only the top entry per country in the watchlist.
    pub dedup_by_country: bool,

    /// Lookback window for the regional query, in months.
    pub regional_window_months: u32,

    /// Fetch size for the regional query.
    pub regional_fetch_limit: u32,

    /// Maximum entries the regional query returns.
    pub regional_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            min_fatalities: 1,
            severe_window_months: 3,
            severe_fetch_limit: 300,
            watchlist_window_months: 3,
            watchlist_fetch_limit: 500,
            watchlist_limit: 150,
            dedup_by_country: false,
            regional_window_months: 12,
            regional_fetch_limit: 400,
            regional_limit: 60,
        }
    }
}

// ============================================================================
// Pure reductions
// ============================================================================

/// The event with the highest fatality count above the threshold, or `None`
/// when nothing qualifies. On ties the first-fetched event wins.
pub fn most_severe(events: &[ConflictEvent], min_fatalities: i64) -> Option<ConflictEvent> {
    let mut best: Option<&ConflictEvent> = None;

    for event in events.iter().filter(|e| e.fatalities > min_fatalities) {
        match best {
            Some(current) if event.fatalities <= current.fatalities => {}
            _ => best = Some(event),
        }
    }

    best.cloned()
}

/// Events above the threshold, sorted non-increasing by fatality count and
/// truncated to `limit`. With `dedup_by_country` only the first (highest)
/// entry per country survives. The sort is stable, so equal counts keep
/// their fetch order.
pub fn rank_ongoing(
    events: &[ConflictEvent],
    min_fatalities: i64,
    dedup_by_country: bool,
    limit: usize,
) -> Vec<ConflictEvent> {
    let mut ranked: Vec<ConflictEvent> = events
        .iter()
        .filter(|e| e.fatalities > min_fatalities)
        .cloned()
        .collect();

    ranked.sort_by(|a, b| b.fatalities.cmp(&a.fatalities));

    if dedup_by_country {
        let mut seen = HashSet::new();
        ranked.retain(|e| seen.insert(e.country.clone()));
    }

    ranked.truncate(limit);
    ranked
}

/// Events sharing the region of `country`, above the threshold, sorted
/// non-increasing and truncated to `limit`.
///
/// The region is taken from the first fetched event whose country matches;
/// when the batch holds no such event the result is empty, even if the
/// country has a perfectly good region in general. The queried country's own
/// events are NOT excluded; that is the caller's decision.
pub fn related_by_region(
    events: &[ConflictEvent],
    country: &str,
    min_fatalities: i64,
    limit: usize,
) -> Vec<ConflictEvent> {
    let region = match events.iter().find(|e| e.country == country) {
        Some(event) => event.region.clone(),
        None => return Vec::new(),
    };

    let mut related: Vec<ConflictEvent> = events
        .iter()
        .filter(|e| e.region == region && e.fatalities > min_fatalities)
        .cloned()
        .collect();

    related.sort_by(|a, b| b.fatalities.cmp(&a.fatalities));
    related.truncate(limit);
    related
}

/// Aggregate view over one region's conflicts.
pub fn region_overview(region: &str, events: &[ConflictEvent]) -> RegionOverview {
    let total_conflicts = events.len();
    let total_casualties: i64 = events.iter().map(|e| e.fatalities).sum();
    let average_casualties = if total_conflicts > 0 {
        total_casualties as f64 / total_conflicts as f64
    } else {
        0.0
    };

    RegionOverview {
        region: region.to_string(),
        total_conflicts,
        total_casualties,
        average_casualties,
    }
}

// ============================================================================
// Repository
// ============================================================================

/// Repository for the three conflict queries.
///
/// Failures of the underlying fetch never escape: they are logged and
/// degrade to `None` or an empty list at this boundary.
#[derive(Clone)]
pub struct ConflictRepository {
    client: AcledClient,
    config: QueryConfig,
}

impl ConflictRepository {
    /// Create a repository with the default query configuration.
    pub fn new(client: AcledClient) -> Self {
        Self::with_config(client, QueryConfig::default())
    }

    /// Create a repository with a custom query configuration.
    pub fn with_config(client: AcledClient, config: QueryConfig) -> Self {
        Self { client, config }
    }

    /// The most severe conflict in the recent window, or `None`.
    pub async fn most_severe_recent_conflict(&self) -> Option<ConflictEvent> {
        let fetched = self
            .client
            .get_conflicts_in_window(self.config.severe_window_months, self.config.severe_fetch_limit)
            .await;

        match fetched {
            Ok(response) => most_severe(&response.data, self.config.min_fatalities),
            Err(e) => {
                warn!(error = %e, "failed to fetch severe conflict");
                None
            }
        }
    }

    /// Top ongoing conflicts in the recent window, ranked by fatality count.
    pub async fn top_ongoing_conflicts(&self) -> Vec<ConflictEvent> {
        let fetched = self
            .client
            .get_conflicts_in_window(
                self.config.watchlist_window_months,
                self.config.watchlist_fetch_limit,
            )
            .await;

        match fetched {
            Ok(response) => rank_ongoing(
                &response.data,
                self.config.min_fatalities,
                self.config.dedup_by_country,
                self.config.watchlist_limit,
            ),
            Err(e) => {
                warn!(error = %e, "failed to fetch ongoing conflicts");
                Vec::new()
            }
        }
    }

    /// Conflicts sharing the given country's region over a longer window.
    pub async fn regional_conflicts(&self, country: &str) -> Vec<ConflictEvent> {
        let fetched = self
            .client
            .get_conflicts_in_window(
                self.config.regional_window_months,
                self.config.regional_fetch_limit,
            )
            .await;

        match fetched {
            Ok(response) => related_by_region(
                &response.data,
                country,
                self.config.min_fatalities,
                self.config.regional_limit,
            ),
            Err(e) => {
                warn!(country, error = %e, "failed to fetch regional conflicts");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, country: &str, region: &str, fatalities: i64) -> ConflictEvent {
        ConflictEvent {
            event_id_cnty: id.to_string(),
            event_date: "2024-01-15".to_string(),
            event_type: "Battles".to_string(),
            actor1: String::new(),
            country: country.to_string(),
            region: region.to_string(),
            location: String::new(),
            latitude: None,
            longitude: None,
            source: String::new(),
            notes: String::new(),
            fatalities,
        }
    }

    #[test]
    fn test_most_severe_picks_maximum() {
        let events = vec![
            event("1", "Syria", "Middle East", 5),
            event("2", "Yemen", "Middle East", 30),
            event("3", "Sudan", "Africa", 12),
        ];

        let severe = most_severe(&events, 1).unwrap();
        assert_eq!(severe.event_id_cnty, "2");
    }

    #[test]
    fn test_most_severe_first_fetched_wins_ties() {
        let events = vec![
            event("1", "Syria", "Middle East", 30),
            event("2", "Yemen", "Middle East", 30),
        ];

        let severe = most_severe(&events, 1).unwrap();
        assert_eq!(severe.event_id_cnty, "1");
    }

    #[test]
    fn test_most_severe_threshold_is_strict() {
        // fatalities must exceed the threshold, not merely reach it
        let events = vec![event("1", "Syria", "Middle East", 1)];
        assert!(most_severe(&events, 1).is_none());

        let events = vec![event("1", "Syria", "Middle East", 2)];
        assert!(most_severe(&events, 1).is_some());
    }

    #[test]
    fn test_most_severe_empty_after_filter() {
        let events = vec![event("1", "France", "Europe", 0)];
        assert!(most_severe(&events, 1).is_none());
        assert!(most_severe(&[], 1).is_none());
    }

    #[test]
    fn test_rank_ongoing_sorted_and_limited() {
        let events = vec![
            event("1", "Syria", "Middle East", 5),
            event("2", "Yemen", "Middle East", 30),
            event("3", "Sudan", "Africa", 12),
            event("4", "Mali", "Africa", 8),
            event("5", "Chad", "Africa", 0),
        ];

        let ranked = rank_ongoing(&events, 1, false, 3);
        assert_eq!(ranked.len(), 3);
        let counts: Vec<i64> = ranked.iter().map(|e| e.fatalities).collect();
        assert_eq!(counts, vec![30, 12, 8]);
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_rank_ongoing_never_exceeds_limit() {
        let events: Vec<ConflictEvent> = (0..20)
            .map(|i| event(&i.to_string(), "Syria", "Middle East", 10 + i))
            .collect();

        for limit in [0, 1, 5, 19, 20, 100] {
            assert!(rank_ongoing(&events, 1, false, limit).len() <= limit);
        }
    }

    #[test]
    fn test_rank_ongoing_dedup_keeps_top_per_country() {
        let events = vec![
            event("1", "Syria", "Middle East", 10),
            event("2", "Syria", "Middle East", 40),
            event("3", "Yemen", "Middle East", 25),
        ];

        let ranked = rank_ongoing(&events, 1, true, 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].event_id_cnty, "2");
        assert_eq!(ranked[1].event_id_cnty, "3");
    }

    #[test]
    fn test_related_by_region_unknown_country_is_empty() {
        let events = vec![
            event("1", "Syria", "Middle East", 20),
            event("2", "France", "Europe", 20),
        ];

        assert!(related_by_region(&events, "Nowhereland", 1, 10).is_empty());
    }

    #[test]
    fn test_related_by_region_keeps_same_region_only() {
        let events = vec![
            event("1", "Syria", "Middle East", 20),
            event("2", "Yemen", "Middle East", 35),
            event("3", "France", "Europe", 50),
        ];

        let related = related_by_region(&events, "Syria", 1, 10);
        let ids: Vec<&str> = related.iter().map(|e| e.event_id_cnty.as_str()).collect();
        // Sorted by fatalities; includes the queried country's own event.
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_related_by_region_applies_threshold_and_limit() {
        let events = vec![
            event("1", "Syria", "Middle East", 1),
            event("2", "Yemen", "Middle East", 35),
            event("3", "Iraq", "Middle East", 12),
            event("4", "Iran", "Middle East", 7),
        ];

        let related = related_by_region(&events, "Syria", 1, 2);
        let ids: Vec<&str> = related.iter().map(|e| e.event_id_cnty.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_region_overview_averages() {
        let events = vec![
            event("1", "Syria", "Middle East", 10),
            event("2", "Yemen", "Middle East", 20),
        ];

        let overview = region_overview("Middle East", &events);
        assert_eq!(overview.total_conflicts, 2);
        assert_eq!(overview.total_casualties, 30);
        assert!((overview.average_casualties - 15.0).abs() < f64::EPSILON);

        let empty = region_overview("Middle East", &[]);
        assert_eq!(empty.average_casualties, 0.0);
    }
}
