//! Pure filtering of fetched event batches.
//!
//! Each enabled filter axis is applied as an independent subset pass over the
//! surviving events, so the final result has set-intersection semantics and
//! does not depend on the order the passes run in.
//!
//! The country-to-region grouping is deliberately behind the [`RegionLookup`]
//! trait: the built-in table covers only a handful of countries per region
//! and is a replaceable approximation, not a geography source.

use chrono::NaiveDate;

use crate::model::{ConflictEvent, FilterOptions, Timeframe};

/// Maps a country name to its coarse region name.
pub trait RegionLookup {
    /// The region a country belongs to, or `None` when the table has no
    /// entry for it.
    fn region_of(&self, country: &str) -> Option<&str>;
}

/// Fixed five-region membership table.
///
/// Countries not listed here have no region: they pass when no region filter
/// is set and fail whenever a specific region is requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRegionTable;

const AFRICA: &[&str] = &["Nigeria", "Kenya", "Sudan", "Somalia", "Ethiopia"];
const MIDDLE_EAST: &[&str] = &["Syria", "Iraq", "Yemen", "Saudi Arabia", "Iran"];
const ASIA: &[&str] = &["China", "India", "Pakistan", "Afghanistan", "Japan"];
const EUROPE: &[&str] = &["Ukraine", "France", "Germany", "United Kingdom", "Spain"];
const AMERICAS: &[&str] = &["United States", "Mexico", "Brazil", "Colombia", "Canada"];

impl RegionLookup for StaticRegionTable {
    fn region_of(&self, country: &str) -> Option<&str> {
        let groups: [(&str, &[&str]); 5] = [
            ("Africa", AFRICA),
            ("Middle East", MIDDLE_EAST),
            ("Asia", ASIA),
            ("Europe", EUROPE),
            ("Americas", AMERICAS),
        ];

        groups
            .iter()
            .find(|(_, countries)| countries.contains(&country))
            .map(|(region, _)| *region)
    }
}

/// Parse an event date string. Total: any input either parses to a valid
/// calendar date or yields `None`; it never panics.
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Narrow a fetched batch by the given filter selections.
///
/// Passes run region, severity, event type, then timeframe, but each is a
/// pure subset filter so any order yields the same set. `now` anchors the
/// timeframe axis; events with unparseable dates count as maximally stale
/// and are excluded by any bounded timeframe.
pub fn filter_conflicts<L: RegionLookup>(
    events: Vec<ConflictEvent>,
    filters: &FilterOptions,
    regions: &L,
    now: NaiveDate,
) -> Vec<ConflictEvent> {
    let mut remaining = events;

    if let Some(region) = &filters.region {
        remaining.retain(|event| regions.region_of(&event.country) == Some(region.as_str()));
    }

    if let Some(bucket) = filters.severity {
        remaining.retain(|event| bucket.contains(event.fatalities));
    }

    if let Some(event_type) = &filters.event_type {
        remaining.retain(|event| event.event_type.eq_ignore_ascii_case(event_type));
    }

    if let Some(timeframe) = filters.timeframe {
        remaining.retain(|event| within_timeframe(event, timeframe, now));
    }

    remaining
}

fn within_timeframe(event: &ConflictEvent, timeframe: Timeframe, now: NaiveDate) -> bool {
    match parse_event_date(&event.event_date) {
        Some(date) => (now - date).num_days() <= timeframe.days(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SeverityBucket;

    fn event(id: &str, country: &str, event_type: &str, date: &str, fatalities: i64) -> ConflictEvent {
        ConflictEvent {
            event_id_cnty: id.to_string(),
            event_date: date.to_string(),
            event_type: event_type.to_string(),
            actor1: String::new(),
            country: country.to_string(),
            region: String::new(),
            location: String::new(),
            latitude: None,
            longitude: None,
            source: String::new(),
            notes: String::new(),
            fatalities,
        }
    }

    fn batch() -> Vec<ConflictEvent> {
        vec![
            event("1", "Syria", "Battles", "2024-03-10", 25),
            event("2", "Yemen", "Explosions/Remote violence", "2024-02-20", 12),
            event("3", "France", "Protests", "2024-03-12", 0),
            event("4", "Nigeria", "Battles", "2023-11-01", 40),
            event("5", "Atlantis", "Battles", "2024-03-01", 15),
            event("6", "Syria", "Riots", "bad-date", 8),
        ]
    }

    fn ids(events: &[ConflictEvent]) -> Vec<&str> {
        events.iter().map(|e| e.event_id_cnty.as_str()).collect()
    }

    fn now() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_region_table() {
        let table = StaticRegionTable;
        assert_eq!(table.region_of("Syria"), Some("Middle East"));
        assert_eq!(table.region_of("Yemen"), Some("Middle East"));
        assert_eq!(table.region_of("France"), Some("Europe"));
        assert_eq!(table.region_of("Atlantis"), None);
    }

    #[test]
    fn test_no_filters_is_identity() {
        let filtered = filter_conflicts(batch(), &FilterOptions::default(), &StaticRegionTable, now());
        assert_eq!(filtered.len(), batch().len());
    }

    #[test]
    fn test_region_filter() {
        let filters = FilterOptions {
            region: Some("Middle East".to_string()),
            ..Default::default()
        };
        let filtered = filter_conflicts(batch(), &filters, &StaticRegionTable, now());
        // Unlisted countries fail a specific region filter.
        assert_eq!(ids(&filtered), vec!["1", "2", "6"]);
    }

    #[test]
    fn test_severity_filter() {
        let filters = FilterOptions {
            severity: Some(SeverityBucket::Medium),
            ..Default::default()
        };
        let filtered = filter_conflicts(batch(), &filters, &StaticRegionTable, now());
        assert_eq!(ids(&filtered), vec!["2", "5"]);
    }

    #[test]
    fn test_event_type_filter_is_case_insensitive() {
        let filters = FilterOptions {
            event_type: Some("battles".to_string()),
            ..Default::default()
        };
        let filtered = filter_conflicts(batch(), &filters, &StaticRegionTable, now());
        assert_eq!(ids(&filtered), vec!["1", "4", "5"]);
    }

    #[test]
    fn test_timeframe_filter() {
        let filters = FilterOptions {
            timeframe: Some(Timeframe::LastWeek),
            ..Default::default()
        };
        let filtered = filter_conflicts(batch(), &filters, &StaticRegionTable, now());
        assert_eq!(ids(&filtered), vec!["1", "3"]);
    }

    #[test]
    fn test_unparseable_date_fails_any_bounded_timeframe() {
        for timeframe in [Timeframe::LastWeek, Timeframe::LastMonth, Timeframe::LastThreeMonths] {
            let filters = FilterOptions {
                timeframe: Some(timeframe),
                ..Default::default()
            };
            let filtered = filter_conflicts(batch(), &filters, &StaticRegionTable, now());
            assert!(filtered.iter().all(|e| e.event_id_cnty != "6"));
        }
    }

    #[test]
    fn test_filter_composition_is_order_independent() {
        let axes: [FilterOptions; 4] = [
            FilterOptions {
                region: Some("Middle East".to_string()),
                ..Default::default()
            },
            FilterOptions {
                severity: Some(SeverityBucket::High),
                ..Default::default()
            },
            FilterOptions {
                event_type: Some("Battles".to_string()),
                ..Default::default()
            },
            FilterOptions {
                timeframe: Some(Timeframe::LastMonth),
                ..Default::default()
            },
        ];

        let apply_in_order = |order: &[usize]| {
            let mut events = batch();
            for &i in order {
                events = filter_conflicts(events, &axes[i], &StaticRegionTable, now());
            }
            let mut result = ids(&events)
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>();
            result.sort();
            result
        };

        let combined = {
            let all = FilterOptions {
                region: Some("Middle East".to_string()),
                severity: Some(SeverityBucket::High),
                event_type: Some("Battles".to_string()),
                timeframe: Some(Timeframe::LastMonth),
            };
            let mut result = ids(&filter_conflicts(batch(), &all, &StaticRegionTable, now()))
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>();
            result.sort();
            result
        };

        for order in [
            [0usize, 1, 2, 3],
            [3, 2, 1, 0],
            [1, 3, 0, 2],
            [2, 0, 3, 1],
        ] {
            assert_eq!(apply_in_order(&order), combined);
        }
    }

    #[test]
    fn test_parse_event_date_is_total() {
        assert_eq!(
            parse_event_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_event_date("2023-02-29"), None);
        assert_eq!(parse_event_date(""), None);
        assert_eq!(parse_event_date("garbage"), None);
    }
}
