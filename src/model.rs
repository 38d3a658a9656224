//! Data models for Flashpoint.
//!
//! The central type is [`ConflictEvent`], one reported incident as returned by
//! the event API. Events are deserialized once per fetch, never mutated, and
//! dropped when the response that carried them is dropped. Uniqueness is by
//! `event_id_cnty` within a single fetched batch; there is no cross-fetch
//! de-duplication.
//!
//! [`FilterOptions`] carries at most one selection per filter axis and is
//! replaced wholesale when a selection changes. [`CountryStats`] is computed
//! fresh per lookup and never cached.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single reported conflict incident.
///
/// All fields default when missing so that partial upstream records still
/// deserialize; a record with no usable date or fatality count simply ranks
/// as stale or low-severity instead of failing the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictEvent {
    /// Unique event identifier within the source dataset.
    #[serde(default)]
    pub event_id_cnty: String,

    /// Event date in `YYYY-MM-DD` form.
    #[serde(default)]
    pub event_date: String,

    /// Event type (Battles, Explosions/Remote violence, etc.).
    #[serde(default)]
    pub event_type: String,

    /// Primary actor name.
    #[serde(default)]
    pub actor1: String,

    /// Country name.
    #[serde(default)]
    pub country: String,

    /// Source dataset's region name.
    #[serde(default)]
    pub region: String,

    /// Location name.
    #[serde(default)]
    pub location: String,

    /// Latitude.
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Longitude.
    #[serde(default)]
    pub longitude: Option<f64>,

    /// Reporting source.
    #[serde(default)]
    pub source: String,

    /// Free-text notes about the event.
    #[serde(default)]
    pub notes: String,

    /// Number of fatalities (never negative upstream).
    #[serde(default)]
    pub fatalities: i64,
}

impl ConflictEvent {
    /// Parse the event date. `None` for anything that is not a valid
    /// `YYYY-MM-DD` calendar date; never panics.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.event_date, "%Y-%m-%d").ok()
    }

    /// Get coordinates as a (lat, lon) tuple.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Response from the event API: a status code and a batch of events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    /// Upstream status code (200 on success).
    #[serde(default)]
    pub status: i64,

    /// The fetched events, in source order.
    #[serde(default)]
    pub data: Vec<ConflictEvent>,
}

/// Coarse severity bucket over the fatality count.
///
/// The three buckets partition the fatality line: a count belongs to exactly
/// one bucket, with boundaries at 10 and 20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBucket {
    /// 20 or more fatalities.
    High,
    /// 10 to 19 fatalities inclusive.
    Medium,
    /// Fewer than 10 fatalities.
    Low,
}

impl SeverityBucket {
    /// Classify a fatality count.
    pub fn of(fatalities: i64) -> Self {
        if fatalities >= 20 {
            SeverityBucket::High
        } else if fatalities >= 10 {
            SeverityBucket::Medium
        } else {
            SeverityBucket::Low
        }
    }

    /// Whether a fatality count falls in this bucket.
    pub fn contains(&self, fatalities: i64) -> bool {
        Self::of(fatalities) == *self
    }

    /// Parse a user-facing label such as "High (20+ casualties)".
    ///
    /// Unknown labels yield `None`, which callers treat as "no filter".
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        if label.starts_with("high") {
            Some(SeverityBucket::High)
        } else if label.starts_with("medium") {
            Some(SeverityBucket::Medium)
        } else if label.starts_with("low") {
            Some(SeverityBucket::Low)
        } else {
            None
        }
    }
}

/// Named recency window for the timeframe filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    LastWeek,
    LastMonth,
    LastThreeMonths,
}

impl Timeframe {
    /// The window length in days.
    pub fn days(&self) -> i64 {
        match self {
            Timeframe::LastWeek => 7,
            Timeframe::LastMonth => 30,
            Timeframe::LastThreeMonths => 90,
        }
    }

    /// Parse a user-facing label such as "Last Week".
    ///
    /// Unknown labels yield `None`, which callers treat as unbounded.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "last week" | "week" => Some(Timeframe::LastWeek),
            "last month" | "month" => Some(Timeframe::LastMonth),
            "last 3 months" | "3 months" | "quarter" => Some(Timeframe::LastThreeMonths),
            _ => None,
        }
    }
}

/// User-selected filters, at most one selection per axis.
///
/// `None` on any axis means "no constraint on this axis". Values are built
/// once from the incoming request and never partially mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Named region from the region lookup table.
    pub region: Option<String>,

    /// Severity bucket over the fatality count.
    pub severity: Option<SeverityBucket>,

    /// Event type, matched case-insensitively.
    pub event_type: Option<String>,

    /// Recency window over the event date.
    pub timeframe: Option<Timeframe>,
}

/// Global average population used for comparisons.
pub const GLOBAL_AVG_POPULATION: f64 = 67_000_000.0;

/// Global average GDP in current US dollars.
pub const GLOBAL_AVG_GDP: f64 = 1_300_000_000_000.0;

/// Global average military expenditure in current US dollars.
pub const GLOBAL_AVG_MILITARY: f64 = 25_000_000_000.0;

/// Country indicator values with comparison helpers.
///
/// Computed fresh per lookup; any indicator the upstream could not provide is
/// `None` and the note records how complete the lookup was.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryStats {
    /// Total population.
    pub population: Option<f64>,

    /// GDP in current US dollars.
    pub gdp: Option<f64>,

    /// Military expenditure in current US dollars.
    pub military_expenditure: Option<f64>,

    /// Human-readable note describing data completeness.
    pub note: String,
}

impl CountryStats {
    /// Build stats from fetched indicator values, deriving the completeness
    /// note from how many of the three are present.
    pub fn new(population: Option<f64>, gdp: Option<f64>, military_expenditure: Option<f64>) -> Self {
        let present = [&population, &gdp, &military_expenditure]
            .iter()
            .filter(|v| v.is_some())
            .count();

        let note = match present {
            3 => "all indicators available".to_string(),
            0 => "no indicator data available".to_string(),
            _ => "some indicators unavailable".to_string(),
        };

        Self {
            population,
            gdp,
            military_expenditure,
            note,
        }
    }

    /// All-null stats with an explanatory note, for countries that could not
    /// be resolved to a code.
    pub fn unavailable(note: &str) -> Self {
        Self {
            population: None,
            gdp: None,
            military_expenditure: None,
            note: note.to_string(),
        }
    }

    /// Compare population to the global average.
    pub fn population_comparison(&self) -> String {
        match self.population {
            Some(value) => format_comparison((value - GLOBAL_AVG_POPULATION) / GLOBAL_AVG_POPULATION * 100.0),
            None => "no population data available".to_string(),
        }
    }

    /// Compare GDP to the global average.
    pub fn gdp_comparison(&self) -> String {
        match self.gdp {
            Some(value) => format_comparison((value - GLOBAL_AVG_GDP) / GLOBAL_AVG_GDP * 100.0),
            None => "no gdp data available".to_string(),
        }
    }

    /// Compare military expenditure to the global average.
    pub fn military_comparison(&self) -> String {
        match self.military_expenditure {
            Some(value) => format_comparison((value - GLOBAL_AVG_MILITARY) / GLOBAL_AVG_MILITARY * 100.0),
            None => "no military expenditure data available".to_string(),
        }
    }
}

fn format_comparison(percentage: f64) -> String {
    if percentage > 0.0 {
        format!("{:.1}% higher than global average", percentage)
    } else if percentage < 0.0 {
        format!("{:.1}% lower than global average", -percentage)
    } else {
        "equal to global average".to_string()
    }
}

/// Summary of conflict activity in one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionOverview {
    /// Region name as reported by the event source.
    pub region: String,

    /// Number of conflicts in the batch.
    pub total_conflicts: usize,

    /// Sum of fatalities across the batch.
    pub total_casualties: i64,

    /// Mean fatalities per conflict (0 for an empty batch).
    pub average_casualties: f64,
}

// ============================================================================
// API request/response types
// ============================================================================

/// Query parameters for GET /conflicts/watchlist.
#[derive(Debug, Deserialize)]
pub struct WatchlistQuery {
    /// Maximum number of entries to return (default: 5).
    #[serde(default = "default_watchlist_limit")]
    pub limit: usize,

    /// Region filter label (e.g. "Middle East"; "All Regions" disables).
    pub region: Option<String>,

    /// Severity filter label (e.g. "High (20+ casualties)" or "high").
    pub severity: Option<String>,

    /// Event type filter (case-insensitive exact match).
    pub event_type: Option<String>,

    /// Timeframe filter label (e.g. "Last Week").
    pub timeframe: Option<String>,
}

fn default_watchlist_limit() -> usize {
    5
}

impl WatchlistQuery {
    /// Resolve the raw labels into filter selections.
    ///
    /// Unknown severity or timeframe labels and the "All Regions" region
    /// label resolve to no constraint on that axis.
    pub fn to_filter_options(&self) -> FilterOptions {
        let region = self
            .region
            .as_ref()
            .filter(|r| !r.is_empty() && !r.eq_ignore_ascii_case("all regions"))
            .cloned();

        FilterOptions {
            region,
            severity: self.severity.as_deref().and_then(SeverityBucket::from_label),
            event_type: self.event_type.clone(),
            timeframe: self.timeframe.as_deref().and_then(Timeframe::from_label),
        }
    }
}

/// Response for GET /conflicts/severe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SevereConflictResponse {
    /// The most severe recent conflict, or null when none qualified.
    pub event: Option<ConflictEvent>,
}

/// Response for GET /conflicts/watchlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistResponse {
    /// Number of entries returned.
    pub count: usize,

    /// Ranked entries, non-increasing by fatality count.
    pub events: Vec<ConflictEvent>,
}

/// Query parameters for GET /conflicts/regional/:country.
#[derive(Debug, Deserialize)]
pub struct RegionalQuery {
    /// Event identifier to exclude from the result (typically the event the
    /// caller is already displaying).
    pub exclude: Option<String>,
}

/// Response for GET /conflicts/regional/:country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionalResponse {
    /// Aggregate view of the region, absent when no region resolved.
    pub overview: Option<RegionOverview>,

    /// Number of events returned.
    pub count: usize,

    /// Same-region events, non-increasing by fatality count.
    pub events: Vec<ConflictEvent>,
}

/// Response for GET /stats/:country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    /// The country that was queried.
    pub country: String,

    /// Indicator values and completeness note.
    pub stats: CountryStats,

    /// Population vs the global average.
    pub population_comparison: String,

    /// GDP vs the global average.
    pub gdp_comparison: String,

    /// Military expenditure vs the global average.
    pub military_comparison: String,
}

impl StatsResponse {
    /// Render a stats lookup for one country.
    pub fn new(country: &str, stats: CountryStats) -> Self {
        Self {
            country: country.to_string(),
            population_comparison: stats.population_comparison(),
            gdp_comparison: stats.gdp_comparison(),
            military_comparison: stats.military_comparison(),
            stats,
        }
    }
}
