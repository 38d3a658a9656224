//! Country statistics lookup.
//!
//! Resolves a country name to its alpha-3 code, fans out the three indicator
//! lookups in parallel, and reports a composite [`CountryStats`]. Each
//! indicator fails soft on its own: a transport error on one leaves the other
//! two untouched.
//!
//! The name-to-code table starts from a small seed map and can be filled once
//! per process from the World Bank country listing; it is the only state this
//! service keeps, and it lives in memory for the process lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::data_sources::world_bank::{
    INDICATOR_GDP, INDICATOR_MILITARY_EXPENDITURE, INDICATOR_POPULATION,
};
use crate::data_sources::WorldBankClient;
use crate::model::CountryStats;

/// Page size used when walking the country listing.
const COUNTRY_PAGE_SIZE: u32 = 300;

/// Repository for country indicator lookups.
#[derive(Clone)]
pub struct StatsRepository {
    client: WorldBankClient,
    codes: Arc<RwLock<HashMap<String, String>>>,
}

impl StatsRepository {
    /// Create a repository seeded with the built-in name-to-code map.
    pub fn new(client: WorldBankClient) -> Self {
        Self {
            client,
            codes: Arc::new(RwLock::new(seed_codes())),
        }
    }

    /// Fill the name-to-code table from the paged country listing.
    ///
    /// Meant to run once at startup; a failure leaves the seed table in
    /// place. Returns the number of names added.
    pub async fn load_country_codes(&self) -> anyhow::Result<usize> {
        let first = self.client.list_countries(COUNTRY_PAGE_SIZE, 1).await?;
        let mut listings = first.countries;

        for page in 2..=first.pages {
            let next = self.client.list_countries(COUNTRY_PAGE_SIZE, page).await?;
            listings.extend(next.countries);
        }

        let mut codes = self.codes.write().await;
        let mut added = 0;
        for listing in listings {
            if listing.id.len() == 3 && !listing.name.is_empty() {
                if codes.insert(listing.name, listing.id).is_none() {
                    added += 1;
                }
            }
        }

        Ok(added)
    }

    /// Resolve a country name to its alpha-3 code.
    pub async fn resolve_code(&self, country: &str) -> Option<String> {
        self.codes.read().await.get(country).cloned()
    }

    /// Look up population, GDP, and military expenditure for a country.
    ///
    /// An unmapped name short-circuits to all-null stats with an explanatory
    /// note and no network call. Mapped names fan out the three indicator
    /// fetches in parallel; each degrades to `None` independently.
    pub async fn get_country_stats(&self, country: &str) -> CountryStats {
        let Some(code) = self.resolve_code(country).await else {
            debug!(country, "no country code mapping");
            return CountryStats::unavailable(&format!("no country code mapping for {country}"));
        };

        let (population, gdp, military_expenditure) = tokio::join!(
            self.fetch_indicator(&code, INDICATOR_POPULATION),
            self.fetch_indicator(&code, INDICATOR_GDP),
            self.fetch_indicator(&code, INDICATOR_MILITARY_EXPENDITURE),
        );

        CountryStats::new(population, gdp, military_expenditure)
    }

    async fn fetch_indicator(&self, code: &str, indicator: &str) -> Option<f64> {
        match self.client.get_indicator(code, indicator).await {
            Ok(value) => value,
            Err(e) => {
                warn!(code, indicator, error = %e, "indicator lookup failed");
                None
            }
        }
    }
}

/// Built-in name-to-code seed map covering the countries the conflict views
/// surface most often.
fn seed_codes() -> HashMap<String, String> {
    [
        ("Israel", "ISR"),
        ("Palestine", "PSE"),
        ("Syria", "SYR"),
        ("Yemen", "YEM"),
        ("Iraq", "IRQ"),
        ("Lebanon", "LBN"),
        ("Ukraine", "UKR"),
        ("Russia", "RUS"),
        ("Belarus", "BLR"),
    ]
    .into_iter()
    .map(|(name, code)| (name.to_string(), code.to_string()))
    .collect()
}
