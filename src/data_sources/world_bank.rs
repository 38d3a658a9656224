//! World Bank Open Data API client.
//!
//! Serves country-level macroeconomic indicators keyed by ISO 3166-1 alpha-3
//! country code and indicator code, plus a paged country listing used to map
//! country names to codes.
//!
//! # API Reference
//!
//! See: <https://datahelpdesk.worldbank.org/knowledgebase/topics/125589>
//!
//! # Response Shape
//!
//! Indicator responses are a two-element JSON array: request metadata first,
//! then a list of per-year observations (newest first). With `per_page=1`
//! the first observation carries the latest reported value, which may itself
//! be null for countries that stopped reporting.

use serde::{Deserialize, Serialize};

/// Base URL for the World Bank API.
const WORLD_BANK_API_BASE: &str = "https://api.worldbank.org";

/// Total population indicator code.
pub const INDICATOR_POPULATION: &str = "SP.POP.TOTL";

/// GDP in current US dollars indicator code.
pub const INDICATOR_GDP: &str = "NY.GDP.MKTP.CD";

/// Military expenditure in current US dollars indicator code.
pub const INDICATOR_MILITARY_EXPENDITURE: &str = "MS.MIL.XPND.CD";

/// Client for querying the World Bank Open Data API.
#[derive(Clone)]
pub struct WorldBankClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for WorldBankClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldBankClient {
    /// Create a new World Bank client.
    pub fn new() -> Self {
        Self::with_base_url(WORLD_BANK_API_BASE)
    }

    /// Create a client with a custom base URL (for testing).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Fetch the latest value of one indicator for one country.
    ///
    /// `Ok(None)` when the country reports no value for the indicator;
    /// `Err` only for transport or decode failures.
    pub async fn get_indicator(
        &self,
        country_code: &str,
        indicator: &str,
    ) -> anyhow::Result<Option<f64>> {
        let url = format!(
            "{}/v2/country/{}/indicator/{}?format=json&per_page=1",
            self.base_url,
            country_code.to_uppercase(),
            indicator,
        );

        let response = self.client.get(&url).send().await?;
        let body = response.json::<serde_json::Value>().await?;
        Ok(extract_latest_value(&body))
    }

    /// Fetch one page of the country listing.
    pub async fn list_countries(&self, per_page: u32, page: u32) -> anyhow::Result<CountryPage> {
        let url = format!(
            "{}/v2/country?format=json&per_page={}&page={}",
            self.base_url, per_page, page,
        );

        let response = self.client.get(&url).send().await?;
        let body = response.json::<serde_json::Value>().await?;

        let pages = body
            .get(0)
            .and_then(|meta| meta.get("pages"))
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(1) as u32;

        let countries = body
            .get(1)
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value::<CountryListing>(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        Ok(CountryPage { pages, countries })
    }
}

/// Pull the latest observation's value out of an indicator response body.
fn extract_latest_value(body: &serde_json::Value) -> Option<f64> {
    body.get(1)?.as_array()?.first()?.get("value")?.as_f64()
}

/// One page of the country listing.
#[derive(Debug, Clone)]
pub struct CountryPage {
    /// Total number of pages reported by the API.
    pub pages: u32,

    /// Countries on this page.
    pub countries: Vec<CountryListing>,
}

/// One entry in the country listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryListing {
    /// ISO 3166-1 alpha-3 code.
    #[serde(default)]
    pub id: String,

    /// Country display name.
    #[serde(default)]
    pub name: String,
}
