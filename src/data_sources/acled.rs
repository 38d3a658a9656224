//! ACLED (Armed Conflict Location & Event Data) API client.
//!
//! ACLED is the most widely used real-time data source on political violence
//! and protest activity around the world.
//!
//! # API Reference
//!
//! See: <https://acleddata.com/acled-api-documentation>
//!
//! # Authentication
//!
//! Requires registration at <https://acleddata.com/register/> to obtain an
//! API key; every request carries the key and the registered email.

use chrono::{Months, Utc};

use crate::data_sources::SourceError;
use crate::model::EventsResponse;

/// Base URL for the ACLED API.
const ACLED_API_BASE: &str = "https://api.acleddata.com";

/// Maximum results per page accepted by the API.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Page requested when the caller does not page explicitly.
const DEFAULT_PAGE: u32 = 1;

/// Client for querying the ACLED conflict data API.
#[derive(Clone)]
pub struct AcledClient {
    client: reqwest::Client,
    base_url: String,
    email: String,
    api_key: String,
}

impl AcledClient {
    /// Create a new ACLED client.
    ///
    /// # Arguments
    ///
    /// * `email` - Registered email address for ACLED access.
    /// * `api_key` - API key obtained from ACLED registration.
    pub fn new(email: &str, api_key: &str) -> Self {
        Self::with_base_url(ACLED_API_BASE, email, api_key)
    }

    /// Create a client with a custom base URL (for testing).
    pub fn with_base_url(base_url: &str, email: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            email: email.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Build the authentication query string.
    fn auth_params(&self) -> String {
        format!("key={}&email={}", self.api_key, self.email)
    }

    /// Get conflict events within a date range.
    ///
    /// # Arguments
    ///
    /// * `date_range` - `YYYY-MM-DD|YYYY-MM-DD` start and end dates.
    /// * `limit` - Maximum number of events to return (capped upstream at 500).
    pub async fn get_conflicts(&self, date_range: &str, limit: u32) -> anyhow::Result<EventsResponse> {
        let url = format!(
            "{}/acled/read?{}&limit={}&page={}&event_date_where=BETWEEN&event_date={}",
            self.base_url,
            self.auth_params(),
            limit,
            DEFAULT_PAGE,
            urlencoding::encode(date_range),
        );

        let response = self.client.get(&url).send().await?;
        let data = response.json::<EventsResponse>().await?;

        if data.status != 200 {
            return Err(SourceError::Status(data.status).into());
        }

        Ok(data)
    }

    /// Get conflict events from `months_ago` months back up to today.
    pub async fn get_conflicts_in_window(
        &self,
        months_ago: u32,
        limit: u32,
    ) -> anyhow::Result<EventsResponse> {
        self.get_conflicts(&date_range_months(months_ago), limit).await
    }
}

/// Build a `start|end` date range covering the last `months_ago` months.
pub fn date_range_months(months_ago: u32) -> String {
    let end = Utc::now().date_naive();
    let start = end - Months::new(months_ago);
    format!("{}|{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_format() {
        let range = date_range_months(3);
        let parts: Vec<&str> = range.split('|').collect();
        assert_eq!(parts.len(), 2);

        let start = chrono::NaiveDate::parse_from_str(parts[0], "%Y-%m-%d").unwrap();
        let end = chrono::NaiveDate::parse_from_str(parts[1], "%Y-%m-%d").unwrap();
        assert!(start < end);
        assert_eq!(end, Utc::now().date_naive());
    }

    #[test]
    fn test_auth_params() {
        let client = AcledClient::new("analyst@example.org", "secret-key");
        assert_eq!(client.auth_params(), "key=secret-key&email=analyst@example.org");
    }
}
