//! REST clients for the external data sources.
//!
//! # Data Sources
//!
//! - [`acled`]: ACLED (Armed Conflict Location & Event Data) - conflict events
//! - [`world_bank`]: World Bank Open Data - country-level indicators
//!
//! Both clients accept a custom base URL so tests can point them at a local
//! stand-in server.

use thiserror::Error;

pub mod acled;
pub mod world_bank;

pub use acled::AcledClient;
pub use world_bank::WorldBankClient;

/// Failure reported by an upstream source inside an otherwise well-formed
/// response body.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The event source answered with a non-success status code in its body.
    #[error("event source returned status {0}")]
    Status(i64),
}
