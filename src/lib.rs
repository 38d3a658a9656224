//! Flashpoint - conflict event monitoring over public REST data sources.
//!
//! # Overview
//!
//! Flashpoint aggregates armed-conflict event data from the ACLED API and
//! macroeconomic indicators from the World Bank API, and serves reduced views
//! over HTTP: the most severe recent conflict, a ranked watchlist of ongoing
//! conflicts, conflicts regionally related to a country, and per-country
//! statistics compared against global averages.
//!
//! Every upstream call fails soft: a network or decode failure degrades to an
//! empty result at the repository boundary instead of surfacing as an error.
//!
//! # Modules
//!
//! - [`model`]: Data types for conflict events, filters, and country statistics
//! - [`filters`]: Pure narrowing of fetched event batches by user filters
//! - [`queries`]: Windowed event queries and their in-memory reductions
//! - [`stats`]: Country statistics lookup with parallel indicator fetches
//! - [`data_sources`]: REST clients for the external APIs
//! - [`api`]: HTTP API handlers

pub mod api;
pub mod data_sources;
pub mod filters;
pub mod model;
pub mod queries;
pub mod stats;
