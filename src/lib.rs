//! Multi-source travel data aggregation
//!
//! Fans a destination query out to independent data sources concurrently,
//! merges whatever succeeded into one [`AggregateResult`] with a confidence
//! score, derives cross-source relations and composes a time-of-day
//! itinerary skeleton. Flight and hotel offers sit beside the core in
//! [`amadeus`].

pub mod aggregate;
pub mod aggregator;
pub mod amadeus;
pub mod api;
pub mod config;
pub mod cross_reference;
pub mod error;
pub mod http;
pub mod itinerary;
pub mod query;
pub mod sources;
pub mod telemetry;
pub mod web;

pub use aggregate::AggregateResult;
pub use aggregator::Aggregator;
pub use config::PlannerConfig;
pub use error::PlannerError;
pub use query::{DateRange, Query, Theme};
pub use sources::{DataSource, SourceData, SourceError, SourceKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;
