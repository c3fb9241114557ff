//! Travel data sources
//!
//! This module provides the eight source adapters the aggregator fans out to:
//! - Live API adapters (Ticketmaster events, OpenWeatherMap weather)
//! - Fixed-shape adapters (restaurants, attractions, local guides, reviews,
//!   transport, accommodation) with synthetic latency
//!
//! Every adapter implements [`DataSource`]; a failure is reported as a
//! [`SourceError`] and never escapes the aggregator.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::query::Query;

pub mod accommodation;
pub mod attractions;
pub mod data;
pub mod error;
pub mod events;
pub mod local_guides;
pub mod restaurants;
pub mod reviews;
pub mod transport;
pub mod weather;

pub use accommodation::AccommodationSource;
pub use attractions::AttractionsSource;
pub use data::*;
pub use error::SourceError;
pub use events::EventsSource;
pub use local_guides::LocalGuidesSource;
pub use restaurants::RestaurantsSource;
pub use reviews::ReviewsSource;
pub use transport::TransportSource;
pub use weather::WeatherSource;

/// Identity of a data source
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Events,
    Restaurants,
    Attractions,
    LocalGuides,
    Reviews,
    Weather,
    Transport,
    Accommodation,
}

impl SourceKind {
    pub const ALL: [SourceKind; 8] = [
        SourceKind::Events,
        SourceKind::Restaurants,
        SourceKind::Attractions,
        SourceKind::LocalGuides,
        SourceKind::Reviews,
        SourceKind::Weather,
        SourceKind::Transport,
        SourceKind::Accommodation,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Events => "events",
            SourceKind::Restaurants => "restaurants",
            SourceKind::Attractions => "attractions",
            SourceKind::LocalGuides => "local_guides",
            SourceKind::Reviews => "reviews",
            SourceKind::Weather => "weather",
            SourceKind::Transport => "transport",
            SourceKind::Accommodation => "accommodation",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform fetch contract shared by all adapters
#[async_trait]
pub trait DataSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Upper bound for a single fetch; `None` uses the aggregator default
    fn timeout(&self) -> Option<Duration> {
        None
    }

    async fn fetch(&self, query: &Query) -> error::Result<SourceData>;
}

/// Sleep standing in for provider round-trip time in the fixed-data adapters
pub(crate) async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

/// Build all eight adapters from configuration, sharing one HTTP client
#[must_use]
pub fn default_sources(
    config: &PlannerConfig,
    client: ClientWithMiddleware,
) -> Vec<Arc<dyn DataSource>> {
    let latency = |default_ms: u64| {
        if config.aggregator.synthetic_latency {
            Duration::from_millis(default_ms)
        } else {
            Duration::ZERO
        }
    };

    vec![
        Arc::new(EventsSource::new(&config.events, client.clone())),
        Arc::new(RestaurantsSource::new().with_latency(latency(400))),
        Arc::new(AttractionsSource::new().with_latency(latency(500))),
        Arc::new(LocalGuidesSource::new().with_latency(latency(200))),
        Arc::new(ReviewsSource::new().with_latency(latency(300))),
        Arc::new(WeatherSource::new(&config.weather, client)),
        Arc::new(TransportSource::new().with_latency(latency(400))),
        Arc::new(AccommodationSource::new().with_latency(latency(500))),
    ]
}
