use std::time::Duration;

use async_trait::async_trait;

use super::error::Result;
use super::{DataSource, SourceData, SourceKind, TransportData, TransportOption};
use crate::query::Query;

const PROVIDER: &str = "Transport Aggregator";
const QUALITY_SCORE: f64 = 0.8;

/// Indicative flight, train and bus options to the destination
#[derive(Debug, Clone, Default)]
pub struct TransportSource {
    latency: Duration,
}

impl TransportSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

fn option(mode: &str, duration: &str, cost: u32, frequency: &str, window: &str) -> TransportOption {
    TransportOption {
        mode: mode.to_string(),
        duration: duration.to_string(),
        cost,
        frequency: frequency.to_string(),
        booking_window: window.to_string(),
    }
}

#[async_trait]
impl DataSource for TransportSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Transport
    }

    async fn fetch(&self, _query: &Query) -> Result<SourceData> {
        super::simulate_latency(self.latency).await;

        let options = vec![
            option(
                "flight",
                "2 hours",
                6500,
                "Multiple daily",
                "2-3 weeks advance for best rates",
            ),
            option("train", "14 hours", 1400, "Daily", "2 months advance booking opens"),
            option(
                "bus",
                "12 hours",
                1200,
                "Multiple daily",
                "Same day booking available",
            ),
        ];

        Ok(SourceData::Transport(TransportData {
            options,
            provider: PROVIDER.to_string(),
            quality_score: QUALITY_SCORE,
        }))
    }
}
