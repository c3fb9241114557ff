use std::time::Duration;

use async_trait::async_trait;

use super::error::Result;
use super::{Accommodation, AccommodationData, DataSource, SourceData, SourceKind};
use crate::query::Query;

const PROVIDER: &str = "Accommodation Booking";
const QUALITY_SCORE: f64 = 0.85;

#[derive(Debug, Clone, Default)]
pub struct AccommodationSource {
    latency: Duration,
}

impl AccommodationSource {
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

#[async_trait]
impl DataSource for AccommodationSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Accommodation
    }

    async fn fetch(&self, query: &Query) -> Result<SourceData> {
        super::simulate_latency(self.latency).await;

        let destination = query.destination();
        let options = vec![
            Accommodation {
                name: format!("{destination} Heritage Hotel"),
                accommodation_type: "hotel".to_string(),
                rating: 4.5,
                price_per_night: 5200,
                amenities: vec![
                    "WiFi".to_string(),
                    "Restaurant".to_string(),
                    "Pool".to_string(),
                    "Spa".to_string(),
                ],
                location: "City Center".to_string(),
                availability: "Available".to_string(),
            },
            Accommodation {
                name: format!("{destination} Backpackers Hostel"),
                accommodation_type: "hostel".to_string(),
                rating: 4.1,
                price_per_night: 900,
                amenities: vec![
                    "WiFi".to_string(),
                    "Common Kitchen".to_string(),
                    "Lounge".to_string(),
                ],
                location: "Tourist Area".to_string(),
                availability: "Available".to_string(),
            },
        ];

        Ok(SourceData::Accommodation(AccommodationData {
            options,
            provider: PROVIDER.to_string(),
            quality_score: QUALITY_SCORE,
        }))
    }
}
