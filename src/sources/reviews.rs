use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::Result;
use super::{DataSource, Review, ReviewsData, SourceData, SourceKind};
use crate::query::Query;

const PROVIDER: &str = "Reviews Aggregator";
const QUALITY_SCORE: f64 = 0.75;

/// Traveller review summary for a destination
#[derive(Debug, Clone, Default)]
pub struct ReviewsSource {
    latency: Duration,
}

impl ReviewsSource {
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

fn summary(query: &Query) -> ReviewsData {
    let destination = query.destination();
    let theme = query.theme();
    let reviewed_on = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap_or_default();

    ReviewsData {
        overall_rating: 4.4,
        total_reviews: 1250,
        recent_reviews: vec![
            Review {
                rating: 5,
                comment: format!(
                    "Amazing experience in {destination}! Highly recommend the local food."
                ),
                traveler_type: "Family".to_string(),
                date: reviewed_on(15),
            },
            Review {
                rating: 4,
                comment: format!("Great destination for {theme} lovers. Well-organized attractions."),
                traveler_type: "Solo".to_string(),
                date: reviewed_on(10),
            },
        ],
        common_praises: vec![
            "Rich cultural heritage".to_string(),
            "Delicious local cuisine".to_string(),
            "Friendly locals".to_string(),
            "Good value for money".to_string(),
        ],
        common_concerns: vec![
            "Can get crowded during peak season".to_string(),
            "Limited English signage in some areas".to_string(),
            "Traffic congestion in city center".to_string(),
        ],
        provider: PROVIDER.to_string(),
        quality_score: QUALITY_SCORE,
    }
}

#[async_trait]
impl DataSource for ReviewsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Reviews
    }

    async fn fetch(&self, query: &Query) -> Result<SourceData> {
        super::simulate_latency(self.latency).await;
        Ok(SourceData::Reviews(summary(query)))
    }
}
