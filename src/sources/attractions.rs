use std::time::Duration;

use async_trait::async_trait;

use super::error::Result;
use super::{Attraction, AttractionType, AttractionsData, DataSource, SourceData, SourceKind};
use crate::query::{Query, TimeOfDay};

const PROVIDER: &str = "Attractions Database";
const QUALITY_SCORE: f64 = 0.9;

/// Attraction catalogue filtered by travel theme
#[derive(Debug, Clone, Default)]
pub struct AttractionsSource {
    latency: Duration,
    catalog: Option<Vec<Attraction>>,
}

impl AttractionsSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a fixed catalogue instead of the destination-templated one
    #[must_use]
    pub fn with_catalog(catalog: Vec<Attraction>) -> Self {
        Self {
            latency: Duration::ZERO,
            catalog: Some(catalog),
        }
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[allow(clippy::too_many_arguments)]
fn attraction(
    name: String,
    attraction_type: AttractionType,
    rating: f32,
    entry_fee: u32,
    best_time: TimeOfDay,
    duration: &str,
    description: &str,
    highlights: &[&str],
    location: String,
) -> Attraction {
    Attraction {
        name,
        attraction_type,
        rating,
        entry_fee,
        best_time,
        duration: duration.to_string(),
        description: description.to_string(),
        highlights: highlights.iter().map(ToString::to_string).collect(),
        location,
        local_tips: None,
        weather_note: None,
        alternatives: None,
    }
}

/// Destination-templated default catalogue
#[must_use]
pub fn default_catalog(destination: &str) -> Vec<Attraction> {
    vec![
        attraction(
            format!("{destination} Historical Fort"),
            AttractionType::Historical,
            4.6,
            150,
            TimeOfDay::Morning,
            "2-3 hours",
            "Ancient fort with rich historical significance",
            &["Architecture", "Historical artifacts", "Panoramic views"],
            format!("{destination} Heritage District"),
        ),
        attraction(
            format!("{destination} Art Gallery"),
            AttractionType::Cultural,
            4.3,
            300,
            TimeOfDay::Afternoon,
            "1-2 hours",
            "Contemporary and traditional art exhibitions",
            &["Local artists", "Contemporary art", "Cultural exhibits"],
            format!("{destination} Arts Quarter"),
        ),
        attraction(
            format!("{destination} Adventure Park"),
            AttractionType::Adventure,
            4.6,
            1200,
            TimeOfDay::Any,
            "4-5 hours",
            "Thrilling adventure activities and sports",
            &["Zip lining", "Rock climbing", "Adventure sports"],
            format!("{destination} Outskirts"),
        ),
        attraction(
            format!("{destination} Botanical Gardens"),
            AttractionType::Outdoor,
            4.4,
            50,
            TimeOfDay::Morning,
            "1-2 hours",
            "Landscaped gardens with native and exotic plant collections",
            &["Flower terraces", "Walking trails", "Bird watching"],
            format!("{destination} Green Belt"),
        ),
    ]
}

#[async_trait]
impl DataSource for AttractionsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Attractions
    }

    async fn fetch(&self, query: &Query) -> Result<SourceData> {
        super::simulate_latency(self.latency).await;

        let catalog = match &self.catalog {
            Some(catalog) => catalog.clone(),
            None => default_catalog(query.destination()),
        };
        let theme = query.theme();
        let attractions: Vec<Attraction> = catalog
            .into_iter()
            .filter(|attraction| attraction.attraction_type.matches(theme))
            .collect();

        Ok(SourceData::Attractions(AttractionsData {
            total_count: attractions.len(),
            attractions,
            provider: PROVIDER.to_string(),
            quality_score: QUALITY_SCORE,
        }))
    }
}
