use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;

use super::error::Result;
use super::{DataSource, MealType, Restaurant, RestaurantsData, SourceData, SourceKind};
use crate::query::Query;

const PROVIDER: &str = "Restaurant Reviews API";

/// Destination-templated restaurant listings
#[derive(Debug, Clone, Default)]
pub struct RestaurantsSource {
    latency: Duration,
}

impl RestaurantsSource {
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

/// Destination-templated default listings
#[must_use]
pub fn default_catalog(destination: &str) -> Vec<Restaurant> {
    use MealType::{Breakfast, Dinner, Lunch};
    vec![
        Restaurant {
            name: format!("Traditional {destination} Kitchen"),
            cuisine: "Local".to_string(),
            rating: 4.4,
            price_range: Some("₹₹".to_string()),
            meal_types: BTreeSet::from([Breakfast, Lunch, Dinner]),
            specialties: vec![
                "Local delicacies".to_string(),
                "Traditional sweets".to_string(),
            ],
            location: format!("{destination} Old Town"),
            avg_cost_per_person: 1100,
        },
        Restaurant {
            name: format!("{destination} Rooftop Cafe"),
            cuisine: "Continental".to_string(),
            rating: 4.6,
            price_range: Some("₹₹₹".to_string()),
            meal_types: BTreeSet::from([Breakfast, Lunch, Dinner]),
            specialties: vec![
                "City views".to_string(),
                "International cuisine".to_string(),
            ],
            location: format!("{destination} City Center"),
            avg_cost_per_person: 1800,
        },
        Restaurant {
            name: format!("{destination} Street Food Hub"),
            cuisine: "Street Food".to_string(),
            rating: 4.1,
            price_range: Some("₹".to_string()),
            meal_types: BTreeSet::from([Lunch, Dinner]),
            specialties: vec![
                "Authentic street food".to_string(),
                "Local snacks".to_string(),
            ],
            location: format!("{destination} Market Area"),
            avg_cost_per_person: 400,
        },
    ]
}

/// Richer listings score higher: 0.7 base plus up to 0.15 for price-range coverage
#[must_use]
pub fn quality_score(restaurants: &[Restaurant]) -> f64 {
    if restaurants.is_empty() {
        return 0.7;
    }
    let priced = restaurants
        .iter()
        .filter(|restaurant| restaurant.price_range.is_some())
        .count();
    0.7 + 0.15 * (priced as f64 / restaurants.len() as f64)
}

#[async_trait]
impl DataSource for RestaurantsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Restaurants
    }

    async fn fetch(&self, query: &Query) -> Result<SourceData> {
        super::simulate_latency(self.latency).await;

        let restaurants = default_catalog(query.destination());
        Ok(SourceData::Restaurants(RestaurantsData {
            total_count: restaurants.len(),
            quality_score: quality_score(&restaurants),
            restaurants,
            provider: PROVIDER.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{DateRange, Theme};

    #[tokio::test]
    async fn test_fetch_templates_destination() {
        let range = DateRange::parse("2025-10-01", "2025-10-05").unwrap();
        let query = Query::new("Jaipur", Theme::Food, range).unwrap();

        let SourceData::Restaurants(data) = RestaurantsSource::new().fetch(&query).await.unwrap()
        else {
            panic!("expected restaurants payload");
        };

        assert_eq!(data.total_count, 3);
        assert_eq!(data.restaurants[0].name, "Traditional Jaipur Kitchen");
        assert!(data.restaurants[0].serves(MealType::Breakfast));
        assert!(!data.restaurants[2].serves(MealType::Breakfast));
        assert!((data.quality_score - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_quality_tracks_price_range_presence() {
        let mut restaurants = default_catalog("Goa");
        restaurants[0].price_range = None;
        restaurants[1].price_range = None;
        assert!((quality_score(&restaurants) - 0.75).abs() < 1e-9);
        assert!((quality_score(&[]) - 0.7).abs() < 1e-9);
    }
}
