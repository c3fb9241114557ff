//! Cross-referencing between source result sets
//!
//! Every derivation reads only the sources it needs and is skipped when one
//! of them is absent. Derived fields are recomputed and overwritten, so
//! enriching an aggregate twice yields the same aggregate.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing::debug;

use crate::aggregate::{
    AggregateResult, ConcurrentEvent, DiningMatch, EventMatch, NearbyRestaurant,
};
use crate::config::ProximityConfig;
use crate::itinerary;
use crate::sources::{Attraction, AttractionType, Event, Restaurant};

const MAX_RESTAURANTS_PER_ATTRACTION: usize = 3;
const MAX_EVENTS_PER_ATTRACTION: usize = 2;
const MAX_TIPS_PER_ATTRACTION: usize = 2;

const INDOOR_ALTERNATIVES: [&str; 4] = [
    "Local museums and galleries",
    "Shopping complexes",
    "Indoor cultural centers",
    "Spas and wellness centers",
];

/// Coarse weather class derived from the provider's free-text description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Rain,
    Storm,
    Hot,
    Sunny,
    Cold,
    Other,
}

impl WeatherCondition {
    #[must_use]
    pub fn classify(description: &str) -> Self {
        let description = description.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|word| description.contains(word));

        if has(&["thunder", "storm"]) {
            WeatherCondition::Storm
        } else if has(&["rain", "drizzle", "shower"]) {
            WeatherCondition::Rain
        } else if has(&["snow", "cold"]) {
            WeatherCondition::Cold
        } else if has(&["hot"]) {
            WeatherCondition::Hot
        } else if has(&["sunny"]) {
            WeatherCondition::Sunny
        } else {
            WeatherCondition::Other
        }
    }

    /// Packing and planning advice for the condition
    #[must_use]
    pub fn recommendations(self) -> Vec<String> {
        let advice: &[&str] = match self {
            WeatherCondition::Rain => &[
                "Pack waterproof clothing",
                "Consider indoor activities",
                "Use ride-sharing services",
            ],
            WeatherCondition::Hot => &[
                "Stay hydrated",
                "Plan outdoor activities for early morning",
                "Seek air-conditioned venues during peak hours",
            ],
            WeatherCondition::Cold => &[
                "Pack warm clothing",
                "Consider hot beverages at local cafes",
                "Indoor sightseeing recommended",
            ],
            _ => &["Enjoy your travel!"],
        };
        advice.iter().map(ToString::to_string).collect()
    }
}

/// Placeholder proximity heuristic.
///
/// Sources carry no coordinates yet, so "nearby" is a weighted coin flip per
/// (attraction, item) pair. With a configured seed the draws restart on
/// every call and are reproducible.
#[derive(Debug, Clone, Copy)]
pub struct ProximityMatcher {
    config: ProximityConfig,
}

impl ProximityMatcher {
    #[must_use]
    pub fn new(config: ProximityConfig) -> Self {
        Self { config }
    }

    fn rng(&self) -> StdRng {
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        StdRng::seed_from_u64(seed)
    }

    /// Restaurants near each attraction; attractions with no match are omitted
    #[must_use]
    pub fn dining(
        &self,
        attractions: &[Attraction],
        restaurants: &[Restaurant],
    ) -> Vec<DiningMatch> {
        let mut rng = self.rng();
        let mut matches = Vec::new();
        for attraction in attractions {
            let mut nearby = Vec::new();
            for restaurant in restaurants {
                if rng.random::<f64>() >= self.config.restaurant_probability {
                    continue;
                }
                nearby.push(NearbyRestaurant {
                    name: restaurant.name.clone(),
                    cuisine: restaurant.cuisine.clone(),
                    rating: restaurant.rating,
                    price_range: restaurant.price_range.clone(),
                    distance: format!("{} min walk", rng.random_range(1..=10)),
                });
            }
            if !nearby.is_empty() {
                nearby.truncate(MAX_RESTAURANTS_PER_ATTRACTION);
                matches.push(DiningMatch {
                    attraction: attraction.name.clone(),
                    nearby_restaurants: nearby,
                });
            }
        }
        matches
    }

    /// Events around each attraction; attractions with no match are omitted
    #[must_use]
    pub fn events(&self, attractions: &[Attraction], events: &[Event]) -> Vec<EventMatch> {
        let mut rng = self.rng();
        let mut matches = Vec::new();
        for attraction in attractions {
            let mut concurrent: Vec<ConcurrentEvent> = events
                .iter()
                .filter(|_| rng.random::<f64>() < self.config.event_probability)
                .map(|event| ConcurrentEvent {
                    name: event.name.clone(),
                    theme: event.theme,
                    date: event.date,
                    venue: event.venue.clone(),
                    ticket_price: event.ticket_price,
                })
                .collect();
            if !concurrent.is_empty() {
                concurrent.truncate(MAX_EVENTS_PER_ATTRACTION);
                matches.push(EventMatch {
                    attraction: attraction.name.clone(),
                    concurrent_events: concurrent,
                });
            }
        }
        matches
    }
}

pub struct CrossReferencer {
    proximity: ProximityMatcher,
}

impl CrossReferencer {
    #[must_use]
    pub fn new(proximity: ProximityConfig) -> Self {
        Self {
            proximity: ProximityMatcher::new(proximity),
        }
    }

    /// Derive relations between the sources present in `aggregate`
    pub fn enrich(&self, aggregate: &mut AggregateResult) {
        if let (Some(attractions), Some(restaurants)) =
            (aggregate.attractions(), aggregate.restaurants())
        {
            let matches = self
                .proximity
                .dining(&attractions.attractions, &restaurants.restaurants);
            debug!("{} attractions with nearby dining", matches.len());
            aggregate.dining_near_attractions = Some(matches);
        }

        if let (Some(attractions), Some(events)) = (aggregate.attractions(), aggregate.events()) {
            let matches = self.proximity.events(&attractions.attractions, &events.events);
            debug!("{} attractions with concurrent events", matches.len());
            aggregate.events_near_attractions = Some(matches);
        }

        apply_local_insights(aggregate);
        apply_weather(aggregate);

        aggregate.integrated_suggestions = Some(itinerary::compose(aggregate));
    }
}

fn apply_local_insights(aggregate: &mut AggregateResult) {
    let Some(guides) = aggregate.local_guides().cloned() else {
        return;
    };

    if let Some(attractions) = aggregate.attractions_mut() {
        for attraction in &mut attractions.attractions {
            let name = attraction.name.to_lowercase();
            let tips: Vec<_> = guides
                .insights
                .iter()
                .filter(|insight| insight.location.to_lowercase().contains(&name))
                .take(MAX_TIPS_PER_ATTRACTION)
                .cloned()
                .collect();
            attraction.local_tips = (!tips.is_empty()).then_some(tips);
        }
    }

    aggregate.hidden_gems = Some(guides.hidden_gems);
    aggregate.local_customs = Some(guides.customs);
}

fn apply_weather(aggregate: &mut AggregateResult) {
    let Some(condition) = aggregate
        .weather()
        .map(|weather| WeatherCondition::classify(&weather.current.condition))
    else {
        return;
    };

    if let Some(attractions) = aggregate.attractions_mut() {
        for attraction in &mut attractions.attractions {
            if attraction.attraction_type != AttractionType::Outdoor {
                continue;
            }
            let (note, alternatives) = match condition {
                WeatherCondition::Rain | WeatherCondition::Storm => (
                    Some("Consider visiting during clear weather"),
                    Some(INDOOR_ALTERNATIVES.iter().map(ToString::to_string).collect()),
                ),
                WeatherCondition::Hot | WeatherCondition::Sunny => {
                    (Some("Best visited early morning or evening"), None)
                }
                WeatherCondition::Cold | WeatherCondition::Other => (None, None),
            };
            attraction.weather_note = note.map(ToString::to_string);
            attraction.alternatives = alternatives;
        }
    }

    aggregate.weather_recommendations = Some(condition.recommendations());
}
