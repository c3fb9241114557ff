//! Time-of-day itinerary skeleton

use crate::aggregate::{Activity, AggregateResult, TimeSlot};
use crate::query::TimeOfDay;
use crate::sources::MealType;

pub const MORNING: &str = "Morning (8:00 AM - 12:00 PM)";
pub const AFTERNOON: &str = "Afternoon (12:00 PM - 6:00 PM)";
pub const EVENING: &str = "Evening (6:00 PM - 10:00 PM)";

/// Bucket the aggregate into morning, afternoon and evening slots.
///
/// Always three slots in that order; a slot's activity list may be empty.
/// Items keep the order their source listed them in.
#[must_use]
pub fn compose(aggregate: &AggregateResult) -> Vec<TimeSlot> {
    vec![morning(aggregate), afternoon(aggregate), evening(aggregate)]
}

fn morning(aggregate: &AggregateResult) -> TimeSlot {
    let mut activities = attractions_at(aggregate, &[TimeOfDay::Morning]);
    activities.extend(restaurant_for(aggregate, MealType::Breakfast));
    TimeSlot {
        time_period: MORNING.to_string(),
        activities,
    }
}

fn afternoon(aggregate: &AggregateResult) -> TimeSlot {
    let mut activities = attractions_at(aggregate, &[TimeOfDay::Afternoon, TimeOfDay::Any]);

    let lunch = aggregate
        .dining_near_attractions
        .as_ref()
        .and_then(|matches| matches.first())
        .and_then(|first| first.nearby_restaurants.first())
        .map(|restaurant| Activity::Dining {
            name: format!("Lunch at {}", restaurant.name),
        });
    activities.extend(lunch);

    TimeSlot {
        time_period: AFTERNOON.to_string(),
        activities,
    }
}

fn evening(aggregate: &AggregateResult) -> TimeSlot {
    let mut activities: Vec<Activity> = aggregate
        .events()
        .into_iter()
        .flat_map(|data| data.events.iter())
        .filter(|event| event.time_of_day == TimeOfDay::Evening)
        .take(1)
        .cloned()
        .map(Activity::Event)
        .collect();
    activities.extend(restaurant_for(aggregate, MealType::Dinner));

    TimeSlot {
        time_period: EVENING.to_string(),
        activities,
    }
}

/// Up to two attractions whose best time is one of `times`
fn attractions_at(aggregate: &AggregateResult, times: &[TimeOfDay]) -> Vec<Activity> {
    aggregate
        .attractions()
        .into_iter()
        .flat_map(|data| data.attractions.iter())
        .filter(|attraction| times.contains(&attraction.best_time))
        .take(2)
        .cloned()
        .map(Activity::Attraction)
        .collect()
}

fn restaurant_for(aggregate: &AggregateResult, meal: MealType) -> Option<Activity> {
    aggregate
        .restaurants()?
        .restaurants
        .iter()
        .find(|restaurant| restaurant.serves(meal))
        .cloned()
        .map(Activity::Restaurant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{DiningMatch, NearbyRestaurant};
    use crate::query::{DateRange, Query, Theme};
    use crate::sources::attractions::default_catalog;
    use crate::sources::restaurants;
    use crate::sources::{AttractionsData, RestaurantsData, SourceData};

    fn empty_aggregate() -> AggregateResult {
        let range = DateRange::parse("2025-10-01", "2025-10-05").unwrap();
        AggregateResult::new(&Query::new("Goa", Theme::Any, range).unwrap())
    }

    fn names(slot: &TimeSlot) -> Vec<&str> {
        slot.activities.iter().map(Activity::name).collect()
    }

    #[test]
    fn test_empty_aggregate_still_has_three_slots() {
        let slots = compose(&empty_aggregate());
        let labels: Vec<&str> = slots.iter().map(|s| s.time_period.as_str()).collect();
        assert_eq!(labels, vec![MORNING, AFTERNOON, EVENING]);
        assert!(slots.iter().all(|slot| slot.activities.is_empty()));
    }

    #[test]
    fn test_slots_follow_source_order() {
        let mut aggregate = empty_aggregate();
        let attractions = default_catalog("Goa");
        aggregate.record(SourceData::Attractions(AttractionsData {
            total_count: attractions.len(),
            attractions,
            provider: "test".to_string(),
            quality_score: 0.9,
        }));
        let restaurants = restaurants::default_catalog("Goa");
        aggregate.record(SourceData::Restaurants(RestaurantsData {
            total_count: restaurants.len(),
            quality_score: restaurants::quality_score(&restaurants),
            restaurants,
            provider: "test".to_string(),
        }));
        aggregate.dining_near_attractions = Some(vec![DiningMatch {
            attraction: "Goa Art Gallery".to_string(),
            nearby_restaurants: vec![NearbyRestaurant {
                name: "Goa Street Food Hub".to_string(),
                cuisine: "Street Food".to_string(),
                rating: 4.1,
                price_range: Some("₹".to_string()),
                distance: "3 min walk".to_string(),
            }],
        }]);

        let slots = compose(&aggregate);
        assert_eq!(
            names(&slots[0]),
            vec!["Goa Historical Fort", "Goa Botanical Gardens", "Traditional Goa Kitchen"]
        );
        assert_eq!(
            names(&slots[1]),
            vec!["Goa Art Gallery", "Goa Adventure Park", "Lunch at Goa Street Food Hub"]
        );
        assert_eq!(names(&slots[2]), vec!["Traditional Goa Kitchen"]);
    }
}
