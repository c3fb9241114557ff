//! The aggregate produced for one query and the relations derived from it

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::query::{DateRange, Query, Theme};
use crate::sources::{
    AccommodationData, Attraction, AttractionsData, Event, EventsData, HiddenGem,
    LocalGuidesData, Restaurant, RestaurantsData, ReviewsData, SourceData, SourceKind,
    TransportData, WeatherData,
};

/// Merged result of every successful source for one query.
///
/// Built in place: the aggregator records source payloads and the score,
/// the cross-referencer then fills the derived fields. Serialize-only: an
/// aggregate is only ever produced through [`AggregateResult::record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub destination: String,
    pub theme: Theme,
    pub date_range: DateRange,
    sources: BTreeMap<SourceKind, SourceData>,
    data_sources_used: BTreeSet<SourceKind>,
    pub confidence_score: f64,
    pub last_updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dining_near_attractions: Option<Vec<DiningMatch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_near_attractions: Option<Vec<EventMatch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_gems: Option<Vec<HiddenGem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_customs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_recommendations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrated_suggestions: Option<Vec<TimeSlot>>,
}

impl AggregateResult {
    /// Empty aggregate for a query
    #[must_use]
    pub fn new(query: &Query) -> Self {
        Self {
            destination: query.destination().to_string(),
            theme: query.theme(),
            date_range: query.date_range(),
            sources: BTreeMap::new(),
            data_sources_used: BTreeSet::new(),
            confidence_score: 0.0,
            last_updated: Utc::now(),
            dining_near_attractions: None,
            events_near_attractions: None,
            hidden_gems: None,
            local_customs: None,
            weather_recommendations: None,
            integrated_suggestions: None,
        }
    }

    /// Record a successful source. Keeps `sources` and `data_sources_used` in step.
    pub fn record(&mut self, data: SourceData) {
        let kind = data.kind();
        self.data_sources_used.insert(kind);
        self.sources.insert(kind, data);
    }

    #[must_use]
    pub fn data_sources_used(&self) -> &BTreeSet<SourceKind> {
        &self.data_sources_used
    }

    #[must_use]
    pub fn source(&self, kind: SourceKind) -> Option<&SourceData> {
        self.sources.get(&kind)
    }

    pub fn sources(&self) -> impl Iterator<Item = &SourceData> {
        self.sources.values()
    }

    #[must_use]
    pub fn events(&self) -> Option<&EventsData> {
        match self.sources.get(&SourceKind::Events) {
            Some(SourceData::Events(data)) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn restaurants(&self) -> Option<&RestaurantsData> {
        match self.sources.get(&SourceKind::Restaurants) {
            Some(SourceData::Restaurants(data)) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn attractions(&self) -> Option<&AttractionsData> {
        match self.sources.get(&SourceKind::Attractions) {
            Some(SourceData::Attractions(data)) => Some(data),
            _ => None,
        }
    }

    pub fn attractions_mut(&mut self) -> Option<&mut AttractionsData> {
        match self.sources.get_mut(&SourceKind::Attractions) {
            Some(SourceData::Attractions(data)) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn local_guides(&self) -> Option<&LocalGuidesData> {
        match self.sources.get(&SourceKind::LocalGuides) {
            Some(SourceData::LocalGuides(data)) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn reviews(&self) -> Option<&ReviewsData> {
        match self.sources.get(&SourceKind::Reviews) {
            Some(SourceData::Reviews(data)) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn weather(&self) -> Option<&WeatherData> {
        match self.sources.get(&SourceKind::Weather) {
            Some(SourceData::Weather(data)) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn transport(&self) -> Option<&TransportData> {
        match self.sources.get(&SourceKind::Transport) {
            Some(SourceData::Transport(data)) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn accommodation(&self) -> Option<&AccommodationData> {
        match self.sources.get(&SourceKind::Accommodation) {
            Some(SourceData::Accommodation(data)) => Some(data),
            _ => None,
        }
    }
}

/// Restaurants considered close to one attraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningMatch {
    pub attraction: String,
    pub nearby_restaurants: Vec<NearbyRestaurant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyRestaurant {
    pub name: String,
    pub cuisine: String,
    pub rating: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    /// e.g. "4 min walk"
    pub distance: String,
}

/// Events happening around one attraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMatch {
    pub attraction: String,
    pub concurrent_events: Vec<ConcurrentEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcurrentEvent {
    pub name: String,
    pub theme: Theme,
    pub date: NaiveDate,
    pub venue: String,
    pub ticket_price: u32,
}

/// One itinerary bucket, e.g. "Morning (8:00 AM - 12:00 PM)"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time_period: String,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activity {
    Attraction(Attraction),
    Restaurant(Restaurant),
    Event(Event),
    /// Meal suggestion derived from a nearby-restaurant match
    Dining { name: String },
}

impl Activity {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Activity::Attraction(attraction) => &attraction.name,
            Activity::Restaurant(restaurant) => &restaurant.name,
            Activity::Event(event) => &event.name,
            Activity::Dining { name } => name,
        }
    }
}
