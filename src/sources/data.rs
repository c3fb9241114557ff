//! Per-source payload shapes
//!
//! Each source owns its shape; `SourceData` is the tagged union the
//! aggregator stores. Every payload carries a provider label and a
//! `quality_score` in `[0, 1]`.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::SourceKind;
use crate::query::{Theme, TimeOfDay};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SourceData {
    Events(EventsData),
    Restaurants(RestaurantsData),
    Attractions(AttractionsData),
    LocalGuides(LocalGuidesData),
    Reviews(ReviewsData),
    Weather(WeatherData),
    Transport(TransportData),
    Accommodation(AccommodationData),
}

impl SourceData {
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceData::Events(_) => SourceKind::Events,
            SourceData::Restaurants(_) => SourceKind::Restaurants,
            SourceData::Attractions(_) => SourceKind::Attractions,
            SourceData::LocalGuides(_) => SourceKind::LocalGuides,
            SourceData::Reviews(_) => SourceKind::Reviews,
            SourceData::Weather(_) => SourceKind::Weather,
            SourceData::Transport(_) => SourceKind::Transport,
            SourceData::Accommodation(_) => SourceKind::Accommodation,
        }
    }

    #[must_use]
    pub fn quality_score(&self) -> f64 {
        match self {
            SourceData::Events(d) => d.quality_score,
            SourceData::Restaurants(d) => d.quality_score,
            SourceData::Attractions(d) => d.quality_score,
            SourceData::LocalGuides(d) => d.quality_score,
            SourceData::Reviews(d) => d.quality_score,
            SourceData::Weather(d) => d.quality_score,
            SourceData::Transport(d) => d.quality_score,
            SourceData::Accommodation(d) => d.quality_score,
        }
    }

    #[must_use]
    pub fn provider(&self) -> &str {
        match self {
            SourceData::Events(d) => &d.provider,
            SourceData::Restaurants(d) => &d.provider,
            SourceData::Attractions(d) => &d.provider,
            SourceData::LocalGuides(d) => &d.provider,
            SourceData::Reviews(d) => &d.provider,
            SourceData::Weather(d) => &d.provider,
            SourceData::Transport(d) => &d.provider,
            SourceData::Accommodation(d) => &d.provider,
        }
    }
}

// Events

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsData {
    pub events: Vec<Event>,
    pub total_count: usize,
    pub provider: String,
    pub quality_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub theme: Theme,
    pub date: NaiveDate,
    pub venue: String,
    /// Midpoint of the advertised price range, 0 when unknown
    pub ticket_price: u32,
    pub price_info: String,
    pub description: String,
    pub time_of_day: TimeOfDay,
    pub url: String,
    pub classification: String,
}

// Restaurants

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantsData {
    pub restaurants: Vec<Restaurant>,
    pub total_count: usize,
    pub provider: String,
    pub quality_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub cuisine: String,
    pub rating: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    pub meal_types: BTreeSet<MealType>,
    pub specialties: Vec<String>,
    pub location: String,
    pub avg_cost_per_person: u32,
}

impl Restaurant {
    #[must_use]
    pub fn serves(&self, meal: MealType) -> bool {
        self.meal_types.contains(&meal)
    }
}

// Attractions

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttractionType {
    Historical,
    Cultural,
    Adventure,
    Spiritual,
    Luxury,
    Food,
    Outdoor,
}

impl AttractionType {
    /// Whether an attraction of this type survives the theme filter
    #[must_use]
    pub fn matches(self, theme: Theme) -> bool {
        match theme {
            Theme::Any => true,
            Theme::Cultural => self == AttractionType::Cultural,
            Theme::Adventure => self == AttractionType::Adventure,
            Theme::Spiritual => self == AttractionType::Spiritual,
            Theme::Luxury => self == AttractionType::Luxury,
            Theme::Food => self == AttractionType::Food,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionsData {
    pub attractions: Vec<Attraction>,
    pub total_count: usize,
    pub provider: String,
    pub quality_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub name: String,
    #[serde(rename = "type")]
    pub attraction_type: AttractionType,
    pub rating: f32,
    pub entry_fee: u32,
    pub best_time: TimeOfDay,
    pub duration: String,
    pub description: String,
    pub highlights: Vec<String>,
    pub location: String,
    /// Matching local-guide insights, set during cross-referencing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_tips: Option<Vec<LocalInsight>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<String>>,
}

// Local guides

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalGuidesData {
    pub insights: Vec<LocalInsight>,
    pub hidden_gems: Vec<HiddenGem>,
    pub customs: Vec<String>,
    pub provider: String,
    pub quality_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalInsight {
    pub location: String,
    pub tip: String,
    pub insider_info: String,
    pub guide_rating: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenGem {
    pub name: String,
    #[serde(rename = "type")]
    pub gem_type: String,
    pub description: String,
    pub location: String,
    pub best_time: String,
    pub guide_rating: f32,
}

// Reviews

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewsData {
    pub overall_rating: f32,
    pub total_reviews: u32,
    pub recent_reviews: Vec<Review>,
    pub common_praises: Vec<String>,
    pub common_concerns: Vec<String>,
    pub provider: String,
    pub quality_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub rating: u8,
    pub comment: String,
    pub traveler_type: String,
    pub date: NaiveDate,
}

// Weather

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub current: CurrentWeather,
    pub forecast: Vec<DailyForecast>,
    pub provider: String,
    pub quality_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Lowercased provider description, e.g. "light rain"
    pub condition: String,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub condition: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub humidity: u8,
}

// Transport

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportData {
    pub options: Vec<TransportOption>,
    pub provider: String,
    pub quality_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOption {
    pub mode: String,
    pub duration: String,
    pub cost: u32,
    pub frequency: String,
    pub booking_window: String,
}

// Accommodation

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccommodationData {
    pub options: Vec<Accommodation>,
    pub provider: String,
    pub quality_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accommodation {
    pub name: String,
    #[serde(rename = "type")]
    pub accommodation_type: String,
    pub rating: f32,
    pub price_per_night: u32,
    pub amenities: Vec<String>,
    pub location: String,
    pub availability: String,
}
