//! End-to-end aggregation scenarios with in-process fake sources

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use travel_planner::config::{AggregatorConfig, LiveSourceConfig, ProximityConfig};
use travel_planner::cross_reference::CrossReferencer;
use travel_planner::http;
use travel_planner::itinerary::{AFTERNOON, EVENING, MORNING};
use travel_planner::query::TimeOfDay;
use travel_planner::sources::attractions::default_catalog;
use travel_planner::sources::{
    AccommodationSource, AttractionsSource, CurrentWeather, Event, EventsData,
    LocalGuidesSource, RestaurantsSource, ReviewsSource, TransportSource, WeatherData,
    WeatherSource,
};
use travel_planner::{
    Aggregator, DataSource, DateRange, Query, SourceData, SourceError, SourceKind, Theme,
};

enum Behaviour {
    Succeed(SourceData),
    Fail,
    Panic,
    Hang,
}

struct FakeSource {
    kind: SourceKind,
    behaviour: Behaviour,
}

impl FakeSource {
    fn new(kind: SourceKind, behaviour: Behaviour) -> Arc<dyn DataSource> {
        Arc::new(Self { kind, behaviour })
    }
}

#[async_trait]
impl DataSource for FakeSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn timeout(&self) -> Option<Duration> {
        Some(Duration::from_millis(100))
    }

    async fn fetch(&self, _query: &Query) -> Result<SourceData, SourceError> {
        match &self.behaviour {
            Behaviour::Succeed(data) => Ok(data.clone()),
            Behaviour::Fail => Err(SourceError::Network("connection refused".to_string())),
            Behaviour::Panic => panic!("adapter bug"),
            Behaviour::Hang => std::future::pending().await,
        }
    }
}

fn query(destination: &str, theme: Theme) -> Query {
    let range = DateRange::parse("2025-10-01", "2025-10-05").unwrap();
    Query::new(destination, theme, range).unwrap()
}

fn seeded_config(seed: u64) -> AggregatorConfig {
    AggregatorConfig {
        proximity: ProximityConfig {
            seed: Some(seed),
            ..ProximityConfig::default()
        },
        ..AggregatorConfig::default()
    }
}

fn events_payload() -> SourceData {
    let event = |name: &str, time_of_day| Event {
        name: name.to_string(),
        theme: Theme::Any,
        date: NaiveDate::from_ymd_opt(2025, 10, 2).unwrap(),
        venue: "Kala Academy".to_string(),
        ticket_price: 500,
        price_info: "INR 400-600".to_string(),
        description: "Event details available on booking".to_string(),
        time_of_day,
        url: String::new(),
        classification: "Music".to_string(),
    };
    let events = vec![
        event("Morning Raga", TimeOfDay::Morning),
        event("Sunset Jazz", TimeOfDay::Evening),
    ];
    SourceData::Events(EventsData {
        total_count: events.len(),
        events,
        provider: "Ticketmaster API".to_string(),
        quality_score: 0.9,
    })
}

fn weather_payload(condition: &str) -> SourceData {
    SourceData::Weather(WeatherData {
        current: CurrentWeather {
            condition: condition.to_string(),
            temperature: 27.5,
            humidity: 80,
            wind_speed: 3.2,
        },
        forecast: vec![],
        provider: "OpenWeatherMap API".to_string(),
        quality_score: 0.95,
    })
}

fn fixed_sources() -> Vec<Arc<dyn DataSource>> {
    vec![
        Arc::new(RestaurantsSource::new()),
        Arc::new(AttractionsSource::new()),
        Arc::new(LocalGuidesSource::new()),
        Arc::new(ReviewsSource::new()),
        Arc::new(TransportSource::new()),
        Arc::new(AccommodationSource::new()),
    ]
}

fn all_sources(weather: &str) -> Vec<Arc<dyn DataSource>> {
    let mut sources = fixed_sources();
    sources.push(FakeSource::new(
        SourceKind::Events,
        Behaviour::Succeed(events_payload()),
    ));
    sources.push(FakeSource::new(
        SourceKind::Weather,
        Behaviour::Succeed(weather_payload(weather)),
    ));
    sources
}

fn with_quality(data: SourceData, quality: f64) -> SourceData {
    match data {
        SourceData::Events(mut d) => {
            d.quality_score = quality;
            SourceData::Events(d)
        }
        SourceData::Restaurants(mut d) => {
            d.quality_score = quality;
            SourceData::Restaurants(d)
        }
        SourceData::Attractions(mut d) => {
            d.quality_score = quality;
            SourceData::Attractions(d)
        }
        SourceData::LocalGuides(mut d) => {
            d.quality_score = quality;
            SourceData::LocalGuides(d)
        }
        SourceData::Reviews(mut d) => {
            d.quality_score = quality;
            SourceData::Reviews(d)
        }
        SourceData::Weather(mut d) => {
            d.quality_score = quality;
            SourceData::Weather(d)
        }
        SourceData::Transport(mut d) => {
            d.quality_score = quality;
            SourceData::Transport(d)
        }
        SourceData::Accommodation(mut d) => {
            d.quality_score = quality;
            SourceData::Accommodation(d)
        }
    }
}

#[tokio::test]
async fn test_every_source_failing_still_yields_an_aggregate() {
    let sources = SourceKind::ALL
        .into_iter()
        .map(|kind| FakeSource::new(kind, Behaviour::Fail))
        .collect();
    let aggregator = Aggregator::new(sources, &AggregatorConfig::default());

    let aggregate = aggregator.aggregate(&query("Goa", Theme::Any)).await;

    assert!(aggregate.data_sources_used().is_empty());
    assert!((aggregate.confidence_score - 0.3).abs() < 1e-9);
    assert!(aggregate.dining_near_attractions.is_none());
    assert!(aggregate.weather_recommendations.is_none());

    let slots = aggregate.integrated_suggestions.unwrap();
    let labels: Vec<&str> = slots.iter().map(|s| s.time_period.as_str()).collect();
    assert_eq!(labels, vec![MORNING, AFTERNOON, EVENING]);
    assert!(slots.iter().all(|slot| slot.activities.is_empty()));
}

#[tokio::test]
async fn test_perfect_sources_give_full_confidence() {
    let q = query("Goa", Theme::Any);
    let mut sources = Vec::new();
    for source in all_sources("clear sky") {
        let data = source.fetch(&q).await.unwrap();
        sources.push(FakeSource::new(
            source.kind(),
            Behaviour::Succeed(with_quality(data, 1.0)),
        ));
    }
    let aggregator = Aggregator::new(sources, &AggregatorConfig::default());

    let aggregate = aggregator.aggregate(&q).await;

    assert_eq!(aggregate.data_sources_used().len(), 8);
    assert!((aggregate.confidence_score - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_panicking_and_hanging_sources_are_dropped() {
    let mut sources = fixed_sources();
    sources.push(FakeSource::new(SourceKind::Events, Behaviour::Panic));
    sources.push(FakeSource::new(SourceKind::Weather, Behaviour::Hang));
    let aggregator = Aggregator::new(sources, &AggregatorConfig::default());

    let aggregate = aggregator.aggregate(&query("Goa", Theme::Any)).await;

    let used = aggregate.data_sources_used();
    assert_eq!(used.len(), 6);
    assert!(!used.contains(&SourceKind::Events));
    assert!(!used.contains(&SourceKind::Weather));
    assert!(aggregate.events().is_none());
    assert!(aggregate.weather().is_none());
    assert!((0.0..=1.0).contains(&aggregate.confidence_score));
    assert_eq!(aggregate.integrated_suggestions.unwrap().len(), 3);
}

#[tokio::test]
async fn test_payload_of_the_wrong_kind_is_dropped() {
    let sources = vec![FakeSource::new(
        SourceKind::Events,
        Behaviour::Succeed(weather_payload("clear sky")),
    )];
    let aggregator = Aggregator::new(sources, &AggregatorConfig::default());

    let aggregate = aggregator.aggregate(&query("Goa", Theme::Any)).await;

    assert!(aggregate.data_sources_used().is_empty());
    assert!(aggregate.weather().is_none());
}

#[tokio::test]
async fn test_theme_filter_keeps_only_matching_attractions() {
    let sources: Vec<Arc<dyn DataSource>> =
        vec![Arc::new(AttractionsSource::with_catalog(default_catalog("Goa")))];
    let aggregator = Aggregator::new(sources, &AggregatorConfig::default());

    let aggregate = aggregator.aggregate(&query("Goa", Theme::Adventure)).await;

    let attractions = &aggregate.attractions().unwrap().attractions;
    assert_eq!(attractions.len(), 1);
    assert_eq!(attractions[0].name, "Goa Adventure Park");
}

#[tokio::test]
async fn test_missing_weather_credential_leaves_other_sources_populated() {
    let client = http::source_client(http::build_client().unwrap());
    let weather_config = LiveSourceConfig {
        api_key: None,
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_seconds: 10,
    };

    let mut sources = fixed_sources();
    sources.push(FakeSource::new(
        SourceKind::Events,
        Behaviour::Succeed(events_payload()),
    ));
    sources.push(Arc::new(WeatherSource::new(&weather_config, client)));
    let aggregator = Aggregator::new(sources, &AggregatorConfig::default());

    let aggregate = aggregator.aggregate(&query("Goa", Theme::Any)).await;

    assert_eq!(aggregate.data_sources_used().len(), 7);
    assert!(aggregate.weather().is_none());
    assert!(aggregate.weather_recommendations.is_none());
    assert!(aggregate.hidden_gems.is_some());

    let slots = aggregate.integrated_suggestions.unwrap();
    assert_eq!(slots.len(), 3);
    let evening: Vec<&str> = slots[2].activities.iter().map(|a| a.name()).collect();
    assert_eq!(evening, vec!["Sunset Jazz", "Traditional Goa Kitchen"]);
}

#[tokio::test]
async fn test_rain_flags_outdoor_attractions() {
    let aggregator = Aggregator::new(all_sources("light rain"), &seeded_config(7));

    let aggregate = aggregator.aggregate(&query("Goa", Theme::Any)).await;

    let attractions = &aggregate.attractions().unwrap().attractions;
    let gardens = attractions
        .iter()
        .find(|a| a.name == "Goa Botanical Gardens")
        .unwrap();
    assert_eq!(
        gardens.weather_note.as_deref(),
        Some("Consider visiting during clear weather")
    );
    assert_eq!(gardens.alternatives.as_ref().unwrap().len(), 4);

    let fort = attractions
        .iter()
        .find(|a| a.name == "Goa Historical Fort")
        .unwrap();
    assert!(fort.weather_note.is_none());

    let advice = aggregate.weather_recommendations.unwrap();
    assert!(advice.contains(&"Pack waterproof clothing".to_string()));
}

#[tokio::test]
async fn test_enrich_is_idempotent_with_seeded_proximity() {
    let config = seeded_config(42);
    let aggregator = Aggregator::new(all_sources("sunny"), &config);

    let once = aggregator.aggregate(&query("Goa", Theme::Any)).await;
    let mut twice = once.clone();
    CrossReferencer::new(config.proximity).enrich(&mut twice);

    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_seeded_proximity_is_reproducible_across_runs() {
    let first = Aggregator::new(all_sources("sunny"), &seeded_config(9))
        .aggregate(&query("Goa", Theme::Any))
        .await;
    let second = Aggregator::new(all_sources("sunny"), &seeded_config(9))
        .aggregate(&query("Goa", Theme::Any))
        .await;

    assert_eq!(first.dining_near_attractions, second.dining_near_attractions);
    assert_eq!(first.events_near_attractions, second.events_near_attractions);
}

#[tokio::test]
async fn test_default_sources_without_credentials() {
    let mut config = travel_planner::PlannerConfig::default();
    config.aggregator.synthetic_latency = false;
    config.events.api_key = None;
    config.weather.api_key = None;
    let client = http::source_client(http::build_client().unwrap());

    let aggregator = Aggregator::from_config(&config, client);
    assert_eq!(aggregator.configured_sources(), 8);

    let aggregate = aggregator.aggregate(&query("Jaipur", Theme::Cultural)).await;

    assert_eq!(aggregate.data_sources_used().len(), 6);
    assert!(aggregate.events().is_none());
    // six of eight sources, mean quality of the fixed adapters
    assert!(aggregate.confidence_score > 0.8 && aggregate.confidence_score < 0.85);
}
