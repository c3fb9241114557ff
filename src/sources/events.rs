//! Ticketmaster Discovery API events adapter

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Timelike};
use futures::future::join_all;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::error::{Result, SourceError};
use super::{DataSource, Event, EventsData, SourceData, SourceKind};
use crate::config::LiveSourceConfig;
use crate::query::{Query, Theme, TimeOfDay};

const PROVIDER: &str = "Ticketmaster API";
const QUALITY_SCORE: f64 = 0.9;
const PER_CLASSIFICATION: usize = 3;
const MAX_EVENTS: usize = 10;

/// Events adapter backed by Ticketmaster Discovery v2
pub struct EventsSource {
    client: ClientWithMiddleware,
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl EventsSource {
    pub fn new(config: &LiveSourceConfig, client: ClientWithMiddleware) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
        }
    }

    #[instrument(skip(self, api_key, query), fields(city = query.destination()))]
    async fn search_classification(
        &self,
        api_key: &str,
        query: &Query,
        classification: &str,
    ) -> Result<Vec<Value>> {
        let range = query.date_range();
        let url = format!(
            "{}/events.json?apikey={}&city={}&size=10&sort=relevance,desc&startDateTime={}T00:00:00Z&endDateTime={}T23:59:59Z&classificationName={}",
            self.base_url,
            urlencoding::encode(api_key),
            urlencoding::encode(query.destination()),
            range.start.format("%Y-%m-%d"),
            range.end.format("%Y-%m-%d"),
            urlencoding::encode(classification),
        );

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SourceError::request(e, self.timeout))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::upstream(status, &body));
        }

        let page: DiscoveryPage = response.json().await?;
        let events: Vec<Value> = page
            .embedded
            .map(|embedded| embedded.events)
            .unwrap_or_default()
            .into_iter()
            .take(PER_CLASSIFICATION)
            .collect();
        debug!("{} events for classification {}", events.len(), classification);
        Ok(events)
    }
}

/// Ticketmaster classification names searched for a theme
#[must_use]
pub fn classifications(theme: Theme) -> &'static [&'static str] {
    match theme {
        Theme::Cultural => &["Arts & Theatre", "Miscellaneous"],
        Theme::Adventure => &["Sports"],
        Theme::Spiritual => &["Miscellaneous"],
        Theme::Luxury => &["Arts & Theatre", "Music"],
        Theme::Food => &["Miscellaneous"],
        Theme::Any => &["Music", "Sports", "Arts & Theatre", "Film", "Miscellaneous"],
    }
}

/// Format a batch of raw events, skipping the ones that fail to parse
#[must_use]
pub fn format_events(raw: Vec<Value>, theme: Theme, default_date: NaiveDate) -> Vec<Event> {
    raw.into_iter()
        .take(MAX_EVENTS)
        .filter_map(|value| match format_event(value, theme, default_date) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("Skipping malformed event: {}", e);
                None
            }
        })
        .collect()
}

fn format_event(value: Value, theme: Theme, default_date: NaiveDate) -> Result<Event> {
    let raw: RawEvent =
        serde_json::from_value(value).map_err(|e| SourceError::InvalidPayload(e.to_string()))?;

    let start = raw.dates.and_then(|dates| dates.start);
    let time_of_day = match start.as_ref().and_then(|s| s.local_time.as_deref()) {
        Some(local_time) => TimeOfDay::from_hour(parse_local_time(local_time)?.hour()),
        None => TimeOfDay::Evening,
    };
    let date = start.and_then(|s| s.local_date).unwrap_or(default_date);

    let venue = raw
        .embedded
        .and_then(|embedded| embedded.venues.into_iter().next())
        .and_then(|venue| venue.name)
        .unwrap_or_else(|| "Venue TBA".to_string());

    let (price_info, ticket_price) = match raw.price_ranges.first() {
        Some(RawPriceRange {
            min: Some(min),
            max: Some(max),
            currency,
        }) if *min != 0.0 && *max != 0.0 => (
            format!("{} {}-{}", currency.as_deref().unwrap_or("USD"), min, max),
            ((min + max) / 2.0) as u32,
        ),
        _ => ("Price TBA".to_string(), 0),
    };

    let classification = raw
        .classifications
        .into_iter()
        .next()
        .and_then(|c| c.segment)
        .and_then(|segment| segment.name)
        .unwrap_or_else(|| "General".to_string());

    Ok(Event {
        name: raw.name.unwrap_or_else(|| "Unnamed Event".to_string()),
        theme,
        date,
        venue,
        ticket_price,
        price_info,
        description: raw
            .info
            .or(raw.please_note)
            .unwrap_or_else(|| "Event details available on booking".to_string()),
        time_of_day,
        url: raw.url.unwrap_or_default(),
        classification,
    })
}

fn parse_local_time(local_time: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(local_time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(local_time, "%H:%M"))
        .map_err(|_| SourceError::InvalidPayload(format!("unparseable localTime '{local_time}'")))
}

#[async_trait]
impl DataSource for EventsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Events
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    async fn fetch(&self, query: &Query) -> Result<SourceData> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::MissingCredential("Ticketmaster API key".to_string()))?;

        let requests = classifications(query.theme()).iter().map(|classification| async move {
            let page = self.search_classification(api_key, query, classification).await;
            (*classification, page)
        });
        let pages = join_all(requests).await;

        let mut found = Vec::new();
        let mut last_error = None;
        for (classification, page) in pages {
            match page {
                Ok(page) => found.push(page),
                Err(e) => {
                    warn!("Skipping {} events: {}", classification, e);
                    last_error = Some(e);
                }
            }
        }
        if found.is_empty()
            && let Some(e) = last_error
        {
            return Err(e);
        }

        let events = format_events(
            found.into_iter().flatten().collect(),
            query.theme(),
            query.date_range().start,
        );
        if events.is_empty() {
            return Err(SourceError::NoResults(format!(
                "no events found in {}",
                query.destination()
            )));
        }

        info!("Found {} events in {}", events.len(), query.destination());
        Ok(SourceData::Events(EventsData {
            total_count: events.len(),
            events,
            provider: PROVIDER.to_string(),
            quality_score: QUALITY_SCORE,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct DiscoveryPage {
    #[serde(rename = "_embedded")]
    embedded: Option<DiscoveryEmbedded>,
}

#[derive(Debug, Deserialize)]
struct DiscoveryEmbedded {
    #[serde(default)]
    events: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    name: Option<String>,
    dates: Option<RawDates>,
    info: Option<String>,
    please_note: Option<String>,
    url: Option<String>,
    #[serde(default)]
    price_ranges: Vec<RawPriceRange>,
    #[serde(default)]
    classifications: Vec<RawClassification>,
    #[serde(rename = "_embedded")]
    embedded: Option<RawEventEmbedded>,
}

#[derive(Debug, Deserialize)]
struct RawDates {
    start: Option<RawStart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStart {
    local_date: Option<NaiveDate>,
    local_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPriceRange {
    min: Option<f64>,
    max: Option<f64>,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawClassification {
    segment: Option<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEventEmbedded {
    #[serde(default)]
    venues: Vec<RawVenue>,
}

#[derive(Debug, Deserialize)]
struct RawVenue {
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    #[rstest]
    #[case(Theme::Cultural, vec!["Arts & Theatre", "Miscellaneous"])]
    #[case(Theme::Adventure, vec!["Sports"])]
    #[case(Theme::Luxury, vec!["Arts & Theatre", "Music"])]
    #[case(Theme::Any, vec!["Music", "Sports", "Arts & Theatre", "Film", "Miscellaneous"])]
    fn test_theme_classifications(#[case] theme: Theme, #[case] expected: Vec<&str>) {
        assert_eq!(classifications(theme), expected.as_slice());
    }

    #[test]
    fn test_full_event_formatting() {
        let raw = json!({
            "name": "Sunburn Festival",
            "url": "https://example.com/sunburn",
            "info": "Three days of music",
            "dates": {"start": {"localDate": "2025-10-03", "localTime": "19:30:00"}},
            "priceRanges": [{"min": 20.0, "max": 61.0, "currency": "EUR"}],
            "classifications": [{"segment": {"name": "Music"}}],
            "_embedded": {"venues": [{"name": "Vagator Beach"}]}
        });

        let event = format_event(raw, Theme::Any, start()).unwrap();
        assert_eq!(event.venue, "Vagator Beach");
        assert_eq!(event.price_info, "EUR 20-61");
        assert_eq!(event.ticket_price, 40);
        assert_eq!(event.time_of_day, TimeOfDay::Evening);
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2025, 10, 3).unwrap());
        assert_eq!(event.classification, "Music");
        assert_eq!(event.description, "Three days of music");
    }

    #[test]
    fn test_sparse_event_gets_defaults() {
        let event = format_event(json!({"name": "Open Mic"}), Theme::Food, start()).unwrap();
        assert_eq!(event.venue, "Venue TBA");
        assert_eq!(event.price_info, "Price TBA");
        assert_eq!(event.ticket_price, 0);
        assert_eq!(event.time_of_day, TimeOfDay::Evening);
        assert_eq!(event.date, start());
        assert_eq!(event.classification, "General");
        assert_eq!(event.description, "Event details available on booking");
    }

    #[test]
    fn test_zero_price_bound_is_tba() {
        let raw = json!({"name": "Free Walk", "priceRanges": [{"min": 0.0, "max": 10.0}]});
        let event = format_event(raw, Theme::Any, start()).unwrap();
        assert_eq!(event.price_info, "Price TBA");
    }

    #[rstest]
    #[case("09:00:00", TimeOfDay::Morning)]
    #[case("14:15", TimeOfDay::Afternoon)]
    #[case("23:00:00", TimeOfDay::Evening)]
    fn test_local_time_bucketing(#[case] local_time: &str, #[case] expected: TimeOfDay) {
        let raw = json!({"name": "Show", "dates": {"start": {"localTime": local_time}}});
        assert_eq!(format_event(raw, Theme::Any, start()).unwrap().time_of_day, expected);
    }

    #[test]
    fn test_malformed_event_is_skipped() {
        let mut raw: Vec<Value> = (0..5)
            .map(|i| json!({"name": format!("Event {i}"), "dates": {"start": {"localTime": "10:00:00"}}}))
            .collect();
        raw.insert(2, json!({"name": "Broken", "dates": {"start": {"localTime": "late"}}}));

        let events = format_events(raw, Theme::Cultural, start());
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|event| event.name != "Broken"));
    }

    #[test]
    fn test_undeserializable_event_is_skipped() {
        let raw = vec![json!({"name": 42}), json!({"name": "Fine"})];
        assert_eq!(format_events(raw, Theme::Any, start()).len(), 1);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_fast() {
        let config = LiveSourceConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 1,
        };
        let client = crate::http::source_client(reqwest::Client::new());
        let source = EventsSource::new(&config, client);

        let range = crate::query::DateRange::parse("2025-10-01", "2025-10-05").unwrap();
        let query = Query::new("Goa", Theme::Any, range).unwrap();
        let err = source.fetch(&query).await.unwrap_err();
        assert!(matches!(err, SourceError::MissingCredential(_)));
    }
}
