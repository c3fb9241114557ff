//! OpenWeatherMap current conditions and daily forecast adapter

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use super::error::{Result, SourceError};
use super::{CurrentWeather, DailyForecast, DataSource, SourceData, SourceKind, WeatherData};
use crate::config::LiveSourceConfig;
use crate::query::Query;

const PROVIDER: &str = "OpenWeatherMap API";
const QUALITY_SCORE: f64 = 0.95;
/// The forecast endpoint returns 3-hour slots; every 8th is one per day
const SLOTS_PER_DAY: usize = 8;
const FORECAST_DAYS: usize = 5;

pub struct WeatherSource {
    client: ClientWithMiddleware,
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl WeatherSource {
    pub fn new(config: &LiveSourceConfig, client: ClientWithMiddleware) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, api_key: &str, city: &str) -> Result<T> {
        let url = format!(
            "{}/{}?q={}&appid={}&units=metric",
            self.base_url,
            endpoint,
            urlencoding::encode(city),
            urlencoding::encode(api_key),
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
        Ok(response.json().await?)
    }

    #[instrument(skip(self, api_key))]
    async fn current(&self, api_key: &str, city: &str) -> Result<CurrentWeather> {
        let current: OwmCurrent = self.get("weather", api_key, city).await?;
        let condition = current
            .weather
            .first()
            .map(|w| w.description.to_lowercase())
            .ok_or_else(|| SourceError::InvalidPayload("no weather description".to_string()))?;

        Ok(CurrentWeather {
            condition,
            temperature: current.main.temp,
            humidity: current.main.humidity,
            wind_speed: current.wind.map(|w| w.speed).unwrap_or_default(),
        })
    }

    #[instrument(skip(self, api_key))]
    async fn forecast(&self, api_key: &str, city: &str, start: NaiveDate) -> Result<Vec<DailyForecast>> {
        let forecast: OwmForecast = self.get("forecast", api_key, city).await?;
        Ok(daily_forecast(&forecast.list, start))
    }
}

/// One slot per day from the 3-hourly list. The first entry is dated at the trip start.
fn daily_forecast(slots: &[OwmSlot], start: NaiveDate) -> Vec<DailyForecast> {
    slots
        .iter()
        .step_by(SLOTS_PER_DAY)
        .take(FORECAST_DAYS)
        .enumerate()
        .filter_map(|(i, slot)| {
            let date = if i == 0 {
                start
            } else {
                slot.dt_txt
                    .get(..10)
                    .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())?
            };
            let condition = slot.weather.first()?.description.to_lowercase();
            Some(DailyForecast {
                date,
                condition,
                max_temp: slot.main.temp_max,
                min_temp: slot.main.temp_min,
                humidity: slot.main.humidity,
            })
        })
        .collect()
}

#[async_trait]
impl DataSource for WeatherSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Weather
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    async fn fetch(&self, query: &Query) -> Result<SourceData> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::MissingCredential("OpenWeatherMap API key".to_string()))?;
        let city = query.destination();

        let (current, forecast) = tokio::join!(
            self.current(api_key, city),
            self.forecast(api_key, city, query.date_range().start)
        );
        let current = current?;
        let forecast = forecast.unwrap_or_else(|e| {
            warn!("Forecast unavailable for {}: {}", city, e);
            Vec::new()
        });

        info!("Weather in {}: {}, {:.1}°C", city, current.condition, current.temperature);
        Ok(SourceData::Weather(WeatherData {
            current,
            forecast,
            provider: PROVIDER.to_string(),
            quality_score: QUALITY_SCORE,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct OwmCurrent {
    weather: Vec<OwmDescription>,
    main: OwmMain,
    wind: Option<OwmWind>,
}

#[derive(Debug, Deserialize)]
struct OwmDescription {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmForecast {
    list: Vec<OwmSlot>,
}

#[derive(Debug, Deserialize)]
struct OwmSlot {
    dt_txt: String,
    main: OwmSlotMain,
    weather: Vec<OwmDescription>,
}

#[derive(Debug, Deserialize)]
struct OwmSlotMain {
    temp_max: f64,
    temp_min: f64,
    humidity: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: u32, hour: u32) -> OwmSlot {
        OwmSlot {
            dt_txt: format!("2025-10-{day:02} {hour:02}:00:00"),
            main: OwmSlotMain {
                temp_max: 31.0,
                temp_min: 24.0,
                humidity: 70,
            },
            weather: vec![OwmDescription {
                description: "Scattered Clouds".to_string(),
            }],
        }
    }

    #[test]
    fn test_daily_forecast_samples_every_eighth_slot() {
        let slots: Vec<OwmSlot> = (0..40).map(|i| slot(1 + i / 8, (i % 8) * 3)).collect();
        let start = NaiveDate::from_ymd_opt(2025, 9, 30).unwrap();

        let days = daily_forecast(&slots, start);
        assert_eq!(days.len(), 5);
        assert_eq!(days[0].date, start);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2025, 10, 2).unwrap());
        assert_eq!(days[4].date, NaiveDate::from_ymd_opt(2025, 10, 5).unwrap());
        assert_eq!(days[0].condition, "scattered clouds");
    }

    #[test]
    fn test_short_forecast_list() {
        let slots: Vec<OwmSlot> = (0..9).map(|i| slot(1 + i / 8, (i % 8) * 3)).collect();
        let start = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        assert_eq!(daily_forecast(&slots, start).len(), 2);
    }
}
