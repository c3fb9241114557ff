//! Flight and hotel lookups against the Amadeus self-service APIs.
//!
//! These sit beside the aggregation core: they are user-triggered, retry
//! transient failures and report errors instead of degrading silently.

pub mod offers;
pub mod token;

use std::time::Duration;

use chrono::Local;
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::{AuthType, AuthUrl, ClientId, ClientSecret, TokenResponse, TokenUrl};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, instrument};

use crate::PlannerError;
use crate::config::{AmadeusConfig, BudgetThresholds};
use crate::http;

pub use offers::{BudgetRange, FlightEndpoint, FlightOffer, HotelOffer, filter_by_budget};
use token::{IssuedToken, TokenCache};

/// Hotels found within this many kilometres of the city centre
const HOTEL_RADIUS_KM: u32 = 5;

#[derive(Debug, Deserialize)]
struct DataEnvelope {
    #[serde(default)]
    data: Vec<Value>,
}

pub struct AmadeusClient {
    oauth: BasicClient,
    http: ClientWithMiddleware,
    base_url: String,
    timeout: Duration,
    thresholds: BudgetThresholds,
    token: TokenCache,
}

impl AmadeusClient {
    /// Fails with a configuration error when the key or secret is missing
    pub fn new(
        config: &AmadeusConfig,
        thresholds: BudgetThresholds,
        client: reqwest::Client,
    ) -> crate::Result<Self> {
        let (Some(key), Some(secret)) = (config.api_key.as_ref(), config.api_secret.as_ref())
        else {
            return Err(PlannerError::config(
                "Amadeus API key and secret must both be configured",
            ));
        };

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let auth_url = AuthUrl::new(format!("{base_url}/v1/security/oauth2/authorize"))
            .map_err(|e| PlannerError::config(format!("Invalid Amadeus base URL: {e}")))?;
        let token_url = TokenUrl::new(format!("{base_url}/v1/security/oauth2/token"))
            .map_err(|e| PlannerError::config(format!("Invalid Amadeus base URL: {e}")))?;

        let oauth = BasicClient::new(
            ClientId::new(key.clone()),
            Some(ClientSecret::new(secret.clone())),
            auth_url,
            Some(token_url),
        )
        .set_auth_type(AuthType::RequestBody);

        Ok(Self {
            oauth,
            http: http::retrying_client(client, config.max_retries),
            base_url,
            timeout: config.timeout(),
            thresholds,
            token: TokenCache::default(),
        })
    }

    #[must_use]
    pub fn thresholds(&self) -> &BudgetThresholds {
        &self.thresholds
    }

    async fn access_token(&self) -> crate::Result<String> {
        self.token
            .get_or_refresh(|| async {
                let response: BasicTokenResponse = self
                    .oauth
                    .exchange_client_credentials()
                    .request_async(oauth2::reqwest::async_http_client)
                    .await
                    .map_err(|e| {
                        PlannerError::api(format!("Failed to obtain Amadeus access token: {e}"))
                    })?;

                Ok(IssuedToken {
                    access_token: response.access_token().secret().clone(),
                    expires_in: response.expires_in(),
                })
            })
            .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> crate::Result<T> {
        let token = self.access_token().await?;
        let query = params
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}{}?{}", self.base_url, path, query);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PlannerError::api(format!("Request to {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                self.token.invalidate().await;
            }
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            return Err(PlannerError::api(format!("{} - {}", status.as_u16(), excerpt)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PlannerError::api(format!("Unexpected response from {path}: {e}")))
    }

    /// Up to ten priced flight offers for a future departure date (YYYY-MM-DD)
    #[instrument(skip(self), fields(origin = %origin, destination = %destination))]
    pub async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: &str,
        adults: u32,
    ) -> crate::Result<Vec<FlightOffer>> {
        let date = offers::validate_departure(departure_date, Local::now().date_naive())?;
        let origin_code = offers::airport_code(origin, "DEL");
        let destination_code = offers::airport_code(destination, "BOM");

        info!(
            "Searching flights {} -> {} on {}",
            origin_code, destination_code, date
        );

        let params = [
            ("originLocationCode", origin_code.to_string()),
            ("destinationLocationCode", destination_code.to_string()),
            ("departureDate", date.format("%Y-%m-%d").to_string()),
            ("adults", adults.max(1).to_string()),
            ("max", offers::MAX_OFFERS.to_string()),
            ("currencyCode", "INR".to_string()),
            ("nonStop", "false".to_string()),
        ];
        let envelope: DataEnvelope = self
            .get("/v2/shopping/flight-offers", &params)
            .await
            .map_err(|e| PlannerError::api(format!("Flight API error: {}", message_of(e))))?;

        let flights = offers::parse_flight_offers(envelope.data);
        if flights.is_empty() {
            return Err(PlannerError::api(
                "No flights available for the selected route and date",
            ));
        }
        info!("Found {} flight offers", flights.len());
        Ok(flights)
    }

    /// Up to ten hotels near the city centre, with estimated nightly prices
    #[instrument(skip(self), fields(city = %city))]
    pub async fn search_hotels(&self, city: &str) -> crate::Result<Vec<HotelOffer>> {
        let city_code = offers::city_code(city);
        info!("Searching hotels in {} ({})", city, city_code);

        let params = [
            ("cityCode", city_code.to_string()),
            ("radius", HOTEL_RADIUS_KM.to_string()),
            ("radiusUnit", "KM".to_string()),
        ];
        let envelope: DataEnvelope = self
            .get("/v1/reference-data/locations/hotels/by-city", &params)
            .await
            .map_err(|e| PlannerError::api(format!("Hotel API error: {}", message_of(e))))?;

        let hotels = offers::parse_hotels(envelope.data, city);
        if hotels.is_empty() {
            return Err(PlannerError::api(format!("No hotels available in {city}")));
        }
        Ok(hotels)
    }

    /// [`Self::search_hotels`] narrowed to a budget band
    pub async fn search_hotels_in_budget(
        &self,
        city: &str,
        budget_range: &str,
    ) -> crate::Result<Vec<HotelOffer>> {
        let hotels = self.search_hotels(city).await?;
        Ok(filter_by_budget(hotels, budget_range, &self.thresholds))
    }
}

fn message_of(error: PlannerError) -> String {
    match error {
        PlannerError::Api { message } => message,
        other => other.to_string(),
    }
}
