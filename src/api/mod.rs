use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::PlannerError;
use crate::aggregate::AggregateResult;
use crate::aggregator::Aggregator;
use crate::amadeus::{AmadeusClient, FlightOffer, HotelOffer};
use crate::query::{DateRange, Query, Theme};

/// Shared handler state. Offers endpoints answer 503 when Amadeus is not configured.
#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<Aggregator>,
    amadeus: Option<Arc<AmadeusClient>>,
}

impl AppState {
    pub fn new(aggregator: Aggregator, amadeus: Option<AmadeusClient>) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            amadeus: amadeus.map(Arc::new),
        }
    }

    fn amadeus(&self) -> Result<&AmadeusClient, ApiError> {
        self.amadeus.as_deref().ok_or_else(|| {
            ApiError(PlannerError::config(
                "Amadeus credentials are not configured",
            ))
        })
    }
}

/// `PlannerError` rendered as `{"success": false, "error": ...}`
pub struct ApiError(pub PlannerError);

impl From<PlannerError> for ApiError {
    fn from(error: PlannerError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PlannerError::Validation { .. } => StatusCode::BAD_REQUEST,
            PlannerError::Config { .. } => StatusCode::SERVICE_UNAVAILABLE,
            PlannerError::Api { .. } => StatusCode::BAD_GATEWAY,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Rejected request: {}", self.0);
        }

        let body = json!({ "success": false, "error": self.0.user_message() });
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ThemeInfo {
    pub name: Theme,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ThemesResponse {
    pub themes: Vec<ThemeInfo>,
}

#[derive(Debug, Deserialize)]
pub struct AggregateRequest {
    pub destination: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    pub start_date: String,
    pub end_date: String,
}

fn default_theme() -> String {
    Theme::Any.as_str().to_string()
}

#[derive(Debug, Deserialize)]
pub struct TransportRequest {
    pub origin: String,
    pub destination: String,
    pub travel_date: String,
    #[serde(default = "default_transport_type")]
    pub transport_type: String,
    #[serde(default = "default_adults")]
    pub adults: u32,
}

fn default_transport_type() -> String {
    "flight".to_string()
}

fn default_adults() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct TransportResponse {
    pub success: bool,
    pub origin: String,
    pub destination: String,
    pub travel_date: String,
    pub flights: Vec<FlightOffer>,
}

#[derive(Debug, Deserialize)]
pub struct AccommodationRequest {
    pub city: String,
    pub checkin_date: String,
    pub checkout_date: String,
    #[serde(default = "default_budget_range")]
    pub budget_range: String,
}

fn default_budget_range() -> String {
    "mid-range".to_string()
}

#[derive(Debug, Serialize)]
pub struct AccommodationResponse {
    pub success: bool,
    pub city: String,
    pub checkin_date: String,
    pub checkout_date: String,
    pub budget_range: String,
    pub hotels: Vec<HotelOffer>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/themes", get(get_themes))
        .route("/aggregate", post(aggregate))
        .route("/transport-options", post(transport_options))
        .route("/accommodation-options", post(accommodation_options))
        .with_state(state)
}

async fn get_themes() -> Json<ThemesResponse> {
    let themes = Theme::ALL
        .iter()
        .map(|theme| ThemeInfo {
            name: *theme,
            description: theme.description(),
        })
        .collect();
    Json(ThemesResponse { themes })
}

async fn aggregate(
    State(state): State<AppState>,
    Json(request): Json<AggregateRequest>,
) -> Result<Json<AggregateResult>, ApiError> {
    let theme: Theme = request.theme.parse()?;
    let range = DateRange::parse(&request.start_date, &request.end_date)?;
    let query = Query::new(request.destination, theme, range)?;

    Ok(Json(state.aggregator.aggregate(&query).await))
}

async fn transport_options(
    State(state): State<AppState>,
    Json(request): Json<TransportRequest>,
) -> Result<Json<TransportResponse>, ApiError> {
    info!(
        "Transport options {} -> {} on {}",
        request.origin, request.destination, request.travel_date
    );
    if !request.transport_type.eq_ignore_ascii_case("flight") {
        return Err(PlannerError::validation(format!(
            "Unsupported transport type: {}",
            request.transport_type
        ))
        .into());
    }

    let flights = state
        .amadeus()?
        .search_flights(
            &request.origin,
            &request.destination,
            &request.travel_date,
            request.adults,
        )
        .await?;

    Ok(Json(TransportResponse {
        success: true,
        origin: request.origin,
        destination: request.destination,
        travel_date: request.travel_date,
        flights,
    }))
}

async fn accommodation_options(
    State(state): State<AppState>,
    Json(request): Json<AccommodationRequest>,
) -> Result<Json<AccommodationResponse>, ApiError> {
    info!(
        "Accommodation options in {} ({})",
        request.city, request.budget_range
    );
    DateRange::parse(&request.checkin_date, &request.checkout_date)?;

    let hotels = state
        .amadeus()?
        .search_hotels_in_budget(&request.city, &request.budget_range)
        .await?;

    Ok(Json(AccommodationResponse {
        success: true,
        city: request.city,
        checkin_date: request.checkin_date,
        checkout_date: request.checkout_date,
        budget_range: request.budget_range,
        hotels,
    }))
}
