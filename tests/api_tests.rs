use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use travel_planner::api::AppState;
use travel_planner::config::AggregatorConfig;
use travel_planner::sources::{AttractionsSource, RestaurantsSource, ReviewsSource};
use travel_planner::{Aggregator, DataSource, web};

fn app() -> axum::Router {
    let sources: Vec<Arc<dyn DataSource>> = vec![
        Arc::new(RestaurantsSource::new()),
        Arc::new(AttractionsSource::new()),
        Arc::new(ReviewsSource::new()),
    ];
    let aggregator = Aggregator::new(sources, &AggregatorConfig::default());
    web::app(AppState::new(aggregator, None))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_themes_lists_every_theme() {
    let (status, body) = send(get("/api/themes")).await;
    assert_eq!(status, StatusCode::OK);

    let themes = body["themes"].as_array().unwrap();
    assert_eq!(themes.len(), 6);
    assert_eq!(themes[0]["name"], "cultural");
    assert!(themes.iter().all(|t| t["description"].is_string()));
}

#[tokio::test]
async fn test_aggregate_returns_enriched_result() {
    let request = post(
        "/api/aggregate",
        json!({
            "destination": "Goa",
            "theme": "cultural",
            "start_date": "2025-10-01",
            "end_date": "2025-10-05"
        }),
    );
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destination"], "Goa");
    assert_eq!(body["theme"], "cultural");
    assert_eq!(body["data_sources_used"].as_array().unwrap().len(), 3);
    assert_eq!(body["integrated_suggestions"].as_array().unwrap().len(), 3);

    let confidence = body["confidence_score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
}

#[tokio::test]
async fn test_aggregate_rejects_unknown_theme() {
    let request = post(
        "/api/aggregate",
        json!({
            "destination": "Goa",
            "theme": "nightlife",
            "start_date": "2025-10-01",
            "end_date": "2025-10-05"
        }),
    );
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("nightlife"));
}

#[tokio::test]
async fn test_aggregate_rejects_reversed_dates() {
    let request = post(
        "/api/aggregate",
        json!({
            "destination": "Goa",
            "start_date": "2025-10-05",
            "end_date": "2025-10-01"
        }),
    );
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_offers_unavailable_without_credentials() {
    let request = post(
        "/api/transport-options",
        json!({
            "origin": "Delhi",
            "destination": "Goa",
            "travel_date": "2030-01-10"
        }),
    );
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);

    let request = post(
        "/api/accommodation-options",
        json!({
            "city": "Goa",
            "checkin_date": "2030-01-10",
            "checkout_date": "2030-01-12"
        }),
    );
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_unsupported_transport_type() {
    let request = post(
        "/api/transport-options",
        json!({
            "origin": "Delhi",
            "destination": "Goa",
            "travel_date": "2030-01-10",
            "transport_type": "hovercraft"
        }),
    );
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
