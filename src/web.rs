use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{Json, Router, http::StatusCode, routing::get};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

use crate::aggregator::Aggregator;
use crate::amadeus::AmadeusClient;
use crate::api::{self, AppState};
use crate::config::PlannerConfig;
use crate::http;

const MAX_BODY_BYTES: usize = 64 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Full application router: health check plus the `/api` routes
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api::router(state))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(cors)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

/// Wire the aggregator and offers client from configuration
pub fn build_state(config: &PlannerConfig) -> Result<AppState> {
    let client = http::build_client().context("Failed to build HTTP client")?;
    let aggregator = Aggregator::from_config(config, http::source_client(client.clone()));

    let amadeus = if config.amadeus.has_credentials() {
        Some(
            AmadeusClient::new(&config.amadeus, config.budget, client)
                .context("Failed to configure Amadeus client")?,
        )
    } else {
        warn!("Amadeus credentials missing; transport and accommodation endpoints disabled");
        None
    };

    Ok(AppState::new(aggregator, amadeus))
}

pub async fn run(config: PlannerConfig) -> Result<()> {
    let state = build_state(&config)?;
    let app = app(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    #[cfg(feature = "tls")]
    if let (Some(cert), Some(key)) = (&config.server.tls_cert_path, &config.server.tls_key_path) {
        use axum_server::tls_rustls::RustlsConfig;

        let _ = rustls::crypto::ring::default_provider().install_default();
        let tls = RustlsConfig::from_pem_file(cert, key)
            .await
            .context("Failed to load TLS certificate or key")?;

        let handle = axum_server::Handle::new();
        let shutdown = handle.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        info!("Web server running at https://{}", addr);
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("HTTPS server failed")?;
        return Ok(());
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
