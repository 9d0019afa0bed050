//! HTTP query service.
//!
//! Exposes the batch probe over HTTP for the bundled web page and for
//! scripted callers:
//!
//! - `POST /api/balance` runs one batch and returns the report envelope
//! - `GET /health` liveness check
//! - `GET /` serves the static query page
//!
//! CORS is permissive so the page can be served from anywhere.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::core::batch::run_batch;
use crate::core::models::{BalanceRequest, ErrorReport};
use crate::core::probe::ProbeSettings;
use crate::error::Result;

static INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Shared state for request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Probe knobs applied to every batch this service runs.
    pub settings: ProbeSettings,
}

impl AppState {
    #[must_use]
    pub const fn new(settings: ProbeSettings) -> Self {
        Self { settings }
    }
}

/// Build the service router.
#[must_use]
pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/balance", post(balance))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve requests on an already-bound listener until shutdown.
///
/// Split from binding so tests can bind port 0 themselves.
///
/// # Errors
///
/// Returns an error if the underlying accept loop fails.
pub async fn run_on_listener(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "msq",
    }))
}

/// Run one probe batch for the request body.
///
/// Malformed requests get 400 with the first violated rule; a batch that ran
/// always returns 200 with per-model outcomes, even when every probe failed.
async fn balance(
    State(state): State<AppState>,
    Json(request): Json<BalanceRequest>,
) -> Response {
    if let Err(e) = request.validate() {
        tracing::debug!(error = %e, "rejecting balance request");
        return (StatusCode::BAD_REQUEST, Json(ErrorReport::new(e.to_string()))).into_response();
    }

    match run_batch(&request.models, &request.api_key, state.settings.clone()).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "batch failed before any probe dispatched");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorReport::new(e.to_string())),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_page_is_embedded() {
        assert!(INDEX_HTML.contains("/api/balance"));
    }

    #[test]
    fn router_builds() {
        let state = AppState::new(ProbeSettings::default());
        let _router = router(state);
    }
}
