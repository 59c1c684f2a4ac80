//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::cache::CacheError;
use crate::planner::RouteError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stations", get(list_stations))
        .route("/api/itineraire/:lat1/:lon1/:lat2/:lon2", post(plan_route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Classified stations, from cache when fresh.
async fn list_stations(State(state): State<AppState>) -> Result<Json<StationsResponse>, AppError> {
    let snapshot = state.stations.get(Utc::now()).await?;
    Ok(Json(StationsResponse::from_snapshot(&snapshot)))
}

/// Route between two points for the mode given in the JSON body.
async fn plan_route(
    State(state): State<AppState>,
    Path((lat1, lon1, lat2, lon2)): Path<(f64, f64, f64, f64)>,
    body: Bytes,
) -> Result<Json<RouteResponse>, AppError> {
    // Parse JSON manually so an empty body means "no mode" and bad bodies are logged
    let req: RouteRequest = if body.is_empty() {
        RouteRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            warn!(body = %String::from_utf8_lossy(&body), "invalid route request JSON: {e}");
            AppError::BadRequest {
                message: format!("Invalid JSON: {e}"),
            }
        })?
    };

    // Shortest-path search is CPU-bound; keep it off the async workers
    let planner = state.planner.clone();
    let route = tokio::task::spawn_blocking(move || planner.plan(lat1, lon1, lat2, lon2, &req.mode))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("route task failed: {e}"),
        })??;

    Ok(Json(RouteResponse::from_route(&route)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        AppError::Unavailable {
            message: e.to_string(),
        }
    }
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        let message = e.to_string();
        match e {
            RouteError::UnknownMode(_) | RouteError::InvalidCoordinate(_) => {
                AppError::BadRequest { message }
            }
            RouteError::NoPathFound { .. } => AppError::NotFound { message },
            RouteError::EmptyGraph { .. } => AppError::Internal { message },
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Unavailable { message }
            | AppError::Internal { message } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = self.message().to_string();

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            warn!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
