//! HTTP layer - axum router, shared state, and error mapping.
//!
//! The gateway translates validated requests into core calls and maps each
//! domain error to a distinct status code and a structured
//! `{error: {message, code, details?}}` body. Store failures are logged here
//! and surfaced as a generic internal error.

/// Product catalog routes
pub mod products;
/// Purchase ledger routes
pub mod purchases;
/// Field-level request validation for the purchase endpoints
pub mod validation;

use crate::errors::{Error, FieldError, Result};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state available to all request handlers.
/// Holds the database connection handed over at startup; there is no other
/// process-wide state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all store access
    pub database: DatabaseConnection,
}

impl AppState {
    /// Creates the shared handler state around an open database connection.
    #[must_use]
    pub const fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

/// Builds the application router with all API routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/products", get(products::list_products))
        .route(
            "/api/purchases",
            get(purchases::list_purchases).post(purchases::create_purchase),
        )
        .route("/api/purchases/:id/cancel", post(purchases::cancel_purchase))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the API at the given address until the process exits.
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await.map_err(Into::into)
}

/// `GET /api/health` — liveness probe.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    message: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation { .. }
            | Error::InvalidPurchaseId
            | Error::InvalidQuantity { .. }
            | Error::AlreadyCancelled { .. } => StatusCode::BAD_REQUEST,
            Error::ProductNotFound { .. } | Error::PurchaseNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            Error::InsufficientStock { .. } => StatusCode::CONFLICT,
            Error::Config { .. } | Error::Database(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        match &self {
            Error::Database(err) => tracing::error!(error = %err, "store failure while handling request"),
            Error::Config { message } => tracing::error!(error = %message, "configuration failure while handling request"),
            Error::Io(err) => tracing::error!(error = %err, "i/o failure while handling request"),
            Error::ProductNotFound { id } => tracing::warn!(product_id = id, "product not found"),
            Error::PurchaseNotFound { id } => tracing::warn!(purchase_id = id, "purchase not found"),
            Error::AlreadyCancelled { id } => tracing::warn!(purchase_id = id, "purchase already cancelled"),
            _ => {}
        }

        let code = self.code();
        let (message, details) = match self {
            Error::Validation { details } => ("Validation failed".to_string(), Some(details)),
            // Internal detail never reaches the client
            Error::Config { .. } | Error::Database(_) | Error::Io(_) => {
                ("Internal server error".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                message,
                code,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
