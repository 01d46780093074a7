//! HTTP API for the basket daemon.
//!
//! Provides REST endpoints for:
//! - Health check
//! - Create or replace a basket
//! - Get a basket
//! - Delete a basket

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use basket_domain::CustomerBasket;
use basket_store::BasketRepository;
use serde::{Deserialize, Serialize};

use crate::controller::BasketController;
use crate::error::{BasketError, ErrorKind};

// =============================================================================
// API State
// =============================================================================

/// Shared state for API handlers.
pub struct ApiState<S: BasketRepository + ?Sized + 'static> {
    pub controller: BasketController<S>,
}

impl<S: BasketRepository + ?Sized + 'static> ApiState<S> {
    /// Build handler state over a store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            controller: BasketController::new(store),
        }
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub code: u16,
    /// Machine-readable kind
    pub error: String,
    /// Error message including its causes
    pub message: String,
}

// =============================================================================
// Router
// =============================================================================

/// Create the API router.
pub fn create_router<S>(state: Arc<ApiState<S>>) -> Router
where
    S: BasketRepository + ?Sized + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/items", post(upsert_handler::<S>))
        .route(
            "/items/:id",
            get(get_handler::<S>).delete(delete_handler::<S>),
        )
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create or replace a basket; responds with the stored basket.
async fn upsert_handler<S>(
    State(state): State<Arc<ApiState<S>>>,
    payload: Result<Json<CustomerBasket>, JsonRejection>,
) -> Result<Json<CustomerBasket>, BasketError>
where
    S: BasketRepository + ?Sized + 'static,
{
    let Json(basket) = payload.map_err(|rejection| BasketError::validation(rejection.body_text()))?;
    let stored = state.controller.upsert(basket).await?;
    Ok(Json(stored))
}

/// Get a basket by customer id.
async fn get_handler<S>(
    State(state): State<Arc<ApiState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerBasket>, BasketError>
where
    S: BasketRepository + ?Sized + 'static,
{
    let basket = state.controller.fetch(&id).await?;
    Ok(Json(basket))
}

/// Delete a basket by customer id.
async fn delete_handler<S>(
    State(state): State<Arc<ApiState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, BasketError>
where
    S: BasketRepository + ?Sized + 'static,
{
    state.controller.remove(&id).await?;
    Ok(StatusCode::OK)
}

// =============================================================================
// Error Mapping
// =============================================================================

impl BasketError {
    /// HTTP status for this error.
    ///
    /// Store failures are reported as 400 with the cause in the body.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation | ErrorKind::Store => StatusCode::BAD_REQUEST,
        }
    }

    fn error_name(&self) -> &'static str {
        match self {
            BasketError::Validation { .. } => "validation_error",
            BasketError::NotFound { .. } => "not_found",
            BasketError::Store { .. } => "store_error",
            BasketError::Confirmation { .. } => "store_confirmation_error",
        }
    }
}

impl IntoResponse for BasketError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: status.as_u16(),
            error: self.error_name().to_string(),
            message: self.chain(),
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Tests
// =============================================================================
