//! # Request Handlers
//!
//! Axum request handlers for the payment API.
//!
//! Input validation happens here, before the use-case service is
//! invoked; service failures are mapped to HTTP status codes via
//! `PaymentError::status_code`.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{AppendHeaders, IntoResponse},
    Json,
};
use paykeep_core::{Payment, PaymentError};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Next-cursor response header for paginated listings
pub const CURSOR_HEADER: &str = "x-cursor";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Query parameters for the list endpoint
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Page size; zero, negative, or absent falls back to the default
    #[serde(default)]
    pub num: i64,
    /// Opaque cursor from a previous page's X-Cursor header
    #[serde(default)]
    pub cursor: String,
}

/// Store payment request
#[derive(Debug, Deserialize)]
pub struct StorePaymentRequest {
    #[serde(default)]
    pub payment_id: String,
    #[serde(default)]
    pub organisation: String,
}

/// Partial update request; only the organisation is mutable
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    #[serde(default)]
    pub organisation: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> HandlerError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// Reject blank required fields with a 400 before the service runs.
fn require_non_empty(field: &str, value: &str) -> Result<(), HandlerError> {
    if value.trim().is_empty() {
        return Err(payment_error_to_response(PaymentError::Validation(format!(
            "{field} is required"
        ))));
    }
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "paykeep",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List payments with keyset pagination.
///
/// The next-cursor token travels in the `X-Cursor` response header; an
/// empty value signals the end of the data set.
pub async fn list_payments(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, HandlerError> {
    let (page, next_cursor) = state
        .service
        .fetch(&params.cursor, params.num)
        .await
        .map_err(payment_error_to_response)?;

    Ok((
        AppendHeaders([(CURSOR_HEADER, next_cursor)]),
        Json(page),
    ))
}

/// Get a payment by id
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Payment>, HandlerError> {
    let payment = state
        .service
        .get_by_id(id)
        .await
        .map_err(payment_error_to_response)?;

    Ok(Json(payment))
}

/// Store a new payment
#[instrument(skip(state, request), fields(payment_id = %request.payment_id))]
pub async fn store_payment(
    State(state): State<AppState>,
    Json(request): Json<StorePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), HandlerError> {
    require_non_empty("payment_id", &request.payment_id)?;
    require_non_empty("organisation", &request.organisation)?;

    let stored = state
        .service
        .store(Payment::draft(request.payment_id, request.organisation))
        .await
        .map_err(payment_error_to_response)?;

    info!(id = stored.id, "stored payment");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Partially update a payment's organisation.
///
/// Fetches the current record, applies the field, re-validates, and
/// writes the full record back.
#[instrument(skip(state, request))]
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<Json<Payment>, HandlerError> {
    require_non_empty("organisation", &request.organisation)?;

    let mut payment = state
        .service
        .get_by_id(id)
        .await
        .map_err(payment_error_to_response)?;
    payment.organisation = request.organisation;

    let updated = state
        .service
        .update(payment)
        .await
        .map_err(payment_error_to_response)?;

    info!(id, "updated payment");
    Ok(Json(updated))
}

/// Delete a payment by id
#[instrument(skip(state))]
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    state
        .service
        .delete(id)
        .await
        .map_err(payment_error_to_response)?;

    info!(id, "deleted payment");
    Ok(StatusCode::NO_CONTENT)
}
