//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET    /health        - Health check
/// - GET    /payment       - List payments (X-Cursor pagination)
/// - POST   /payment       - Store payment
/// - GET    /payment/{id}  - Get payment by id
/// - PATCH  /payment/{id}  - Update payment organisation
/// - DELETE /payment/{id}  - Delete payment
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - allow all origins, mirroring the permissive
    // middleware this service has always shipped with
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    let payment_routes = Router::new()
        .route(
            "/payment",
            get(handlers::list_payments).post(handlers::store_payment),
        )
        .route(
            "/payment/{id}",
            get(handlers::get_payment)
                .patch(handlers::update_payment)
                .delete(handlers::delete_payment),
        );

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        // Payment resource
        .merge(payment_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
