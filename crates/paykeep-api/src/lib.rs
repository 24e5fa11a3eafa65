//! # paykeep-api
//!
//! HTTP API layer for paykeep-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for payment records
//! - Cursor-based pagination via the `X-Cursor` response header
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/payment?num=N&cursor=C` | List payments (keyset pagination) |
//! | GET | `/payment/{id}` | Get payment by id |
//! | POST | `/payment` | Store a new payment |
//! | PATCH | `/payment/{id}` | Update a payment's organisation |
//! | DELETE | `/payment/{id}` | Delete a payment |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
