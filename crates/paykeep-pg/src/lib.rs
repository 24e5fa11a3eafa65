//! # paykeep-pg
//!
//! Postgres implementation of the paykeep storage gateway.
//!
//! This crate provides:
//! - `create_pool` for bounded connection pooling
//! - `migrate` for the idempotent schema bootstrap
//! - `PgPaymentRepository` implementing `paykeep_core::PaymentRepository`
//!
//! The gateway owns query execution only. Business policy (not-found,
//! conflict pre-checks, row-count invariants) lives in the core service;
//! the one rule enforced here is the `payment_id` unique constraint,
//! whose violation is reported as `PaymentError::Conflict`.

pub mod connection;
pub mod migrate;
pub mod repository;

// Re-exports for convenience
pub use connection::create_pool;
pub use migrate::migrate;
pub use repository::PgPaymentRepository;
