//! # Payment Repository Trait
//!
//! Storage gateway contract consumed by the use-case layer.
//!
//! Implementations own query execution and nothing else: absence is
//! reported as `Ok(None)`, mutations report affected-row counts, and any
//! driver fault surfaces as `PaymentError::Storage`. Not-found policy,
//! conflict policy, and row-count invariants live in `PaymentService`.

use crate::error::PaymentResult;
use crate::payment::Payment;
use async_trait::async_trait;
use std::sync::Arc;

/// Storage backend contract for payment records.
///
/// The service treats the store as an opaque capability: primary-key
/// lookups and range scans ordered by key are all it relies on. Backends
/// must be safe for concurrent use by multiple callers.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Return up to `limit` records with `id > after_id`, ascending by id.
    async fn fetch(&self, after_id: i64, limit: i64) -> PaymentResult<Vec<Payment>>;

    /// Look up a record by surrogate key.
    async fn find_by_id(&self, id: i64) -> PaymentResult<Option<Payment>>;

    /// Look up a record by business key.
    async fn find_by_payment_id(&self, payment_id: &str) -> PaymentResult<Option<Payment>>;

    /// Insert a new record and return the generated id.
    ///
    /// The backend stamps `created_at` and `updated_at` to its own
    /// write-time clock, ignoring the candidate's values. A unique-key
    /// violation on `payment_id` surfaces as `PaymentError::Conflict`.
    async fn insert(&self, candidate: &Payment) -> PaymentResult<i64>;

    /// Update the record with `payment.id`, returning the affected-row count.
    async fn update(&self, payment: &Payment) -> PaymentResult<u64>;

    /// Delete the record with `id`, returning the affected-row count.
    async fn delete(&self, id: i64) -> PaymentResult<u64>;
}

/// Type alias for a shared repository handle (dynamic dispatch)
pub type BoxedPaymentRepository = Arc<dyn PaymentRepository>;
