//! # Payment Error Types
//!
//! Typed error handling for the paykeep service.
//! All payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Requested record does not exist
    #[error("payment not found")]
    NotFound,

    /// Duplicate business key on create
    #[error("payment with payment_id {payment_id} already exists")]
    Conflict { payment_id: String },

    /// Underlying storage failure (driver, connectivity, scan)
    #[error("storage error: {0}")]
    Storage(String),

    /// A mutation touched a number of rows other than exactly one.
    /// Treated as a fatal inconsistency, never retried or downgraded
    /// to NotFound.
    #[error("mutation affected {affected} rows, expected exactly 1")]
    RowCountAnomaly { affected: u64 },

    /// The per-operation deadline elapsed before storage responded
    #[error("operation timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// Malformed input, rejected at the transport boundary
    #[error("invalid request: {0}")]
    Validation(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::NotFound => 404,
            PaymentError::Conflict { .. } => 409,
            PaymentError::Validation(_) => 400,
            PaymentError::Storage(_)
            | PaymentError::RowCountAnomaly { .. }
            | PaymentError::Timeout { .. } => 500,
        }
    }

    /// True for failures of the storage layer itself, including the
    /// affected-row anomaly and deadline expiry.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            PaymentError::Storage(_)
                | PaymentError::RowCountAnomaly { .. }
                | PaymentError::Timeout { .. }
        )
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
