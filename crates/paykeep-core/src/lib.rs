//! # paykeep-core
//!
//! Core types and use cases for the paykeep payment record service.
//!
//! This crate provides:
//! - `Payment` record model
//! - `PaymentRepository` trait for storage backends
//! - `PaymentService` use-case layer (pagination, conflict checks, timeouts)
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use paykeep_core::{Payment, PaymentService};
//! use std::{sync::Arc, time::Duration};
//!
//! let service = PaymentService::new(Arc::new(repo), Duration::from_secs(2));
//!
//! let draft = Payment::draft("PAY-001", "acme-corp");
//! let stored = service.store(draft).await?;
//!
//! let (page, next_cursor) = service.fetch("", 10).await?;
//! ```

pub mod error;
pub mod payment;
pub mod repository;
pub mod usecase;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use payment::Payment;
pub use repository::{BoxedPaymentRepository, PaymentRepository};
pub use usecase::{PaymentService, DEFAULT_PAGE_SIZE};
