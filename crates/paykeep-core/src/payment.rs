//! # Payment Record
//!
//! The single entity managed by this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored payment record.
///
/// `id` is the storage-assigned surrogate key; `payment_id` is the
/// caller-supplied business key, unique across all records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Surrogate key, assigned by storage on insert
    #[serde(default)]
    pub id: i64,

    /// Caller-supplied unique business key
    pub payment_id: String,

    /// Owning organisation, free text, mutable
    pub organisation: String,

    /// Refreshed on every successful update
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,

    /// Set once at creation
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Build an unstored candidate record.
    ///
    /// The id is 0 until storage assigns one. Both timestamps are stamped
    /// to the same instant; the storage gateway stamps its own write-time
    /// values into the row regardless of what the candidate carries.
    pub fn draft(payment_id: impl Into<String>, organisation: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            payment_id: payment_id.into(),
            organisation: organisation.into(),
            updated_at: now,
            created_at: now,
        }
    }

    /// True once storage has assigned a key.
    pub fn is_stored(&self) -> bool {
        self.id > 0
    }
}
