//! # Postgres Payment Repository
//!
//! Parameterized queries against the `payment` table. Timestamps are
//! stamped server-side with `now()` on insert, so stored values never
//! depend on what the candidate record carried.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use paykeep_core::{Payment, PaymentError, PaymentRepository, PaymentResult};
use sqlx::PgPool;
use tracing::error;

const SELECT_COLUMNS: &str = "SELECT id, payment_id, organisation, updated_at, created_at FROM payment";

/// Row shape of the `payment` table.
#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    payment_id: String,
    organisation: String,
    updated_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Payment {
            id: row.id,
            payment_id: row.payment_id,
            organisation: row.organisation,
            updated_at: row.updated_at,
            created_at: row.created_at,
        }
    }
}

/// Storage gateway backed by a shared connection pool.
///
/// Cloning is cheap; the pool is internally reference-counted and safe
/// for concurrent use.
#[derive(Clone)]
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_err(context: &str, e: sqlx::Error) -> PaymentError {
    error!("{context}: {e}");
    PaymentError::Storage(format!("{context}: {e}"))
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn fetch(&self, after_id: i64, limit: i64) -> PaymentResult<Vec<Payment>> {
        let query = format!("{SELECT_COLUMNS} WHERE id > $1 ORDER BY id ASC LIMIT $2");

        let rows: Vec<PaymentRow> = sqlx::query_as(&query)
            .bind(after_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_err("fetch payments", e))?;

        Ok(rows.into_iter().map(Payment::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> PaymentResult<Option<Payment>> {
        let query = format!("{SELECT_COLUMNS} WHERE id = $1");

        let row: Option<PaymentRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_err("find payment by id", e))?;

        Ok(row.map(Payment::from))
    }

    async fn find_by_payment_id(&self, payment_id: &str) -> PaymentResult<Option<Payment>> {
        let query = format!("{SELECT_COLUMNS} WHERE payment_id = $1");

        let row: Option<PaymentRow> = sqlx::query_as(&query)
            .bind(payment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_err("find payment by payment_id", e))?;

        Ok(row.map(Payment::from))
    }

    async fn insert(&self, candidate: &Payment) -> PaymentResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO payment (payment_id, organisation, updated_at, created_at)
            VALUES ($1, $2, now(), now())
            RETURNING id
            "#,
        )
        .bind(&candidate.payment_id)
        .bind(&candidate.organisation)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // A racing insert can slip past the service-level pre-check;
            // the unique constraint reports it here.
            let is_unique_violation = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if is_unique_violation {
                PaymentError::Conflict {
                    payment_id: candidate.payment_id.clone(),
                }
            } else {
                storage_err("insert payment", e)
            }
        })?;

        Ok(id)
    }

    async fn update(&self, payment: &Payment) -> PaymentResult<u64> {
        let result = sqlx::query(
            "UPDATE payment SET payment_id = $1, organisation = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(&payment.payment_id)
        .bind(&payment.organisation)
        .bind(payment.updated_at)
        .bind(payment.id)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_err("update payment", e))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> PaymentResult<u64> {
        let result = sqlx::query("DELETE FROM payment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err("delete payment", e))?;

        Ok(result.rows_affected())
    }
}
