//! Schema bootstrap for the payment table.

use paykeep_core::{PaymentError, PaymentResult};
use sqlx::PgPool;
use tracing::info;

// The UNIQUE constraint on payment_id is the authoritative uniqueness
// guard; the service-level pre-check only makes the common case cheap.
const PAYMENT_TABLE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS payment (
    id           BIGSERIAL PRIMARY KEY,
    payment_id   TEXT NOT NULL UNIQUE,
    organisation TEXT NOT NULL,
    updated_at   TIMESTAMPTZ NOT NULL,
    created_at   TIMESTAMPTZ NOT NULL
)
"#;

/// Apply the schema, idempotently. Run once at startup.
pub async fn migrate(pool: &PgPool) -> PaymentResult<()> {
    info!("schema bootstrap start");

    sqlx::query(PAYMENT_TABLE_DDL)
        .execute(pool)
        .await
        .map_err(|e| PaymentError::Storage(format!("schema bootstrap error: {e}")))?;

    info!("schema bootstrap done");
    Ok(())
}
