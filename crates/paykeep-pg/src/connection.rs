//! Helpers to create/configure the Postgres pool.

use paykeep_core::{PaymentError, PaymentResult};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

/// Maximum connections held by the pool
const MAX_CONNECTIONS: u32 = 10;

/// Connect a bounded pool to `database_url`.
///
/// An unreachable database here is an unrecoverable initialization
/// failure; callers at the binary level are expected to abort on it.
pub async fn create_pool(database_url: &str) -> PaymentResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
        .map_err(|e| PaymentError::Storage(format!("postgres connect error: {e}")))?;

    info!(max_connections = MAX_CONNECTIONS, "connected to postgres");
    Ok(pool)
}
