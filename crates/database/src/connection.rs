use crate::error::{DbError, acquire_error};
use configuration::DatabaseSettings;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::info;

/// Establishes a bounded connection pool to the order database.
///
/// The pool is constructed once at process start and handed to every
/// component that needs it; a failure here is a reported startup error.
/// Underlying transport connections are established lazily up to
/// `max_connections`. A borrow waits at most `acquire_timeout` for a
/// free connection and then fails with `ConnectionUnavailable` — an
/// exhausted pool must never park callers indefinitely.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.database,
        user = %settings.user,
        max_connections = settings.max_connections,
        "creating connection pool"
    );

    let options = PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .database(&settings.database)
        .username(&settings.user)
        .password(&settings.password);

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
        .connect_with(options)
        .await
        .map_err(acquire_error)?;

    Ok(pool)
}
