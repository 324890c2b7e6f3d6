//! Explicit statement preparation.
//!
//! Every call prepares its fixed SQL text before binding, so a
//! statement the engine rejects surfaces as a distinct
//! `StatementPreparation` failure rather than blending into execution
//! errors. Binding and execution happen on the returned
//! `PgStatement` via `Statement::query`.

use crate::error::{DbError, log_error_chain};
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::postgres::PgStatement;

pub(crate) async fn prepare<'q>(
    conn: &mut PgConnection,
    sql: &'q str,
) -> Result<PgStatement<'q>, DbError> {
    conn.prepare(sql).await.map_err(|err| {
        log_error_chain("preparing statement", &err);
        DbError::StatementPreparation(err)
    })
}
