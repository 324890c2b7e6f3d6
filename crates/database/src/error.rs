use thiserror::Error;
use tracing::error;

/// Errors surfaced by the data access layer.
///
/// Each variant keeps the originating engine error as its source, so the
/// full cause chain stays intact for callers. Nothing here is retried
/// automatically; retry policy belongs to the caller.
#[derive(Error, Debug)]
pub enum DbError {
    /// The pool could not hand out a connection: it is exhausted and the
    /// acquire timeout elapsed, or it was never usable to begin with.
    #[error("No database connection available: {0}")]
    ConnectionUnavailable(#[source] sqlx::Error),

    /// The engine rejected the statement text at prepare time.
    #[error("Statement preparation failed: {0}")]
    StatementPreparation(#[source] sqlx::Error),

    /// The engine failed while executing a prepared statement.
    #[error("Statement execution failed: {0}")]
    Execution(#[source] sqlx::Error),

    /// A result row or an embedded composite payload did not match the
    /// schema expected for that call site. Built via `mapping_error`,
    /// never by implicit conversion, so the chain always gets logged.
    #[error("Result mapping failed: {0}")]
    Mapping(#[source] MappingError),
}

/// Why a result row could not be turned into a domain entity.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("composite token {token:?} is missing its {{...}} delimiters")]
    Delimiters { token: String },

    #[error("composite token has {actual} fields, expected {expected}")]
    FieldCount { expected: usize, actual: usize },

    #[error("composite field {index} ({value:?}) is not a valid {target}")]
    Field {
        index: usize,
        value: String,
        target: &'static str,
    },

    #[error("column {column}: {source}")]
    Column {
        column: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("row reports num_legs = {num_legs} but the far-leg data disagrees")]
    LegShape { num_legs: i64 },
}

/// Collects an error's message and every nested cause, outermost first.
pub(crate) fn chain_messages(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut messages = vec![err.to_string()];
    let mut cause = err.source();
    while let Some(c) = cause {
        messages.push(c.to_string());
        cause = c.source();
    }
    messages
}

/// Logs an error and every nested cause, outermost first.
///
/// The engine chains causes for compound failures (e.g. a batch where
/// several statements were rejected); each link is logged before the
/// error is wrapped and propagated.
pub(crate) fn log_error_chain(context: &str, err: &(dyn std::error::Error + 'static)) {
    for (depth, message) in chain_messages(err).into_iter().enumerate() {
        if depth == 0 {
            error!("{context}: {message}");
        } else {
            error!("{context}: caused by: {message}");
        }
    }
}

/// Maps a pool-acquire failure, logging its chain first.
pub(crate) fn acquire_error(err: sqlx::Error) -> DbError {
    log_error_chain("borrowing pooled connection", &err);
    DbError::ConnectionUnavailable(err)
}

/// Maps an execution failure, logging its chain first.
pub(crate) fn execution_error(err: sqlx::Error) -> DbError {
    log_error_chain("executing statement", &err);
    DbError::Execution(err)
}

/// Maps a result-mapping failure, logging its chain first.
pub(crate) fn mapping_error(err: MappingError) -> DbError {
    log_error_chain("mapping result row", &err);
    DbError::Mapping(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::error::Error as _;

    #[test]
    fn mapping_error_wraps_and_keeps_the_cause() {
        let err = mapping_error(MappingError::FieldCount {
            expected: 12,
            actual: 3,
        });
        assert!(matches!(err, DbError::Mapping(_)));
        let cause = err.source().expect("the inner mapping failure is the source");
        assert!(cause.to_string().contains("expected 12"));
    }

    #[test]
    fn chain_walk_reports_every_cause_outermost_first() {
        let err = mapping_error(MappingError::Delimiters {
            token: "1,true,ACC1".to_string(),
        });
        let messages = chain_messages(&err);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("Result mapping failed"));
        assert!(messages[1].contains("missing its {...} delimiters"));
    }

    #[test]
    fn display_keeps_the_inner_message() {
        let err = MappingError::Delimiters {
            token: "a,b,c".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("a,b,c"));
        assert!(msg.contains("{...}"));
    }
}
