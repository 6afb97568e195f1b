//! Errors that can be raised while executing a statement.

/// The assembled statement failed at the storage layer. With every request
/// validated before translation this is a defensive case (schema drift,
/// for instance); the failed statement and parameters are logged before
/// this is surfaced, and the statement is never retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("query execution failed: {source}")]
    Query {
        statement: String,
        params: String,
        #[source]
        source: sqlx::Error,
    },
}
