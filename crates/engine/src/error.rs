//! The engine's public error taxonomy.
//!
//! Malformed requests are not errors here: they come back as data
//! (`QueryOutcome::Invalid`) so callers can render the full list.

use query_engine_translation::translation;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Translation failed on validated input. Only an inconsistent
    /// metadata value can cause this.
    #[error("{0}")]
    Translation(translation::Error),

    /// The statement failed at the storage layer. Logged with its
    /// statement and parameters before being surfaced; never retried.
    #[error(transparent)]
    QueryExecution(#[from] query_engine_execution::Error),
}
