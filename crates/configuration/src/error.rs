//! Errors that can be raised while loading configuration.

use query_engine_metadata::metadata::UnknownTypeError;

/// The schema-mapping document could not be read or was not well-formed.
#[derive(Debug, thiserror::Error)]
pub enum ParseConfigurationError {
    #[error("could not read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("could not parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("unsupported configuration version '{0}'")]
    UnsupportedVersion(u32),
}

/// The schema-mapping document is well-formed but inconsistent. Fatal at
/// startup, never raised per-request.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("relation '{relation}' targets undeclared reference table '{target}'")]
    UnknownRelationTarget { relation: String, target: String },

    #[error("field '{0}' is mapped more than once")]
    DuplicateField(String),

    #[error("{0}")]
    UnknownType(#[from] UnknownTypeError),
}
