//! Errors for query validation and translation.

/// A single validation failure. Validation collects every failure in the
/// request rather than stopping at the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no fields requested")]
    NoFields,

    #[error("cannot select * and another field")]
    StarCombinedWithFields,

    #[error("field '{0}' not allowed")]
    FieldNotAllowed(String),

    #[error("sort field '{0}' not allowed")]
    SortFieldNotAllowed(String),

    #[error("filter field '{0}' not allowed")]
    FilterFieldNotAllowed(String),

    #[error("operator '{operator}' not allowed for field '{field}'")]
    OperatorNotAllowed { field: String, operator: String },

    #[error("value for field '{field}' must be of type '{expected}'")]
    ValueTypeMismatch { field: String, expected: String },

    #[error("operator '{operator}' on field '{field}' requires a list of at least two values")]
    ExpectedValueList { field: String, operator: String },

    #[error("operator 'BETWEEN' on field '{field}' requires exactly two values")]
    BetweenRequiresTwoValues { field: String },

    #[error("invalid date format for field '{field}': '{value}'")]
    InvalidDate { field: String, value: String },

    #[error("aggregation field '{0}' not allowed")]
    AggregationFieldNotAllowed(String),

    #[error("aggregation function '{0}' not supported")]
    AggregationFunctionNotSupported(String),

    #[error("group by field '{0}' not allowed")]
    GroupByFieldNotAllowed(String),

    #[error("HAVING field '{0}' must match an aggregation alias")]
    HavingFieldNotAnAlias(String),

    #[error("HAVING value for '{0}' must be numeric")]
    HavingValueNotNumeric(String),

    #[error("limit must be a positive integer")]
    LimitNotPositive,
}

/// Everything wrong with one request, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let ValidationErrors(errors) = self;
        for (index, error) in errors.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A type for translation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// The whitelist routes a field to a table the relation map does not
    /// know. Can only happen on an inconsistent metadata value.
    #[error("relation to table '{0}' is not configured")]
    RelationNotConfigured(String),
}
