//! Scalar types and the operators legal for each of them.

use std::collections::BTreeSet;

use enum_iterator::Sequence;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The scalar types a whitelisted field can carry.
///
/// Datetime values are stored as epoch seconds and compared numerically,
/// so they share the numeric operator set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Sequence, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Int,
    Float,
    Str,
    Datetime,
}

impl ScalarType {
    const STRING_OPERATORS: &'static [ComparisonOperator] = &[
        ComparisonOperator::Equals,
        ComparisonOperator::Like,
        ComparisonOperator::In,
    ];

    const RANGE_OPERATORS: &'static [ComparisonOperator] = &[
        ComparisonOperator::Equals,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::LessThan,
        ComparisonOperator::GreaterThanOrEqualTo,
        ComparisonOperator::LessThanOrEqualTo,
        ComparisonOperator::Between,
    ];

    /// Returns the complete set of comparison operators for the given type.
    pub fn comparison_operators(&self) -> BTreeSet<ComparisonOperator> {
        match self {
            ScalarType::Str => BTreeSet::from_iter(Self::STRING_OPERATORS.iter().copied()),
            ScalarType::Int | ScalarType::Float | ScalarType::Datetime => {
                BTreeSet::from_iter(Self::RANGE_OPERATORS.iter().copied())
            }
        }
    }

    /// Parse a declared type name from a schema-mapping document.
    pub fn parse(declared: &str) -> Result<ScalarType, UnknownTypeError> {
        match declared {
            "int" => Ok(ScalarType::Int),
            "float" => Ok(ScalarType::Float),
            "str" => Ok(ScalarType::Str),
            "datetime" => Ok(ScalarType::Datetime),
            _ => Err(UnknownTypeError {
                declared: declared.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Str => "str",
            ScalarType::Datetime => "datetime",
        }
    }
}

/// A declared type in the schema-mapping document that we don't recognize.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown declared type '{declared}'")]
pub struct UnknownTypeError {
    pub declared: String,
}

/// The complete list of binary operators accepted in filter conditions.
/// Not all of these are legal for every type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Sequence,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum ComparisonOperator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqualTo,
    #[serde(rename = "<=")]
    LessThanOrEqualTo,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "BETWEEN")]
    Between,
}

impl ComparisonOperator {
    /// The operator's spelling in a request and in generated SQL.
    pub fn name(&self) -> &'static str {
        match self {
            ComparisonOperator::Equals => "=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThanOrEqualTo => ">=",
            ComparisonOperator::LessThanOrEqualTo => "<=",
            ComparisonOperator::Like => "LIKE",
            ComparisonOperator::In => "IN",
            ComparisonOperator::Between => "BETWEEN",
        }
    }
}

/// Operators accepted in HAVING conditions. These compare an aggregation
/// alias against a number and are legal regardless of field type, which is
/// why they form their own closed set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Sequence,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum HavingOperator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqualTo,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqualTo,
}

impl HavingOperator {
    pub fn name(&self) -> &'static str {
        match self {
            HavingOperator::Equals => "=",
            HavingOperator::NotEquals => "!=",
            HavingOperator::LessThan => "<",
            HavingOperator::LessThanOrEqualTo => "<=",
            HavingOperator::GreaterThan => ">",
            HavingOperator::GreaterThanOrEqualTo => ">=",
        }
    }
}

/// The aggregation functions a request may apply to a whitelisted field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateFunction {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

impl AggregateFunction {
    /// Function names are accepted case-insensitively.
    pub fn parse(name: &str) -> Option<AggregateFunction> {
        match name.to_ascii_uppercase().as_str() {
            "SUM" => Some(AggregateFunction::Sum),
            "AVG" => Some(AggregateFunction::Avg),
            "COUNT" => Some(AggregateFunction::Count),
            "MIN" => Some(AggregateFunction::Min),
            "MAX" => Some(AggregateFunction::Max),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }
}

impl<'de> Deserialize<'de> for AggregateFunction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        AggregateFunction::parse(&name).ok_or_else(|| {
            serde::de::Error::custom(format!("unsupported aggregation function '{name}'"))
        })
    }
}
