//! The declarative query request as supplied by callers.
//!
//! Every collection defaults to empty so a JSON document only has to spell
//! out the parts it uses. Filter and having values arrive as raw JSON and
//! are type-checked against the whitelist during validation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use query_engine_metadata::metadata::{ComparisonOperator, HavingOperator};

/// A single query over the games schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub filters: Vec<FilterCondition>,
    /// Aggregations keyed by their caller-chosen alias. Iteration order is
    /// insertion order and determines select-list order.
    #[serde(default)]
    pub aggregation: IndexMap<String, AggregationDefinition>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub having: Vec<HavingCondition>,
    #[serde(default)]
    pub sort: Option<SortField>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

/// One WHERE condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub op: ComparisonOperator,
    pub value: serde_json::Value,
}

/// One aggregation: a function applied to a whitelisted field.
///
/// The function arrives as free text so an unsupported name surfaces as a
/// validation error rather than a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationDefinition {
    pub field: String,
    pub function: String,
}

/// One HAVING condition. The field must be an aggregation alias of the
/// same request; the value must be numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HavingCondition {
    pub field: String,
    pub op: HavingOperator,
    pub value: serde_json::Value,
}

/// The sort key and its direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub ascending: bool,
}
