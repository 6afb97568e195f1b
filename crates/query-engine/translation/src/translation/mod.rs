pub mod query;

pub use query::error::{Error, ValidationError, ValidationErrors};
pub use query::request::{
    AggregationDefinition, FilterCondition, HavingCondition, QueryRequest, SortField,
};
pub use query::{translate, ExecutionPlan};
