//! Validate a query request against the whitelist.
//!
//! Every rule is checked and every failure collected; validation never
//! stops at the first bad input and never panics on one. The output is a
//! fully resolved, fully typed request, so the clause builders downstream
//! are total functions with no error paths of their own.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use query_engine_metadata::metadata::{
    AggregateFunction, ComparisonOperator, HavingOperator, Whitelist,
};

use super::error::{ValidationError, ValidationErrors};
use super::request::QueryRequest;
use super::values::{typecheck_numeric, typecheck_value, NumericValue, TypedValue};

/// A request that has passed every validation rule, with each field
/// resolved to its physical routing and each value typed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub fields: Fields,
    pub filters: Vec<TypedFilter>,
    pub aggregation: IndexMap<String, Aggregate>,
    pub group_by: Vec<ResolvedField>,
    pub having: Vec<TypedHaving>,
    pub sort: Option<ResolvedSort>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// The select list: everything, or a resolved field list.
#[derive(Debug, Clone, PartialEq)]
pub enum Fields {
    Star,
    List(Vec<ResolvedField>),
}

/// An api field together with the table and column the whitelist routes
/// it to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub api_field: String,
    pub table: String,
    pub column: String,
}

/// A filter whose operator and value have been checked against the
/// whitelist, shaped by operator so translation has no impossible cases.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedFilter {
    pub field: ResolvedField,
    pub kind: FilterKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterKind {
    Compare {
        operator: ComparisonOperator,
        value: TypedValue,
    },
    Between {
        lower: TypedValue,
        upper: TypedValue,
    },
    In(Vec<TypedValue>),
}

/// A checked aggregation entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub field: ResolvedField,
    pub function: AggregateFunction,
}

/// A checked HAVING condition.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedHaving {
    pub alias: String,
    pub operator: HavingOperator,
    pub value: NumericValue,
}

/// A checked sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSort {
    pub field: ResolvedField,
    pub ascending: bool,
}

fn resolve(whitelist: &Whitelist, api_field: &str) -> Option<ResolvedField> {
    whitelist.lookup(api_field).map(|descriptor| ResolvedField {
        api_field: api_field.to_string(),
        table: descriptor.table.clone(),
        column: descriptor.column.clone(),
    })
}

/// Validate a request. Returns the resolved request, or every rule
/// violation found in it.
pub fn validate(
    whitelist: &Whitelist,
    request: &QueryRequest,
) -> Result<ValidatedRequest, ValidationErrors> {
    let mut errors = Vec::new();

    // fields must be non-empty, and '*' may not be combined with others
    let star = request.fields.iter().any(|field| field == "*");
    let fields = if request.fields.is_empty() {
        errors.push(ValidationError::NoFields);
        Fields::List(vec![])
    } else if star {
        if request.fields.len() > 1 {
            errors.push(ValidationError::StarCombinedWithFields);
        }
        Fields::Star
    } else {
        let mut resolved = Vec::new();
        for field in &request.fields {
            match resolve(whitelist, field) {
                Some(field) => resolved.push(field),
                None => errors.push(ValidationError::FieldNotAllowed(field.clone())),
            }
        }
        Fields::List(resolved)
    };

    let sort = request.sort.as_ref().and_then(|sort| {
        match resolve(whitelist, &sort.field) {
            Some(field) => Some(ResolvedSort {
                field,
                ascending: sort.ascending,
            }),
            None => {
                errors.push(ValidationError::SortFieldNotAllowed(sort.field.clone()));
                None
            }
        }
    });

    let mut filters = Vec::new();
    for filter in &request.filters {
        let Some(descriptor) = whitelist.lookup(&filter.field) else {
            errors.push(ValidationError::FilterFieldNotAllowed(filter.field.clone()));
            continue;
        };
        let field = ResolvedField {
            api_field: filter.field.clone(),
            table: descriptor.table.clone(),
            column: descriptor.column.clone(),
        };

        let before = errors.len();

        if !descriptor.allowed_operators.contains(&filter.op) {
            errors.push(ValidationError::OperatorNotAllowed {
                field: filter.field.clone(),
                operator: filter.op.name().to_string(),
            });
        }

        let kind = typecheck_filter_value(
            &filter.field,
            descriptor.value_type,
            filter.op,
            &filter.value,
            &mut errors,
        );

        if errors.len() == before {
            if let Some(kind) = kind {
                filters.push(TypedFilter { field, kind });
            }
        }
    }

    let mut aggregation = IndexMap::new();
    for (alias, definition) in &request.aggregation {
        let field = resolve(whitelist, &definition.field);
        if field.is_none() {
            errors.push(ValidationError::AggregationFieldNotAllowed(
                definition.field.clone(),
            ));
        }
        let function = AggregateFunction::parse(&definition.function);
        if function.is_none() {
            errors.push(ValidationError::AggregationFunctionNotSupported(
                definition.function.clone(),
            ));
        }
        if let (Some(field), Some(function)) = (field, function) {
            aggregation.insert(alias.clone(), Aggregate { field, function });
        }
    }

    let mut group_by = Vec::new();
    for field in &request.group_by {
        match resolve(whitelist, field) {
            Some(field) => group_by.push(field),
            None => errors.push(ValidationError::GroupByFieldNotAllowed(field.clone())),
        }
    }

    // HAVING fields resolve against the request's own aggregation map, not
    // the whitelist
    let mut having = Vec::new();
    for condition in &request.having {
        let alias_known = request.aggregation.contains_key(&condition.field);
        if !alias_known {
            errors.push(ValidationError::HavingFieldNotAnAlias(
                condition.field.clone(),
            ));
        }
        match typecheck_numeric(&condition.field, &condition.value) {
            Ok(value) => {
                if alias_known {
                    having.push(TypedHaving {
                        alias: condition.field.clone(),
                        operator: condition.op,
                        value,
                    });
                }
            }
            Err(error) => errors.push(error),
        }
    }

    if request.limit == Some(0) {
        errors.push(ValidationError::LimitNotPositive);
    }

    if errors.is_empty() {
        Ok(ValidatedRequest {
            fields,
            filters,
            aggregation,
            group_by,
            having,
            sort,
            limit: request.limit,
            offset: request.offset,
        })
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Check a filter's value against the operator's expected shape and the
/// field's type, pushing every mismatch found.
fn typecheck_filter_value(
    field: &str,
    expected: query_engine_metadata::metadata::ScalarType,
    operator: ComparisonOperator,
    value: &serde_json::Value,
    errors: &mut Vec<ValidationError>,
) -> Option<FilterKind> {
    match operator {
        ComparisonOperator::Between | ComparisonOperator::In => {
            let Some(list) = value.as_array() else {
                errors.push(ValidationError::ExpectedValueList {
                    field: field.to_string(),
                    operator: operator.name().to_string(),
                });
                return None;
            };
            if list.len() < 2 {
                errors.push(ValidationError::ExpectedValueList {
                    field: field.to_string(),
                    operator: operator.name().to_string(),
                });
                return None;
            }
            if operator == ComparisonOperator::Between && list.len() != 2 {
                errors.push(ValidationError::BetweenRequiresTwoValues {
                    field: field.to_string(),
                });
                return None;
            }

            let mut values = Vec::new();
            for member in list {
                match typecheck_value(field, expected, member) {
                    Ok(value) => values.push(value),
                    Err(error) => errors.push(error),
                }
            }
            if values.len() != list.len() {
                return None;
            }

            if operator == ComparisonOperator::Between {
                let mut values = values.into_iter();
                let lower = values.next()?;
                let upper = values.next()?;
                Some(FilterKind::Between { lower, upper })
            } else {
                Some(FilterKind::In(values))
            }
        }
        _ => match typecheck_value(field, expected, value) {
            Ok(value) => Some(FilterKind::Compare { operator, value }),
            Err(error) => {
                errors.push(error);
                None
            }
        },
    }
}

/// The api names the group-by list covers, used by the select builder to
/// skip fields the grouping already carries.
pub fn grouped_api_fields(validated: &ValidatedRequest) -> BTreeSet<&str> {
    validated
        .group_by
        .iter()
        .map(|field| field.api_field.as_str())
        .collect()
}
