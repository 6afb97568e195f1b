//! Translate filter conditions to WHERE expressions.

use query_engine_sql::sql;

use super::validate::{FilterKind, ValidatedRequest};

/// Build the WHERE conditions, one per filter, each value bound as a
/// parameter: `field op ?`, `field BETWEEN ? AND ?`, or `field IN (?, …)`
/// with exactly one placeholder per supplied value.
pub fn translate_filters(validated: &ValidatedRequest) -> Vec<sql::ast::Expression> {
    validated
        .filters
        .iter()
        .map(|filter| {
            let column = Box::new(sql::ast::Expression::ColumnReference(
                sql::helpers::make_column(&filter.field.table, &filter.field.column),
            ));
            match &filter.kind {
                FilterKind::Compare { operator, value } => sql::ast::Expression::BinaryOperation {
                    left: column,
                    operator: sql::ast::BinaryOperator(operator.name()),
                    right: Box::new(sql::ast::Expression::Value(value.clone().into_sql())),
                },
                FilterKind::Between { lower, upper } => sql::ast::Expression::Between {
                    operand: column,
                    lower: Box::new(sql::ast::Expression::Value(lower.clone().into_sql())),
                    upper: Box::new(sql::ast::Expression::Value(upper.clone().into_sql())),
                },
                FilterKind::In(values) => sql::ast::Expression::InList {
                    operand: column,
                    list: values
                        .iter()
                        .map(|value| sql::ast::Expression::Value(value.clone().into_sql()))
                        .collect(),
                },
            }
        })
        .collect()
}
