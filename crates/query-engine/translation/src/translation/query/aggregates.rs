//! Translate aggregation entries and the HAVING conditions over them.

use query_engine_metadata::metadata::AggregateFunction;
use query_engine_sql::sql;

use super::validate::{Aggregate, ValidatedRequest};

/// The SQL expression for one aggregation entry, `FUNCTION(table.column)`.
pub fn aggregate_expression(aggregate: &Aggregate) -> sql::ast::Expression {
    sql::ast::Expression::FunctionCall {
        function: translate_function(aggregate.function),
        args: vec![sql::ast::Expression::ColumnReference(
            sql::helpers::make_column(&aggregate.field.table, &aggregate.field.column),
        )],
    }
}

fn translate_function(function: AggregateFunction) -> sql::ast::Function {
    match function {
        AggregateFunction::Sum => sql::ast::Function::Sum,
        AggregateFunction::Avg => sql::ast::Function::Avg,
        AggregateFunction::Count => sql::ast::Function::Count,
        AggregateFunction::Min => sql::ast::Function::Min,
        AggregateFunction::Max => sql::ast::Function::Max,
    }
}

/// Build the HAVING conditions. Each alias is resolved to its underlying
/// aggregate expression rather than rendered by name, so the clause stands
/// on engines that don't allow select aliases in HAVING.
pub fn translate_having(validated: &ValidatedRequest) -> Vec<sql::ast::Expression> {
    validated
        .having
        .iter()
        .filter_map(|having| {
            let aggregate = validated.aggregation.get(&having.alias)?;
            Some(sql::ast::Expression::BinaryOperation {
                left: Box::new(aggregate_expression(aggregate)),
                operator: sql::ast::BinaryOperator(having.operator.name()),
                right: Box::new(sql::ast::Expression::Value(having.value.into_sql())),
            })
        })
        .collect()
}
