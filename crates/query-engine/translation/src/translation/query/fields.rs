//! Translate the field selection of a request to a select list.

use query_engine_sql::sql;

use super::aggregates::aggregate_expression;
use super::validate::{grouped_api_fields, Fields, ValidatedRequest};

/// Build the select list: `*` verbatim, or the requested non-group-by
/// fields, followed by one aliased term per aggregation entry in the
/// aggregation map's iteration order.
pub fn translate_fields(validated: &ValidatedRequest) -> Vec<sql::ast::SelectItem> {
    let mut items = Vec::new();

    match &validated.fields {
        Fields::Star => items.push(sql::ast::SelectItem::Star),
        Fields::List(fields) => {
            let grouped = grouped_api_fields(validated);
            for field in fields {
                if !grouped.contains(field.api_field.as_str()) {
                    items.push(sql::ast::SelectItem::Column(sql::helpers::make_column(
                        &field.table,
                        &field.column,
                    )));
                }
            }
        }
    }

    for (alias, aggregate) in &validated.aggregation {
        items.push(sql::ast::SelectItem::AliasedExpression {
            expression: aggregate_expression(aggregate),
            alias: sql::helpers::make_column_alias(alias.clone()),
        });
    }

    items
}
