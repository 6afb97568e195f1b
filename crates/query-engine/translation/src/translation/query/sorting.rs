//! Translate the sort key to an ORDER BY clause.

use query_engine_sql::sql;

use super::validate::ValidatedRequest;

pub fn translate_order_by(validated: &ValidatedRequest) -> sql::ast::OrderBy {
    sql::ast::OrderBy {
        elements: validated
            .sort
            .iter()
            .map(|sort| sql::ast::OrderByElement {
                target: sql::helpers::make_column(&sort.field.table, &sort.field.column),
                direction: if sort.ascending {
                    sql::ast::OrderByDirection::Asc
                } else {
                    sql::ast::OrderByDirection::Desc
                },
            })
            .collect(),
    }
}
