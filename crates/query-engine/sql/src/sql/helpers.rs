//! Helpers for building sql::ast types in certain shapes and patterns.

use super::ast::*;
use super::string::SQL;

// Empty clauses //

/// An empty `WHERE` clause.
pub fn empty_where() -> Where {
    Where(vec![])
}

/// An empty `GROUP BY` clause.
pub fn empty_group_by() -> GroupBy {
    GroupBy { elements: vec![] }
}

/// An empty `HAVING` clause.
pub fn empty_having() -> Having {
    Having(vec![])
}

/// An empty `ORDER BY` clause.
pub fn empty_order_by() -> OrderBy {
    OrderBy { elements: vec![] }
}

/// Empty `LIMIT` and `OFFSET` clauses.
pub fn empty_limit() -> Limit {
    Limit {
        limit: None,
        offset: None,
    }
}

// Aliasing //

/// Generate a reference to a specific table's column.
pub fn make_column(table: &str, column: &str) -> ColumnReference {
    ColumnReference {
        table: TableName(table.to_string()),
        name: ColumnName(column.to_string()),
    }
}

/// Create column aliases using this function so we build everything in one place.
pub fn make_column_alias(name: String) -> ColumnAlias {
    ColumnAlias { name }
}

// SELECTs //

/// Build a simple select with a select list and the rest are empty.
pub fn simple_select(select_list: Vec<SelectItem>) -> Select {
    Select {
        select_list: SelectList(select_list),
        from: None,
        joins: vec![],
        where_: empty_where(),
        group_by: empty_group_by(),
        having: empty_having(),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// Build a simple select *
pub fn star_select(from: From) -> Select {
    let mut select = simple_select(vec![SelectItem::Star]);
    select.from = Some(from);
    select
}

/// Build a LEFT JOIN of `table` on an equality between two columns.
pub fn left_join_on_columns(table: &str, left: ColumnReference, right: ColumnReference) -> Join {
    Join::LeftJoin(LeftJoin {
        table: TableName(table.to_string()),
        on: Expression::BinaryOperation {
            left: Box::new(Expression::ColumnReference(left)),
            operator: BinaryOperator("="),
            right: Box::new(Expression::ColumnReference(right)),
        },
    })
}

/// Render a select to its string form.
pub fn select_to_sql(select: &Select) -> SQL {
    let mut sql = SQL::new();
    select.to_sql(&mut sql);
    sql
}
