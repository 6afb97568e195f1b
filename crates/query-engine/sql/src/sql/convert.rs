//! Convert a SQL AST to a low-level SQL string.
//!
//! Clause order is fixed: SELECT, FROM, JOINs, WHERE, GROUP BY, HAVING,
//! ORDER BY, LIMIT, OFFSET. A clause whose inputs are empty is omitted
//! entirely.

use super::ast::*;
use super::string::{Param, SQL};

impl Select {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_syntax("SELECT ");

        self.select_list.to_sql(sql);

        if let Some(from) = &self.from {
            sql.append_syntax(" ");
            from.to_sql(sql);
        }

        for join in &self.joins {
            join.to_sql(sql);
        }

        self.where_.to_sql(sql);

        self.group_by.to_sql(sql);

        self.having.to_sql(sql);

        self.order_by.to_sql(sql);

        self.limit.to_sql(sql);
    }
}

impl SelectList {
    pub fn to_sql(&self, sql: &mut SQL) {
        let SelectList(items) = self;
        for (index, item) in items.iter().enumerate() {
            item.to_sql(sql);
            if index < (items.len() - 1) {
                sql.append_syntax(", ");
            }
        }
    }
}

impl SelectItem {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            SelectItem::Star => sql.append_syntax("*"),
            SelectItem::TableStar(table) => {
                table.to_sql(sql);
                sql.append_syntax(".*");
            }
            SelectItem::Column(column) => column.to_sql(sql),
            SelectItem::AliasedExpression { expression, alias } => {
                expression.to_sql(sql);
                sql.append_syntax(" AS ");
                alias.to_sql(sql);
            }
        }
    }
}

impl From {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_syntax("FROM ");
        self.table.to_sql(sql);
    }
}

impl Join {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            Join::LeftJoin(join) => {
                sql.append_syntax(" LEFT JOIN ");
                join.table.to_sql(sql);
                sql.append_syntax(" ON ");
                join.on.to_sql(sql);
            }
        }
    }
}

impl Where {
    pub fn to_sql(&self, sql: &mut SQL) {
        let Where(conditions) = self;
        if !conditions.is_empty() {
            sql.append_syntax(" WHERE ");
            for (index, condition) in conditions.iter().enumerate() {
                condition.to_sql(sql);
                if index < (conditions.len() - 1) {
                    sql.append_syntax(" AND ");
                }
            }
        }
    }
}

impl GroupBy {
    pub fn to_sql(&self, sql: &mut SQL) {
        if !self.elements.is_empty() {
            sql.append_syntax(" GROUP BY ");
            for (index, element) in self.elements.iter().enumerate() {
                element.to_sql(sql);
                if index < (self.elements.len() - 1) {
                    sql.append_syntax(", ");
                }
            }
        }
    }
}

impl Having {
    pub fn to_sql(&self, sql: &mut SQL) {
        let Having(conditions) = self;
        if !conditions.is_empty() {
            sql.append_syntax(" HAVING ");
            for (index, condition) in conditions.iter().enumerate() {
                condition.to_sql(sql);
                if index < (conditions.len() - 1) {
                    sql.append_syntax(" AND ");
                }
            }
        }
    }
}

impl OrderBy {
    pub fn to_sql(&self, sql: &mut SQL) {
        if !self.elements.is_empty() {
            sql.append_syntax(" ORDER BY ");
            for (index, order_by_item) in self.elements.iter().enumerate() {
                order_by_item.to_sql(sql);
                if index < (self.elements.len() - 1) {
                    sql.append_syntax(", ");
                }
            }
        }
    }
}

impl OrderByElement {
    pub fn to_sql(&self, sql: &mut SQL) {
        self.target.to_sql(sql);
        self.direction.to_sql(sql);
    }
}

impl OrderByDirection {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            OrderByDirection::Asc => sql.append_syntax(" ASC"),
            OrderByDirection::Desc => sql.append_syntax(" DESC"),
        }
    }
}

impl Limit {
    pub fn to_sql(&self, sql: &mut SQL) {
        let offset = match self.offset {
            None | Some(0) => None,
            Some(offset) => Some(offset),
        };
        if let Some(limit) = self.limit {
            sql.append_syntax(" LIMIT ");
            sql.append_param(Param::Int(i64::from(limit)));
        } else if offset.is_some() {
            // SQLite will not take OFFSET without LIMIT
            sql.append_syntax(" LIMIT -1");
        }
        if let Some(offset) = offset {
            sql.append_syntax(" OFFSET ");
            sql.append_param(Param::Int(i64::from(offset)));
        }
    }
}

// scalars
impl Expression {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            Expression::ColumnReference(column) => column.to_sql(sql),
            Expression::Value(value) => value.to_sql(sql),
            Expression::BinaryOperation {
                left,
                operator,
                right,
            } => {
                left.to_sql(sql);
                operator.to_sql(sql);
                right.to_sql(sql);
            }
            Expression::Between {
                operand,
                lower,
                upper,
            } => {
                operand.to_sql(sql);
                sql.append_syntax(" BETWEEN ");
                lower.to_sql(sql);
                sql.append_syntax(" AND ");
                upper.to_sql(sql);
            }
            Expression::InList { operand, list } => {
                operand.to_sql(sql);
                sql.append_syntax(" IN (");
                for (index, item) in list.iter().enumerate() {
                    item.to_sql(sql);
                    if index < (list.len() - 1) {
                        sql.append_syntax(", ");
                    }
                }
                sql.append_syntax(")");
            }
            Expression::FunctionCall { function, args } => {
                function.to_sql(sql);
                sql.append_syntax("(");
                for (index, arg) in args.iter().enumerate() {
                    arg.to_sql(sql);
                    if index < (args.len() - 1) {
                        sql.append_syntax(", ");
                    }
                }
                sql.append_syntax(")");
            }
            Expression::GroupConcatDistinct(column) => {
                sql.append_syntax("GROUP_CONCAT(DISTINCT ");
                column.to_sql(sql);
                sql.append_syntax(")");
            }
        }
    }
}

impl BinaryOperator {
    pub fn to_sql(&self, sql: &mut SQL) {
        let BinaryOperator(name) = self;
        sql.append_syntax(" ");
        sql.append_syntax(name);
        sql.append_syntax(" ");
    }
}

impl Function {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            Function::Sum => sql.append_syntax("SUM"),
            Function::Avg => sql.append_syntax("AVG"),
            Function::Count => sql.append_syntax("COUNT"),
            Function::Min => sql.append_syntax("MIN"),
            Function::Max => sql.append_syntax("MAX"),
        }
    }
}

impl Value {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            Value::Int(i) => sql.append_param(Param::Int(*i)),
            Value::Float(f) => sql.append_param(Param::Float(*f)),
            Value::String(s) => sql.append_param(Param::String(s.clone())),
        }
    }
}

// names
impl TableName {
    pub fn to_sql(&self, sql: &mut SQL) {
        let TableName(name) = self;
        sql.append_identifier(name);
    }
}

impl ColumnReference {
    pub fn to_sql(&self, sql: &mut SQL) {
        self.table.to_sql(sql);
        sql.append_syntax(".");
        let ColumnName(name) = &self.name;
        sql.append_identifier(name);
    }
}

impl ColumnAlias {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_identifier(&self.name);
    }
}
