//! Translate the incoming query request to an execution plan (SQL) to be
//! run against the database.

pub mod aggregates;
pub mod error;
pub mod fields;
pub mod filtering;
pub mod joins;
pub mod request;
pub mod sorting;
pub mod validate;
pub mod values;

use query_engine_metadata::metadata::Metadata;
use query_engine_sql::sql;

use self::error::Error;
use self::request::QueryRequest;

/// Definition of an execution plan to be run against the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    /// The query.
    pub query: sql::ast::Select,
}

impl ExecutionPlan {
    /// Extract the query component as SQL.
    pub fn query_sql(&self) -> sql::string::SQL {
        sql::helpers::select_to_sql(&self.query)
    }
}

/// Validate a request against the whitelist and translate it into an
/// execution plan. Building the plan twice from the same request yields
/// byte-identical SQL text and parameters.
pub fn translate(metadata: &Metadata, request: &QueryRequest) -> Result<ExecutionPlan, Error> {
    let validated = validate::validate(&metadata.whitelist, request)?;

    let base = &metadata.base_table;

    let mut select_items = fields::translate_fields(&validated);

    let relation_joins = joins::translate_joins(metadata, &validated)?;
    select_items.extend(relation_joins.select_items);

    // every requested field can be swallowed by the group-by subtraction;
    // fall back to the group keys so the statement stays well-formed
    if select_items.is_empty() {
        for field in &validated.group_by {
            select_items.push(sql::ast::SelectItem::Column(sql::helpers::make_column(
                &field.table,
                &field.column,
            )));
        }
    }

    let mut select = sql::helpers::simple_select(select_items);

    select.from = Some(sql::ast::From {
        table: sql::ast::TableName(base.table.clone()),
    });

    select.joins = relation_joins.joins;

    select.where_ = sql::ast::Where(filtering::translate_filters(&validated));

    // group either by the explicit keys or by the base primary key, so
    // joined fan-out is always collapsed
    select.group_by = if validated.group_by.is_empty() {
        sql::ast::GroupBy {
            elements: vec![sql::helpers::make_column(&base.table, &base.primary_key)],
        }
    } else {
        sql::ast::GroupBy {
            elements: validated
                .group_by
                .iter()
                .map(|field| sql::helpers::make_column(&field.table, &field.column))
                .collect(),
        }
    };

    select.having = sql::ast::Having(aggregates::translate_having(&validated));

    select.order_by = sorting::translate_order_by(&validated);

    select.limit = sql::ast::Limit {
        limit: validated.limit,
        offset: validated.offset,
    };

    let plan = ExecutionPlan { query: select };
    tracing::debug!(sql = %plan.query_sql().sql, "translated query");
    Ok(plan)
}
