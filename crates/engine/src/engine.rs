//! Run query requests end to end.

use sqlx::sqlite::SqlitePool;

use gamedb_configuration::Configuration;
use query_engine_execution::{execute, ResultRow};
use query_engine_metadata::metadata::{ScalarType, Whitelist};
use query_engine_sql::sql;
use query_engine_sql::sql::string::Param;
use query_engine_translation::translation::{self, QueryRequest};

use crate::error::Error;

/// What running one request produced: rows, or the full list of
/// validation failures. An invalid request performs no I/O.
#[derive(Debug, PartialEq)]
pub enum QueryOutcome {
    Rows(Vec<ResultRow>),
    Invalid(translation::ValidationErrors),
}

/// The statement a request would run, without running it.
#[derive(Debug, PartialEq)]
pub enum Explanation {
    Plan {
        sql: String,
        /// The statement formatted for reading.
        pretty: String,
        params: Vec<Param>,
    },
    Invalid(translation::ValidationErrors),
}

/// Validate and run one request: a single parameterized statement through
/// the caller's connection pool, with datetime columns decoded back to
/// calendar text afterwards.
pub async fn run(
    configuration: &Configuration,
    pool: &SqlitePool,
    request: &QueryRequest,
) -> Result<QueryOutcome, Error> {
    let plan = match translation::translate(&configuration.metadata, request) {
        Ok(plan) => plan,
        Err(translation::Error::Validation(errors)) => {
            tracing::info!(%errors, "request failed validation");
            return Ok(QueryOutcome::Invalid(errors));
        }
        Err(error) => return Err(Error::Translation(error)),
    };

    let rows = execute(pool, &plan.query_sql()).await?;
    Ok(QueryOutcome::Rows(decode_datetime_columns(
        &configuration.metadata.whitelist,
        rows,
    )))
}

/// Build the statement a request would run and return it for inspection.
/// No statement is issued.
pub fn explain(
    configuration: &Configuration,
    request: &QueryRequest,
) -> Result<Explanation, Error> {
    let plan = match translation::translate(&configuration.metadata, request) {
        Ok(plan) => plan,
        Err(translation::Error::Validation(errors)) => return Ok(Explanation::Invalid(errors)),
        Err(error) => return Err(Error::Translation(error)),
    };

    let query = plan.query_sql();
    let pretty = sqlformat::format(
        &query.sql,
        &sqlformat::QueryParams::None,
        sqlformat::FormatOptions::default(),
    );
    Ok(Explanation::Plan {
        sql: query.sql,
        pretty,
        params: query.params,
    })
}

/// Fetch one game by slug with every relation joined and collapsed, one
/// row per game.
pub async fn fetch_game_by_slug(
    configuration: &Configuration,
    pool: &SqlitePool,
    slug: &str,
) -> Result<Vec<ResultRow>, Error> {
    let base = &configuration.metadata.base_table;

    let mut select_items = vec![sql::ast::SelectItem::TableStar(sql::ast::TableName(
        base.table.clone(),
    ))];
    let mut joins = Vec::new();

    for relation in configuration.metadata.relations.values() {
        joins.push(sql::helpers::left_join_on_columns(
            &relation.link_table,
            sql::helpers::make_column(&base.table, &base.primary_key),
            sql::helpers::make_column(&relation.link_table, &relation.base_column),
        ));
        joins.push(sql::helpers::left_join_on_columns(
            &relation.reference_table,
            sql::helpers::make_column(&relation.link_table, &relation.link_column),
            sql::helpers::make_column(&relation.reference_table, "id"),
        ));
        select_items.push(sql::ast::SelectItem::AliasedExpression {
            expression: sql::ast::Expression::GroupConcatDistinct(sql::helpers::make_column(
                &relation.reference_table,
                "name",
            )),
            alias: sql::helpers::make_column_alias(relation.api_name.clone()),
        });
    }

    let mut select = sql::helpers::simple_select(select_items);
    select.from = Some(sql::ast::From {
        table: sql::ast::TableName(base.table.clone()),
    });
    select.joins = joins;
    select.where_ = sql::ast::Where(vec![sql::ast::Expression::BinaryOperation {
        left: Box::new(sql::ast::Expression::ColumnReference(
            sql::helpers::make_column(&base.table, "slug"),
        )),
        operator: sql::ast::BinaryOperator("="),
        right: Box::new(sql::ast::Expression::Value(sql::ast::Value::String(
            slug.to_string(),
        ))),
    }]);
    select.group_by = sql::ast::GroupBy {
        elements: vec![sql::helpers::make_column(&base.table, &base.primary_key)],
    };

    let rows = execute(pool, &sql::helpers::select_to_sql(&select)).await?;
    Ok(decode_datetime_columns(
        &configuration.metadata.whitelist,
        rows,
    ))
}

/// Decode every column whose whitelist type is datetime from stored epoch
/// seconds back to calendar text.
fn decode_datetime_columns(whitelist: &Whitelist, rows: Vec<ResultRow>) -> Vec<ResultRow> {
    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(column, value)| {
                    let decoded = match whitelist.lookup(&column) {
                        Some(descriptor) if descriptor.value_type == ScalarType::Datetime => {
                            decode_epoch(value)
                        }
                        _ => value,
                    };
                    (column, decoded)
                })
                .collect()
        })
        .collect()
}

fn decode_epoch(value: serde_json::Value) -> serde_json::Value {
    match value.as_i64().and_then(|epoch| {
        chrono::DateTime::from_timestamp(epoch, 0)
            .map(|datetime| datetime.format("%Y-%m-%d %H:%M:%S").to_string())
    }) {
        Some(text) => serde_json::Value::String(text),
        None => value,
    }
}
