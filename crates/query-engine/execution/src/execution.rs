//! Execute an execution plan against the database.

use indexmap::IndexMap;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Column, Row};

use query_engine_sql::sql::string::{Param, SQL};

use crate::error::Error;

/// One result row: column values in select-list order.
pub type ResultRow = IndexMap<String, serde_json::Value>;

/// Execute a statement, binding each recorded parameter in placeholder
/// order. Exactly one statement is issued per call.
pub async fn execute(pool: &SqlitePool, query: &SQL) -> Result<Vec<ResultRow>, Error> {
    tracing::debug!(sql = %query.sql, "executing query");

    let rows = build_query_with_params(query)
        .fetch_all(pool)
        .await
        .map_err(|source| {
            tracing::error!(
                statement = %query.sql,
                params = ?query.params,
                "query execution failed"
            );
            Error::Query {
                statement: query.sql.clone(),
                params: format!("{:?}", query.params),
                source,
            }
        })?;

    Ok(rows.iter().map(row_to_json).collect())
}

/// Create a sqlx query based on our SQL query and bind our parameters to it.
fn build_query_with_params<'a>(
    query: &'a SQL,
) -> sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>> {
    query
        .params
        .iter()
        .fold(sqlx::query(query.sql.as_str()), |q, param| match param {
            Param::Int(i) => q.bind(*i),
            Param::Float(f) => q.bind(*f),
            Param::String(s) => q.bind(s.as_str()),
        })
}

/// Take one storage row and return it as a JSON object in column order.
fn row_to_json(row: &SqliteRow) -> ResultRow {
    row.columns()
        .iter()
        .map(|column| (column.name().to_string(), decode_column(row, column.ordinal())))
        .collect()
}

/// SQLite types values, not columns, so decoding probes the narrowing
/// chain integer, float, text and settles on the first that fits.
fn decode_column(row: &SqliteRow, index: usize) -> serde_json::Value {
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return match value {
            None => serde_json::Value::Null,
            Some(i) => serde_json::Value::Number(i.into()),
        };
    }
    if let Ok(Some(value)) = row.try_get::<Option<f64>, _>(index) {
        return serde_json::Number::from_f64(value)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null);
    }
    if let Ok(Some(value)) = row.try_get::<Option<String>, _>(index) {
        return serde_json::Value::String(value);
    }
    serde_json::Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        // a single connection, so every statement sees the same
        // in-memory database
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_execute_binds_params_in_order() {
        let pool = memory_pool().await;
        sqlx::query("CREATE TABLE games (id INTEGER PRIMARY KEY, name TEXT, rating REAL)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO games (id, name, rating) VALUES (1, 'Celeste', 92.5), (2, 'Anthem', 54.0)")
            .execute(&pool)
            .await
            .unwrap();

        let query = SQL {
            sql: "SELECT \"name\", \"rating\" FROM \"games\" WHERE \"rating\" > ? AND \"name\" LIKE ?".to_string(),
            params: vec![Param::Float(60.0), Param::String("%".to_string())],
        };

        let rows = execute(&pool, &query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], serde_json::json!("Celeste"));
        assert_eq!(rows[0]["rating"], serde_json::json!(92.5));
    }

    #[tokio::test]
    async fn test_execution_failure_carries_the_statement() {
        let pool = memory_pool().await;

        let query = SQL {
            sql: "SELECT * FROM \"missing_table\"".to_string(),
            params: vec![],
        };

        let error = execute(&pool, &query).await.unwrap_err();
        let Error::Query { statement, .. } = error;
        assert_eq!(statement, "SELECT * FROM \"missing_table\"");
    }
}
