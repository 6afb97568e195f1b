use serde_json::json;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use gamedb_configuration::{make_runtime_configuration, Configuration, ParsedConfiguration};
use gamedb_engine::{explain, fetch_game_by_slug, run, Explanation, QueryOutcome};
use query_engine_sql::sql::string::Param;
use query_engine_translation::translation::QueryRequest;

fn games_configuration() -> Configuration {
    let parsed: ParsedConfiguration = serde_json::from_value(json!({
        "version": 1,
        "baseTable": {
            "name": "games",
            "primaryKey": "id",
            "fields": [
                {"name": "id", "type": "int"},
                {"name": "name", "type": "str"},
                {"name": "slug", "type": "str"},
                {"name": "rating", "type": "float"},
                {"name": "first_release_date", "type": "datetime"}
            ]
        },
        "referenceTables": ["platforms", "genres"],
        "relations": [
            {"name": "platforms"},
            {"name": "genres"}
        ]
    }))
    .unwrap();
    make_runtime_configuration(&parsed).unwrap()
}

async fn games_database() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    let statements = [
        "CREATE TABLE games (
            id INTEGER PRIMARY KEY,
            name TEXT,
            slug TEXT,
            rating REAL,
            first_release_date INTEGER
        )",
        "CREATE TABLE platforms (id INTEGER PRIMARY KEY, name TEXT)",
        "CREATE TABLE genres (id INTEGER PRIMARY KEY, name TEXT)",
        "CREATE TABLE games_platforms (
            game_id INTEGER,
            platforms_id INTEGER,
            PRIMARY KEY (game_id, platforms_id)
        )",
        "CREATE TABLE games_genres (
            game_id INTEGER,
            genres_id INTEGER,
            PRIMARY KEY (game_id, genres_id)
        )",
        // 2018-01-25, 2020-09-17 and 2019-02-22 as epoch seconds
        "INSERT INTO games VALUES
            (1, 'Celeste', 'celeste', 92.5, 1516838400),
            (2, 'Hades', 'hades', 93.0, 1600300800),
            (3, 'Anthem', 'anthem', 54.0, 1550793600)",
        "INSERT INTO platforms VALUES (1, 'PC'), (2, 'Switch'), (3, 'PS4')",
        "INSERT INTO genres VALUES (1, 'Platformer'), (2, 'Roguelike'), (3, 'Shooter')",
        "INSERT INTO games_platforms VALUES (1, 1), (1, 2), (2, 1), (2, 2), (3, 1), (3, 3)",
        "INSERT INTO games_genres VALUES (1, 1), (2, 2), (3, 3)",
    ];
    for statement in statements {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    pool
}

fn request(value: serde_json::Value) -> QueryRequest {
    serde_json::from_value(value).unwrap()
}

fn rows(outcome: QueryOutcome) -> Vec<query_engine_execution::ResultRow> {
    match outcome {
        QueryOutcome::Rows(rows) => rows,
        QueryOutcome::Invalid(errors) => panic!("request unexpectedly invalid: {errors}"),
    }
}

#[tokio::test]
async fn it_runs_a_grouped_aggregation_with_having() {
    let configuration = games_configuration();
    let pool = games_database().await;

    let outcome = run(
        &configuration,
        &pool,
        &request(json!({
            "fields": ["platforms.name"],
            "groupBy": ["platforms.name"],
            "aggregation": {"game_count": {"field": "id", "function": "COUNT"}},
            "having": [{"field": "game_count", "op": ">", "value": 2}]
        })),
    )
    .await
    .unwrap();

    let rows = rows(outcome);
    // only PC carries all three games
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["game_count"], json!(3));
    assert_eq!(rows[0]["platforms"], json!("PC"));
}

#[tokio::test]
async fn it_filters_through_a_relation() {
    let configuration = games_configuration();
    let pool = games_database().await;

    let outcome = run(
        &configuration,
        &pool,
        &request(json!({
            "fields": ["name"],
            "filters": [{"field": "genres.name", "op": "=", "value": "Roguelike"}],
            "sort": {"field": "name", "ascending": true}
        })),
    )
    .await
    .unwrap();

    let rows = rows(outcome);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], json!("Hades"));
}

#[tokio::test]
async fn it_round_trips_datetime_values() {
    let configuration = games_configuration();
    let pool = games_database().await;

    // the calendar date is coerced to epoch seconds before binding, and
    // the stored epoch comes back as calendar text
    let outcome = run(
        &configuration,
        &pool,
        &request(json!({
            "fields": ["name", "first_release_date"],
            "filters": [{"field": "first_release_date", "op": "=", "value": "2018-01-25"}]
        })),
    )
    .await
    .unwrap();

    let rows = rows(outcome);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], json!("Celeste"));
    assert_eq!(rows[0]["first_release_date"], json!("2018-01-25 00:00:00"));
}

#[tokio::test]
async fn it_returns_validation_errors_as_data() {
    let configuration = games_configuration();
    let pool = games_database().await;

    let outcome = run(
        &configuration,
        &pool,
        &request(json!({"fields": ["*", "name"]})),
    )
    .await
    .unwrap();

    match outcome {
        QueryOutcome::Invalid(errors) => {
            assert_eq!(errors.to_string(), "cannot select * and another field");
        }
        QueryOutcome::Rows(rows) => panic!("expected validation errors, got {rows:?}"),
    }
}

#[tokio::test]
async fn it_applies_limit_and_offset() {
    let configuration = games_configuration();
    let pool = games_database().await;

    let outcome = run(
        &configuration,
        &pool,
        &request(json!({
            "fields": ["name"],
            "sort": {"field": "rating", "ascending": false},
            "limit": 1,
            "offset": 1
        })),
    )
    .await
    .unwrap();

    let rows = rows(outcome);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], json!("Celeste"));
}

#[test]
fn it_explains_without_a_connection() {
    let configuration = games_configuration();

    let explanation = explain(
        &configuration,
        &request(json!({
            "fields": ["name"],
            "filters": [{"field": "rating", "op": ">=", "value": 90}]
        })),
    )
    .unwrap();

    match explanation {
        Explanation::Plan { sql, params, .. } => {
            assert!(sql.contains("WHERE \"games\".\"rating\" >= ?"));
            assert_eq!(params, vec![Param::Float(90.0)]);
        }
        Explanation::Invalid(errors) => panic!("unexpectedly invalid: {errors}"),
    }
}

#[tokio::test]
async fn it_fetches_one_game_by_slug() {
    let configuration = games_configuration();
    let pool = games_database().await;

    let rows = fetch_game_by_slug(&configuration, &pool, "celeste")
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], json!("Celeste"));
    assert_eq!(rows[0]["first_release_date"], json!("2018-01-25 00:00:00"));

    let platforms = rows[0]["platforms"].as_str().unwrap();
    assert!(platforms.contains("PC"));
    assert!(platforms.contains("Switch"));
    assert!(!platforms.contains("PS4"));
}
