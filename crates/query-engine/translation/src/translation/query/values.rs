//! Typed values: checking raw JSON request values against the whitelist
//! and lowering them to SQL values.

use query_engine_metadata::metadata::ScalarType;
use query_engine_sql::sql;

use super::error::ValidationError;

/// A request value after type checking. Datetime values have already been
/// coerced to epoch seconds and live as `Int`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Int(i64),
    Float(f64),
    Text(String),
}

/// A checked HAVING comparison value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Int(i64),
    Float(f64),
}

impl TypedValue {
    pub fn into_sql(self) -> sql::ast::Value {
        match self {
            TypedValue::Int(i) => sql::ast::Value::Int(i),
            TypedValue::Float(f) => sql::ast::Value::Float(f),
            TypedValue::Text(s) => sql::ast::Value::String(s),
        }
    }
}

impl NumericValue {
    pub fn into_sql(self) -> sql::ast::Value {
        match self {
            NumericValue::Int(i) => sql::ast::Value::Int(i),
            NumericValue::Float(f) => sql::ast::Value::Float(f),
        }
    }
}

/// Check one scalar JSON value against the expected type.
///
/// Integers widen to float for float-typed fields. Datetime values are
/// coerced to epoch seconds first: strings are parsed as calendar dates,
/// integers are taken to already be epoch seconds.
pub fn typecheck_value(
    field: &str,
    expected: ScalarType,
    value: &serde_json::Value,
) -> Result<TypedValue, ValidationError> {
    let mismatch = || ValidationError::ValueTypeMismatch {
        field: field.to_string(),
        expected: expected.name().to_string(),
    };

    match expected {
        ScalarType::Int => value.as_i64().map(TypedValue::Int).ok_or_else(mismatch),
        ScalarType::Float => value.as_f64().map(TypedValue::Float).ok_or_else(mismatch),
        ScalarType::Str => value
            .as_str()
            .map(|s| TypedValue::Text(s.to_string()))
            .ok_or_else(mismatch),
        ScalarType::Datetime => coerce_datetime(field, value),
    }
}

/// Coerce a datetime value to epoch seconds. An unparsable date is a
/// reported validation error, not a crash.
fn coerce_datetime(field: &str, value: &serde_json::Value) -> Result<TypedValue, ValidationError> {
    match value {
        serde_json::Value::Number(_) => value.as_i64().map(TypedValue::Int).ok_or_else(|| {
            ValidationError::ValueTypeMismatch {
                field: field.to_string(),
                expected: ScalarType::Datetime.name().to_string(),
            }
        }),
        serde_json::Value::String(text) => {
            parse_datetime(text)
                .map(TypedValue::Int)
                .ok_or_else(|| ValidationError::InvalidDate {
                    field: field.to_string(),
                    value: text.clone(),
                })
        }
        _ => Err(ValidationError::ValueTypeMismatch {
            field: field.to_string(),
            expected: ScalarType::Datetime.name().to_string(),
        }),
    }
}

/// Accepted date formats, tried in order.
pub fn parse_datetime(text: &str) -> Option<i64> {
    if let Ok(date) = chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
    }
    if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.and_utc().timestamp());
    }
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(datetime.timestamp());
    }
    None
}

/// Check a HAVING comparison value, which must be numeric.
pub fn typecheck_numeric(
    alias: &str,
    value: &serde_json::Value,
) -> Result<NumericValue, ValidationError> {
    if let Some(i) = value.as_i64() {
        return Ok(NumericValue::Int(i));
    }
    value
        .as_f64()
        .map(NumericValue::Float)
        .ok_or_else(|| ValidationError::HavingValueNotNumeric(alias.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates_coerce_to_epoch_seconds() {
        assert_eq!(parse_datetime("2020-01-15"), Some(1_579_046_400));
        assert_eq!(parse_datetime("1970-01-01"), Some(0));
        assert_eq!(parse_datetime("not a date"), None);
    }

    #[test]
    fn test_epoch_integers_pass_through() {
        let value = serde_json::json!(1_579_046_400);
        assert_eq!(
            typecheck_value("first_release_date", ScalarType::Datetime, &value),
            Ok(TypedValue::Int(1_579_046_400))
        );
    }

    #[test]
    fn test_integers_widen_for_float_fields() {
        let value = serde_json::json!(50);
        assert_eq!(
            typecheck_value("rating", ScalarType::Float, &value),
            Ok(TypedValue::Float(50.0))
        );
    }

    #[test]
    fn test_strings_do_not_pass_as_integers() {
        let value = serde_json::json!("7");
        assert_eq!(
            typecheck_value("rating_count", ScalarType::Int, &value),
            Err(ValidationError::ValueTypeMismatch {
                field: "rating_count".to_string(),
                expected: "int".to_string(),
            })
        );
    }
}
