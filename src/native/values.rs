//! Conversion between JSON values and engine values

use base64::Engine as _;
use rusqlite::types::Value as SqlValue;
use serde_json::{Number, Value};

use crate::schema::JSON_COLUMN_TYPE;

/// Positional result tuple
pub type Row = Vec<Value>;

/// Bind a JSON value as an engine parameter
pub fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Integer(i)
            } else if let Some(i) = n.as_u64().and_then(|u| i64::try_from(u).ok()) {
                SqlValue::Integer(i)
            } else {
                SqlValue::Real(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    }
}

/// Decode one fetched column
///
/// Text in a column declared as JSON is parsed back into a structured
/// value; text that fails to parse is returned as a plain string.
pub fn from_sql_value(value: SqlValue, decl_type: Option<&str>) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::from(i),
        SqlValue::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        SqlValue::Text(s) => {
            let is_json = decl_type.is_some_and(|t| t.eq_ignore_ascii_case(JSON_COLUMN_TYPE));
            if is_json {
                match serde_json::from_str(&s) {
                    Ok(parsed) => parsed,
                    Err(_) => Value::String(s),
                }
            } else {
                Value::String(s)
            }
        }
        SqlValue::Blob(b) => Value::String(base64::engine::general_purpose::STANDARD.encode(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bind_scalars() {
        assert_eq!(to_sql_value(&json!(7)), SqlValue::Integer(7));
        assert_eq!(to_sql_value(&json!(true)), SqlValue::Integer(1));
        assert_eq!(to_sql_value(&json!(1.5)), SqlValue::Real(1.5));
        assert_eq!(to_sql_value(&json!("x")), SqlValue::Text("x".into()));
        assert_eq!(to_sql_value(&Value::Null), SqlValue::Null);
    }

    #[test]
    fn test_bind_structured_as_json_text() {
        assert_eq!(
            to_sql_value(&json!(["a", 1])),
            SqlValue::Text("[\"a\",1]".into())
        );
    }

    #[test]
    fn test_decode_json_column() {
        let decoded = from_sql_value(SqlValue::Text("[\"婦科\"]".into()), Some("JSON"));
        assert_eq!(decoded, json!(["婦科"]));
    }

    #[test]
    fn test_text_column_not_parsed() {
        let decoded = from_sql_value(SqlValue::Text("[1]".into()), Some("TEXT"));
        assert_eq!(decoded, json!("[1]"));
    }

    #[test]
    fn test_malformed_json_falls_back_to_text() {
        let decoded = from_sql_value(SqlValue::Text("not json".into()), Some("JSON"));
        assert_eq!(decoded, json!("not json"));
    }

    #[test]
    fn test_blob_as_base64() {
        let decoded = from_sql_value(SqlValue::Blob(vec![1, 2, 3]), None);
        assert_eq!(decoded, json!("AQID"));
    }
}
