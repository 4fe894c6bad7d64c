//! Value converter
//!
//! Maps logical types to write-side encoders. Only `array` has a non-identity
//! encoder (structured value to canonical JSON text). The read side is
//! handled by the native connection, which parses columns declared with
//! [`JSON_COLUMN_TYPE`](super::compiler::JSON_COLUMN_TYPE) back into
//! structured values.

use std::collections::HashMap;

use serde_json::Value;

use super::errors::EncodeError;
use super::types::LogicalType;

/// Write-side encoder for one logical type
pub type Encoder = fn(&Value) -> Result<Value, EncodeError>;

/// Registry of per-type encoders
#[derive(Debug, Clone)]
pub struct ValueConverter {
    encoders: HashMap<LogicalType, Encoder>,
}

impl ValueConverter {
    /// Converter with no encoders registered
    pub fn empty() -> Self {
        Self {
            encoders: HashMap::new(),
        }
    }

    /// Register (or replace) the encoder for a logical type
    pub fn register(&mut self, dtype: LogicalType, encoder: Encoder) {
        self.encoders.insert(dtype, encoder);
    }

    /// Whether `dtype` has an encoder
    pub fn has_encoder(&self, dtype: LogicalType) -> bool {
        self.encoders.contains_key(&dtype)
    }

    /// Encode `value` for a column of type `dtype`
    ///
    /// Types without a registered encoder return `value` unchanged.
    pub fn convert_entry(&self, dtype: LogicalType, value: &Value) -> Result<Value, EncodeError> {
        match self.encoders.get(&dtype) {
            Some(encode) => encode(value),
            None => Ok(value.clone()),
        }
    }
}

impl Default for ValueConverter {
    fn default() -> Self {
        let mut converter = Self::empty();
        converter.register(LogicalType::Array, encode_array);
        converter
    }
}

/// Encode a structured array as canonical JSON text
///
/// Null passes through so nullable array columns stay NULL.
pub fn encode_array(value: &Value) -> Result<Value, EncodeError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Array(_) => serde_json::to_string(value)
            .map(Value::String)
            .map_err(|e| EncodeError::Serialize(e.to_string())),
        other => Err(EncodeError::NotAnArray(json_type_name(other))),
    }
}

/// JSON type name for diagnostics
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
