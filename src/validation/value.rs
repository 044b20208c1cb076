//! Raw input values, validated values, and the validated record.

use std::collections::HashMap;

use serde::Serialize;

/// A value as it arrived, before any coercion.
///
/// Query, form, header, cookie and path inputs are always [`RawValue::Str`];
/// JSON bodies can produce every variant.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A JSON array or object. Never valid for a scalar field.
    Composite,
}

impl RawValue {
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value as J;
        match value {
            J::Null => Self::Null,
            J::Bool(b) => Self::Bool(*b),
            J::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Composite, Self::Float),
            },
            J::String(s) => Self::Str(s.clone()),
            J::Array(_) | J::Object(_) => Self::Composite,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self { Self::Str(s.to_owned()) }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self { Self::Str(s) }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self { Self::Int(i) }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self { Self::Bool(b) }
}

/// Field name to raw value, as gathered from a request.
pub type RawInput = HashMap<String, RawValue>;

/// A value that passed validation, already coerced to its declared kind.
///
/// Choice fields are stored as [`Value::Text`] holding the matched symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
        }
    }
}

/// Conversion out of a validated [`Value`].
pub trait FromValue: Sized {
    /// Human name of the expected kind, used in [`RecordError`].
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for String {
    const EXPECTED: &'static str = "text";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }
}

/// A record does not hold what a model expected of it.
///
/// Only reachable when a model reads a field its schema does not declare, or
/// declares with another kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record field `{field}` is {found}, expected {expected}")]
pub struct RecordError {
    pub field: &'static str,
    pub expected: &'static str,
    pub found: &'static str,
}

/// The populated result of a successful validation.
///
/// Holds every required field and every optional field that was supplied or
/// has a default. Optional fields without a value are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: HashMap<&'static str, Value>,
}

impl Record {
    pub(crate) fn insert(&mut self, field: &'static str, value: Value) {
        self.values.insert(field, value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Removes and converts a field that must be present.
    pub fn take<T: FromValue>(&mut self, field: &'static str) -> Result<T, RecordError> {
        match self.take_opt(field)? {
            Some(v) => Ok(v),
            None => Err(RecordError { field, expected: T::EXPECTED, found: "absent" }),
        }
    }

    /// Removes and converts a field that may be absent.
    pub fn take_opt<T: FromValue>(&mut self, field: &'static str) -> Result<Option<T>, RecordError> {
        let Some(value) = self.values.remove(field) else {
            return Ok(None);
        };
        let found = value.kind();
        T::from_value(value)
            .map(Some)
            .ok_or(RecordError { field, expected: T::EXPECTED, found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_numbers_keep_integer_precision() {
        assert_eq!(RawValue::from_json(&json!(30)), RawValue::Int(30));
        assert_eq!(RawValue::from_json(&json!(30.5)), RawValue::Float(30.5));
        assert_eq!(RawValue::from_json(&json!([1])), RawValue::Composite);
        assert_eq!(RawValue::from_json(&json!(null)), RawValue::Null);
    }

    #[test]
    fn take_converts_and_removes() {
        let mut record = Record::default();
        record.insert("age", Value::Integer(30));
        record.insert("first_name", Value::Text("Ana".into()));

        assert_eq!(record.take::<i64>("age"), Ok(30));
        assert!(!record.contains("age"));
        assert_eq!(record.take_opt::<bool>("is_married"), Ok(None));
        assert_eq!(
            record.take::<i64>("first_name"),
            Err(RecordError { field: "first_name", expected: "integer", found: "text" })
        );
    }
}
