//! Typed field access on a JSON document tree.
//!
//! Every accessor takes the dotted path of the field for error messages
//! so a failure names exactly what was missing or mistyped.

use crate::error::DocumentError;
use serde_json::{Map, Value};

pub(crate) type Object = Map<String, Value>;

fn field<'a>(object: &'a Object, key: &str, path: &str) -> Result<&'a Value, DocumentError> {
    object
        .get(key)
        .ok_or_else(|| DocumentError::MissingField(path.to_string()))
}

fn wrong_type(path: &str, expected: &'static str) -> DocumentError {
    DocumentError::WrongType {
        field: path.to_string(),
        expected,
    }
}

/// View a value as an object.
pub(crate) fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Object, DocumentError> {
    value.as_object().ok_or_else(|| wrong_type(path, "object"))
}

pub(crate) fn get_object<'a>(
    object: &'a Object,
    key: &str,
    path: &str,
) -> Result<&'a Object, DocumentError> {
    as_object(field(object, key, path)?, path)
}

pub(crate) fn get_array<'a>(
    object: &'a Object,
    key: &str,
    path: &str,
) -> Result<&'a Vec<Value>, DocumentError> {
    field(object, key, path)?
        .as_array()
        .ok_or_else(|| wrong_type(path, "array"))
}

pub(crate) fn get_str<'a>(object: &'a Object, key: &str, path: &str) -> Result<&'a str, DocumentError> {
    as_str(field(object, key, path)?, path)
}

pub(crate) fn as_str<'a>(value: &'a Value, path: &str) -> Result<&'a str, DocumentError> {
    value.as_str().ok_or_else(|| wrong_type(path, "string"))
}

/// Optional string field: absent and `null` both read as `None`.
pub(crate) fn get_opt_str<'a>(
    object: &'a Object,
    key: &str,
    path: &str,
) -> Result<Option<&'a str>, DocumentError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_str(value, path).map(Some),
    }
}

pub(crate) fn get_u64(object: &Object, key: &str, path: &str) -> Result<u64, DocumentError> {
    field(object, key, path)?
        .as_u64()
        .ok_or_else(|| wrong_type(path, "non-negative integer"))
}

pub(crate) fn get_i64(object: &Object, key: &str, path: &str) -> Result<i64, DocumentError> {
    as_i64(field(object, key, path)?, path)
}

pub(crate) fn as_i64(value: &Value, path: &str) -> Result<i64, DocumentError> {
    value.as_i64().ok_or_else(|| wrong_type(path, "integer"))
}
