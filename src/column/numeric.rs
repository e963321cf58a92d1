// src/column/numeric.rs

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use super::value::{Input, Value};
use crate::error::ConversionError;

/// Raw inputs reduced to text; typed values are handed back untouched.
enum Raw<'a> {
    Text(&'a str),
    Typed(Value),
}

fn split<'a>(input: Input<'a>, kind: &'static str) -> Result<Raw<'a>, ConversionError> {
    match input {
        Input::Text(s) => Ok(Raw::Text(s.trim())),
        Input::Bytes(b) => std::str::from_utf8(b)
            .map(|s| Raw::Text(s.trim()))
            .map_err(|e| ConversionError::Malformed {
                kind,
                raw: String::from_utf8_lossy(b).into_owned(),
                reason: e.to_string(),
            }),
        Input::Value(v) => Ok(Raw::Typed(v)),
    }
}

fn malformed(kind: &'static str, raw: &str, reason: impl ToString) -> ConversionError {
    ConversionError::Malformed {
        kind,
        raw: raw.to_string(),
        reason: reason.to_string(),
    }
}

fn mismatch(expected: &'static str, found: &Value) -> ConversionError {
    ConversionError::TypeMismatch {
        expected,
        found: found.type_name(),
    }
}

pub(crate) fn parse_integer(input: Input<'_>) -> Result<Value, ConversionError> {
    match split(input, "integer")? {
        Raw::Typed(v @ Value::Int(_)) => Ok(v),
        Raw::Typed(other) => Err(mismatch("integer", &other)),
        Raw::Text(s) => s
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| malformed("integer", s, e)),
    }
}

pub(crate) fn parse_float(input: Input<'_>) -> Result<Value, ConversionError> {
    match split(input, "float")? {
        Raw::Typed(v) => typed_float(v),
        Raw::Text(s) => s
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| malformed("float", s, e)),
    }
}

/// Strip `,` thousands separators before parsing. Separators are removed
/// wherever they appear, so `"1.2,3.4"` collapses to `"1.23.4"` and fails.
pub(crate) fn parse_float_with_separators(input: Input<'_>) -> Result<Value, ConversionError> {
    match split(input, "float")? {
        Raw::Typed(v) => typed_float(v),
        Raw::Text(s) => {
            let stripped: String = s.chars().filter(|c| *c != ',').collect();
            stripped
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| malformed("float", s, e))
        }
    }
}

fn typed_float(v: Value) -> Result<Value, ConversionError> {
    match v {
        Value::Float(_) => Ok(v),
        Value::Int(i) => Ok(Value::Float(i as f64)),
        other => Err(mismatch("float", &other)),
    }
}

/// Exact decimal parse; plain notation first, then scientific.
pub(crate) fn parse_decimal(input: Input<'_>) -> Result<Value, ConversionError> {
    match split(input, "decimal")? {
        Raw::Typed(v @ Value::Decimal(_)) => Ok(v),
        Raw::Typed(Value::Int(i)) => Ok(Value::Decimal(Decimal::from(i))),
        Raw::Typed(Value::Float(x)) => Decimal::from_f64(x)
            .map(Value::Decimal)
            .ok_or_else(|| malformed("decimal", &x.to_string(), "not representable")),
        Raw::Typed(other) => Err(mismatch("decimal", &other)),
        Raw::Text(s) => parse_exact(s)
            .map(Value::Decimal)
            .map_err(|e| malformed("decimal", s, e)),
    }
}

/// Digits that do not fit in a `Decimal` are an error, never rounded.
fn parse_exact(s: &str) -> Result<Decimal, rust_decimal::Error> {
    match s.find(|c| c == 'e' || c == 'E') {
        None => Decimal::from_str_exact(s),
        Some(at) => {
            Decimal::from_str_exact(&s[..at])?;
            Decimal::from_scientific(s)
        }
    }
}

pub(crate) fn serialize_integer(value: &Value) -> Result<String, ConversionError> {
    match value {
        Value::Int(i) => Ok(i.to_string()),
        other => Err(mismatch("integer", other)),
    }
}

/// Shortest string that parses back to the same `f64`; separators are never
/// reinserted.
pub(crate) fn serialize_float(value: &Value) -> Result<String, ConversionError> {
    match value {
        Value::Float(x) => Ok(x.to_string()),
        Value::Int(i) => Ok((*i as f64).to_string()),
        other => Err(mismatch("float", other)),
    }
}

pub(crate) fn serialize_decimal(value: &Value) -> Result<String, ConversionError> {
    match value {
        Value::Decimal(d) => Ok(d.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        other => Err(mismatch("decimal", other)),
    }
}
