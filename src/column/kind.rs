// src/column/kind.rs

use encoding_rs::Encoding;
use std::fmt;
use std::sync::Arc;

use super::boolean::BooleanMap;
use super::datetime::DateTimeFormat;
use super::value::{Input, Value};
use super::{numeric, text};
use crate::error::ConversionError;

pub type ParseFn = Arc<dyn Fn(&str) -> Result<Value, ConversionError> + Send + Sync>;
pub type SerializeFn = Arc<dyn Fn(&Value) -> Result<String, ConversionError> + Send + Sync>;

/// A caller-defined column type.
#[derive(Clone)]
pub struct CustomKind {
    pub name: String,
    pub parse: ParseFn,
    pub serialize: SerializeFn,
}

impl fmt::Debug for CustomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomKind")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The built-in column types, plus an escape hatch for custom ones.
#[derive(Debug, Clone)]
pub enum ColumnKind {
    String,
    Unicode(&'static Encoding),
    Integer,
    Float,
    FloatWithSeparators,
    Boolean(BooleanMap),
    Decimal,
    DateTime(DateTimeFormat),
    Date(DateTimeFormat),
    Custom(CustomKind),
}

impl ColumnKind {
    pub fn name(&self) -> &str {
        match self {
            ColumnKind::String => "string",
            ColumnKind::Unicode(_) => "unicode",
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::FloatWithSeparators => "float_with_separators",
            ColumnKind::Boolean(_) => "boolean",
            ColumnKind::Decimal => "decimal",
            ColumnKind::DateTime(_) => "datetime",
            ColumnKind::Date(_) => "date",
            ColumnKind::Custom(c) => &c.name,
        }
    }

    pub(crate) fn parse(&self, input: Input<'_>) -> Result<Value, ConversionError> {
        match self {
            ColumnKind::String => text::parse_string(input),
            ColumnKind::Unicode(enc) => text::parse_unicode(*enc, input),
            ColumnKind::Integer => numeric::parse_integer(input),
            ColumnKind::Float => numeric::parse_float(input),
            ColumnKind::FloatWithSeparators => numeric::parse_float_with_separators(input),
            ColumnKind::Boolean(map) => map.parse(input),
            ColumnKind::Decimal => numeric::parse_decimal(input),
            ColumnKind::DateTime(fmt) => fmt.parse_datetime(input),
            ColumnKind::Date(fmt) => fmt.parse_date(input),
            ColumnKind::Custom(custom) => match input {
                Input::Value(v) => Ok(v),
                Input::Text(s) => (custom.parse)(s),
                Input::Bytes(b) => match std::str::from_utf8(b) {
                    Ok(s) => (custom.parse)(s),
                    Err(_) => Err(ConversionError::Undecodable {
                        encoding: "UTF-8",
                        raw: String::from_utf8_lossy(b).into_owned(),
                    }),
                },
            },
        }
    }

    pub(crate) fn serialize(&self, value: &Value) -> Result<String, ConversionError> {
        match self {
            ColumnKind::String | ColumnKind::Unicode(_) => text::serialize_string(value),
            ColumnKind::Integer => numeric::serialize_integer(value),
            ColumnKind::Float | ColumnKind::FloatWithSeparators => numeric::serialize_float(value),
            ColumnKind::Boolean(map) => map.serialize(value),
            ColumnKind::Decimal => numeric::serialize_decimal(value),
            ColumnKind::DateTime(fmt) | ColumnKind::Date(fmt) => fmt.serialize(value),
            ColumnKind::Custom(custom) => (custom.serialize)(value),
        }
    }

    pub(crate) fn encode(&self, value: &Value) -> Result<Vec<u8>, ConversionError> {
        match self {
            ColumnKind::Unicode(enc) => text::encode_unicode(*enc, value),
            _ => self.serialize(value).map(String::into_bytes),
        }
    }
}
