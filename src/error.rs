//! Error types for column conversion and validation.

use thiserror::Error;

/// Raised when a raw field cannot be turned into a typed value, or a typed
/// value cannot be rendered back into a field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("invalid {kind} literal {raw:?}: {reason}")]
    Malformed {
        kind: &'static str,
        raw: String,
        reason: String,
    },

    #[error("cannot map {raw:?} to boolean with tokens [{}]", .tokens.join(", "))]
    UnmappedBoolean { raw: String, tokens: Vec<String> },

    #[error("time data {raw:?} does not match any of the formats: {}", quoted(.formats))]
    NoMatchingFormat { raw: String, formats: Vec<String> },

    #[error("cannot decode {raw:?} as {encoding}")]
    Undecodable { encoding: &'static str, raw: String },

    #[error("cannot encode {text:?} as {encoding}")]
    Unencodable { encoding: &'static str, text: String },

    #[error("local time {raw:?} does not exist in {zone}")]
    NonexistentLocalTime { raw: String, zone: String },

    #[error("local time {raw:?} is ambiguous in {zone}")]
    AmbiguousLocalTime { raw: String, zone: String },

    #[error("format {format:?} cannot render this value")]
    Unformattable { format: String },

    #[error("no output token for {value}")]
    Unmapped { value: String },

    #[error("expected a {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    Custom(String),
}

fn quoted(formats: &[String]) -> String {
    formats
        .iter()
        .map(|f| format!("{f:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ConversionError {
    /// The offending raw input, when the failure came from parsing one.
    pub fn raw(&self) -> Option<&str> {
        match self {
            ConversionError::Malformed { raw, .. }
            | ConversionError::UnmappedBoolean { raw, .. }
            | ConversionError::NoMatchingFormat { raw, .. }
            | ConversionError::Undecodable { raw, .. }
            | ConversionError::NonexistentLocalTime { raw, .. }
            | ConversionError::AmbiguousLocalTime { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Raised when a value is unacceptable for a column. Parse failures met while
/// validating surface as [`ValidationError::Conversion`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("{0}")]
    Rejected(String),
}

impl ValidationError {
    pub fn rejected(msg: impl Into<String>) -> Self {
        ValidationError::Rejected(msg.into())
    }
}

/// Raised by [`crate::dialect::Dialect`] when a column cannot be registered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("duplicate column `{name}` in `{schema}`")]
    DuplicateColumn { schema: String, name: String },

    #[error("column has no field name; attach it through `Column::attach`")]
    Unnamed,
}

/// Raised by record-level operations on a [`crate::dialect::Dialect`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("required field `{column}` is missing")]
    MissingField { column: String },

    #[error("column `{column}`: {source}")]
    Column {
        column: String,
        #[source]
        source: ValidationError,
    },
}
