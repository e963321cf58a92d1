// src/column/boolean.rs

use std::collections::BTreeMap;

use super::value::{Input, Value};
use crate::error::ConversionError;

/// Token mappings for a boolean column.
///
/// Input tokens are lower-cased before lookup, the keys themselves are not:
/// a map with upper-case keys will never match. Keep keys lower-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanMap {
    tokens: BTreeMap<String, bool>,
    true_token: Option<String>,
    false_token: Option<String>,
}

impl Default for BooleanMap {
    fn default() -> Self {
        Self::new([("true", true), ("false", false)])
    }
}

impl BooleanMap {
    /// Build from `token → bool` pairs. The output tokens default to the
    /// inverse of the mapping; when several tokens map to the same bool the
    /// lexicographically last one is used.
    pub fn new<K, I>(tokens: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, bool)>,
    {
        let tokens: BTreeMap<String, bool> =
            tokens.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let mut true_token = None;
        let mut false_token = None;
        for (token, value) in &tokens {
            if *value {
                true_token = Some(token.clone());
            } else {
                false_token = Some(token.clone());
            }
        }
        Self {
            tokens,
            true_token,
            false_token,
        }
    }

    /// Override the output tokens independently of the input mapping.
    pub fn with_reverse(
        self,
        true_token: impl Into<String>,
        false_token: impl Into<String>,
    ) -> Self {
        self.with_true_token(true_token).with_false_token(false_token)
    }

    pub fn with_true_token(mut self, token: impl Into<String>) -> Self {
        self.true_token = Some(token.into());
        self
    }

    pub fn with_false_token(mut self, token: impl Into<String>) -> Self {
        self.false_token = Some(token.into());
        self
    }

    pub fn lookup(&self, token: &str) -> Option<bool> {
        self.tokens.get(token).copied()
    }

    pub fn token_for(&self, value: bool) -> Option<&str> {
        if value {
            self.true_token.as_deref()
        } else {
            self.false_token.as_deref()
        }
    }

    pub(crate) fn parse(&self, input: Input<'_>) -> Result<Value, ConversionError> {
        let raw = match input {
            Input::Value(v @ Value::Bool(_)) => return Ok(v),
            Input::Value(other) => {
                return Err(ConversionError::TypeMismatch {
                    expected: "boolean",
                    found: other.type_name(),
                })
            }
            Input::Text(s) => s.to_string(),
            Input::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        };
        self.lookup(&raw.to_lowercase())
            .map(Value::Bool)
            .ok_or_else(|| ConversionError::UnmappedBoolean {
                raw,
                tokens: self.tokens.keys().cloned().collect(),
            })
    }

    pub(crate) fn serialize(&self, value: &Value) -> Result<String, ConversionError> {
        match value {
            Value::Bool(b) => self
                .token_for(*b)
                .map(str::to_string)
                .ok_or_else(|| ConversionError::Unmapped {
                    value: b.to_string(),
                }),
            other => Err(ConversionError::TypeMismatch {
                expected: "boolean",
                found: other.type_name(),
            }),
        }
    }
}
