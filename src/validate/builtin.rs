// src/validate/builtin.rs

use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::Arc;

use super::Validator;
use crate::column::Value;
use crate::error::ValidationError;

fn wrong_type(check: &str, value: &Value) -> ValidationError {
    ValidationError::rejected(format!(
        "{check} does not apply to a {} value",
        value.type_name()
    ))
}

/// Numeric values must lie within `min..=max`.
pub fn range(min: f64, max: f64) -> Validator {
    Arc::new(move |value: &Value| -> Result<(), ValidationError> {
        let x = value.as_f64().ok_or_else(|| wrong_type("range", value))?;
        if (min..=max).contains(&x) {
            Ok(())
        } else {
            Err(ValidationError::rejected(format!(
                "{value} is outside {min}..={max}"
            )))
        }
    })
}

/// String values must be one of `allowed`.
pub fn one_of<I, S>(allowed: I) -> Validator
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
    Arc::new(move |value: &Value| -> Result<(), ValidationError> {
        let s = value.as_str().ok_or_else(|| wrong_type("one_of", value))?;
        if allowed.iter().any(|a| a == s) {
            Ok(())
        } else {
            Err(ValidationError::rejected(format!(
                "{s:?} is not one of [{}]",
                allowed.join(", ")
            )))
        }
    })
}

/// String values must match `pattern`.
pub fn matches(pattern: Regex) -> Validator {
    Arc::new(move |value: &Value| -> Result<(), ValidationError> {
        let s = value.as_str().ok_or_else(|| wrong_type("matches", value))?;
        if pattern.is_match(s) {
            Ok(())
        } else {
            Err(ValidationError::rejected(format!(
                "{s:?} does not match /{}/",
                pattern.as_str()
            )))
        }
    })
}

/// String values may hold at most `max` characters.
pub fn max_length(max: usize) -> Validator {
    Arc::new(move |value: &Value| -> Result<(), ValidationError> {
        let s = value
            .as_str()
            .ok_or_else(|| wrong_type("max_length", value))?;
        let len = s.chars().count();
        if len <= max {
            Ok(())
        } else {
            Err(ValidationError::rejected(format!(
                "{len} characters exceeds the limit of {max}"
            )))
        }
    })
}

/// Date and date-time values must not precede `earliest` (compared on local
/// wall-clock time).
pub fn not_before(earliest: NaiveDateTime) -> Validator {
    Arc::new(move |value: &Value| -> Result<(), ValidationError> {
        let dt = value
            .as_naive_datetime()
            .ok_or_else(|| wrong_type("not_before", value))?;
        if dt >= earliest {
            Ok(())
        } else {
            Err(ValidationError::rejected(format!(
                "{value} is before {earliest}"
            )))
        }
    })
}
