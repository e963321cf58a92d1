// src/dialect/record.rs

use super::utils::clean_str;
use super::Dialect;
use crate::column::{Column, Value};
use crate::error::{RecordError, ValidationError};

fn column_name(column: &Column) -> String {
    column.name().unwrap_or_default().to_string()
}

fn column_error(column: &Column, source: impl Into<ValidationError>) -> RecordError {
    RecordError::Column {
        column: column_name(column),
        source: source.into(),
    }
}

impl Dialect {
    fn check_width(&self, found: usize) -> Result<(), RecordError> {
        if found != self.len() {
            return Err(RecordError::FieldCount {
                expected: self.len(),
                found,
            });
        }
        Ok(())
    }

    /// Parse and validate one already-split record. Null tokens become `None`
    /// for optional columns and an error for required ones.
    pub fn parse_record<S: AsRef<str>>(
        &self,
        fields: &[S],
    ) -> Result<Vec<Option<Value>>, RecordError> {
        self.check_width(fields.len())?;

        let config = &self.config;
        let mut out = Vec::with_capacity(fields.len());
        for (column, raw) in self.columns.iter().zip(fields) {
            let raw = raw.as_ref();
            let field = if config.trim { clean_str(raw) } else { raw };
            if config.is_null(field) {
                if column.is_required() {
                    return Err(RecordError::MissingField {
                        column: column_name(column),
                    });
                }
                out.push(None);
                continue;
            }

            let value = column.parse(field).map_err(|e| column_error(column, e))?;
            column.validate(&value).map_err(|e| column_error(column, e))?;
            out.push(Some(value));
        }
        Ok(out)
    }

    /// Serialize one record; absent values become the dialect's null token.
    pub fn serialize_record(&self, values: &[Option<Value>]) -> Result<Vec<String>, RecordError> {
        self.check_width(values.len())?;

        self.columns
            .iter()
            .zip(values)
            .map(|(column, value)| match value {
                Some(v) => column.serialize(v).map_err(|e| column_error(column, e)),
                None if column.is_required() => Err(RecordError::MissingField {
                    column: column_name(column),
                }),
                None => Ok(self.config.null_token().to_string()),
            })
            .collect()
    }

    /// Validate typed values, e.g. defaults assembled without parsing.
    pub fn validate_record(&self, values: &[Option<Value>]) -> Result<(), RecordError> {
        self.check_width(values.len())?;

        for (column, value) in self.columns.iter().zip(values) {
            match value {
                Some(v) => column.validate(v).map_err(|e| column_error(column, e))?,
                None if column.is_required() => {
                    return Err(RecordError::MissingField {
                        column: column_name(column),
                    })
                }
                None => {}
            }
        }
        Ok(())
    }
}
