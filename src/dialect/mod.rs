//! The schema side of column attachment: an ordered set of named columns and
//! the record-level operations built on them.

pub mod record;
pub mod utils;

use arrow::datatypes::Schema as ArrowSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::column::{to_arrow_field, Column};
use crate::error::SchemaError;

/// Whatever owns attached columns.
pub trait Schema {
    type Error;

    fn name(&self) -> &str;

    fn config(&self) -> &DialectConfig;

    /// Take ownership of an attached column.
    fn add_column(&mut self, column: Column) -> Result<(), Self::Error>;
}

/// How raw fields are cleaned before they reach a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    /// Trim whitespace and one pair of surrounding double quotes.
    pub trim: bool,
    /// Field values that mean "no value". The first one is also what absent
    /// values serialize to.
    pub null_tokens: Vec<String>,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            trim: true,
            null_tokens: vec![String::new()],
        }
    }
}

impl DialectConfig {
    pub fn is_null(&self, field: &str) -> bool {
        self.null_tokens.iter().any(|t| t == field)
    }

    pub fn null_token(&self) -> &str {
        self.null_tokens.first().map(String::as_str).unwrap_or("")
    }
}

/// An ordered collection of columns, sorted by construction order.
#[derive(Debug)]
pub struct Dialect {
    name: String,
    config: DialectConfig,
    columns: Vec<Column>,
}

impl Dialect {
    pub fn new(name: impl Into<String>, config: DialectConfig) -> Self {
        Self {
            name: name.into(),
            config,
            columns: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == Some(name))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Header row: each column's title.
    pub fn titles(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|c| c.title().unwrap_or_default())
            .collect()
    }

    pub fn arrow_schema(&self) -> Arc<ArrowSchema> {
        let fields: Vec<_> = self.columns.iter().map(to_arrow_field).collect();
        Arc::new(ArrowSchema::new(fields))
    }
}

impl Schema for Dialect {
    type Error = SchemaError;

    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &DialectConfig {
        &self.config
    }

    fn add_column(&mut self, column: Column) -> Result<(), SchemaError> {
        let name = column.name().ok_or(SchemaError::Unnamed)?;
        if self.column(name).is_some() {
            return Err(SchemaError::DuplicateColumn {
                schema: self.name.clone(),
                name: name.to_string(),
            });
        }
        let at = self
            .columns
            .partition_point(|c| c.order_index() < column.order_index());
        debug!(dialect = %self.name, column = name, position = at, "added column");
        self.columns.insert(at, column);
        Ok(())
    }
}
