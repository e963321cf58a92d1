// src/definition/types.rs

use serde::{Deserialize, Serialize};

use crate::dialect::DialectConfig;

fn default_required() -> bool {
    true
}

/// A single column definition as written in a table definition file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ColumnDef {
    pub name: String,
    pub ty: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Primary strftime format for date/datetime columns.
    #[serde(default)]
    pub format: Option<String>,
    /// Alternate input formats for date/datetime columns.
    #[serde(default)]
    pub formats: Vec<String>,
    /// Fixed offset such as `+10:00`.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Encoding label for unicode columns, e.g. `utf-16`.
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub true_values: Vec<String>,
    #[serde(default)]
    pub false_values: Vec<String>,
    #[serde(default)]
    pub true_token: Option<String>,
    #[serde(default)]
    pub false_token: Option<String>,
}

/// A whole table: dialect settings plus its columns in declaration order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TableDef {
    pub name: String,
    #[serde(default)]
    pub dialect: DialectConfig,
    pub columns: Vec<ColumnDef>,
}
