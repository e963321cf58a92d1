//! Typed columns for tabular text data.
//!
//! A [`Column`] turns a raw field into a native [`Value`], renders it back,
//! and validates it through an ordered chain of checks. Columns are attached
//! to a [`Schema`] (see [`Dialect`]) under a field name.

pub mod column;
pub mod definition;
pub mod dialect;
pub mod error;
pub mod validate;

pub use column::{BooleanMap, Column, ColumnKind, DateTimeFormat, Input, Value, Zone};
pub use definition::{load_dialect, load_table, ColumnDef, TableDef};
pub use dialect::{Dialect, DialectConfig, Schema};
pub use error::{ConversionError, RecordError, SchemaError, ValidationError};
pub use validate::{Validator, ValidatorChain};
