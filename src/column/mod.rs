//! Typed columns: parse raw fields, serialize typed values, validate them.

pub mod arrow;
pub mod boolean;
pub mod datetime;
pub mod kind;
mod numeric;
mod text;
pub mod value;

pub use self::arrow::{map_to_arrow_type, to_arrow_field};
pub use boolean::BooleanMap;
pub use datetime::{DateTimeFormat, Zone};
pub use kind::{ColumnKind, CustomKind};
pub use value::{Input, Value};

use encoding_rs::{Encoding, UTF_8};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::dialect::{DialectConfig, Schema};
use crate::error::{ConversionError, ValidationError};
use crate::validate::{Validator, ValidatorChain};

/// Construction order shared by every column in the process. Starts at zero
/// when the process starts and is never reset.
static NEXT_ORDER: AtomicU64 = AtomicU64::new(0);

fn next_order() -> u64 {
    NEXT_ORDER.fetch_add(1, Ordering::Relaxed)
}

/// Back-references recorded when a column is attached to a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub schema: String,
    pub name: String,
    pub dialect: DialectConfig,
}

/// A typed field definition.
///
/// Columns are deliberately not `Clone`: each one owns a unique
/// construction-order index.
#[derive(Debug)]
pub struct Column {
    kind: ColumnKind,
    title: Option<String>,
    required: bool,
    validators: ValidatorChain,
    order_index: u64,
    attachment: Option<Attachment>,
}

impl Column {
    pub fn new(kind: ColumnKind) -> Self {
        Self {
            kind,
            title: None,
            required: true,
            validators: ValidatorChain::default(),
            order_index: next_order(),
            attachment: None,
        }
    }

    pub fn string() -> Self {
        Self::new(ColumnKind::String)
    }

    /// Text stored as UTF-8 bytes.
    pub fn unicode() -> Self {
        Self::unicode_with(UTF_8)
    }

    pub fn unicode_with(encoding: &'static Encoding) -> Self {
        Self::new(ColumnKind::Unicode(encoding))
    }

    pub fn integer() -> Self {
        Self::new(ColumnKind::Integer)
    }

    pub fn float() -> Self {
        Self::new(ColumnKind::Float)
    }

    pub fn float_with_separators() -> Self {
        Self::new(ColumnKind::FloatWithSeparators)
    }

    pub fn boolean() -> Self {
        Self::boolean_with(BooleanMap::default())
    }

    pub fn boolean_with(map: BooleanMap) -> Self {
        Self::new(ColumnKind::Boolean(map))
    }

    pub fn decimal() -> Self {
        Self::new(ColumnKind::Decimal)
    }

    pub fn datetime() -> Self {
        Self::datetime_with(DateTimeFormat::default())
    }

    pub fn datetime_with(format: DateTimeFormat) -> Self {
        Self::new(ColumnKind::DateTime(format))
    }

    pub fn date() -> Self {
        Self::date_with(DateTimeFormat::default())
    }

    pub fn date_with(format: DateTimeFormat) -> Self {
        Self::new(ColumnKind::Date(format))
    }

    pub fn custom<P, S>(name: impl Into<String>, parse: P, serialize: S) -> Self
    where
        P: Fn(&str) -> Result<Value, ConversionError> + Send + Sync + 'static,
        S: Fn(&Value) -> Result<String, ConversionError> + Send + Sync + 'static,
    {
        Self::new(ColumnKind::Custom(CustomKind {
            name: name.into(),
            parse: Arc::new(parse),
            serialize: Arc::new(serialize),
        }))
    }

    /// Set the display title. An empty string is kept as-is.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Builder form of [`Column::register_validator`].
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn order_index(&self) -> u64 {
        self.order_index
    }

    pub fn validators(&self) -> &ValidatorChain {
        &self.validators
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Field name, once attached.
    pub fn name(&self) -> Option<&str> {
        self.attachment.as_ref().map(|a| a.name.as_str())
    }

    /// Convert a raw field (or an already-typed value) into this column's
    /// native value.
    pub fn parse<'a>(&self, input: impl Into<Input<'a>>) -> Result<Value, ConversionError> {
        self.kind.parse(input.into())
    }

    /// Render a typed value as text. Date and date-time columns always use
    /// their primary format.
    pub fn serialize(&self, value: &Value) -> Result<String, ConversionError> {
        self.kind.serialize(value)
    }

    /// Render a typed value as bytes; unicode columns apply their encoding.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, ConversionError> {
        self.kind.encode(value)
    }

    /// Run the validator chain against a typed value.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.validators
            .run(value, |v| self.kind.parse(Input::Value(v.clone())))
    }

    /// Append a check to the chain. The returned handle can be registered on
    /// other columns too.
    pub fn register_validator<F>(&mut self, check: F) -> Validator
    where
        F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        let validator: Validator = Arc::new(check);
        self.validators.push(Arc::clone(&validator));
        validator
    }

    /// Hand this column to `schema` under `name`, filling in the default
    /// title (underscores become spaces) when none was given.
    pub fn attach<S>(mut self, schema: &mut S, name: &str) -> Result<(), S::Error>
    where
        S: Schema + ?Sized,
    {
        if self.title.is_none() {
            self.title = Some(name.replace('_', " "));
        }
        self.attachment = Some(Attachment {
            schema: schema.name().to_string(),
            name: name.to_string(),
            dialect: schema.config().clone(),
        });
        debug!(
            schema = schema.name(),
            column = name,
            kind = self.kind.name(),
            order = self.order_index,
            "attaching column"
        );
        schema.add_column(self)
    }
}
