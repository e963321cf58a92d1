// src/column/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, TimeUnit};
use std::sync::Arc;

use super::kind::ColumnKind;
use super::Column;

/// Map a column kind onto the Arrow type its parsed values fit in.
///
/// Covers:
/// - String, Unicode, Custom        → Utf8
/// - Integer                        → Int64
/// - Float, FloatWithSeparators     → Float64
/// - Boolean                        → Boolean
/// - Decimal                        → Decimal128(38, 10)
/// - DateTime                       → Timestamp(µs, zone if localized)
/// - Date                           → Date32
pub fn map_to_arrow_type(kind: &ColumnKind) -> DataType {
    match kind {
        ColumnKind::String | ColumnKind::Unicode(_) | ColumnKind::Custom(_) => DataType::Utf8,
        ColumnKind::Integer => DataType::Int64,
        ColumnKind::Float | ColumnKind::FloatWithSeparators => DataType::Float64,
        ColumnKind::Boolean(_) => DataType::Boolean,
        ColumnKind::Decimal => DataType::Decimal128(38, 10),
        ColumnKind::DateTime(fmt) => DataType::Timestamp(
            TimeUnit::Microsecond,
            fmt.timezone().map(|tz| Arc::from(tz.to_string())),
        ),
        ColumnKind::Date(_) => DataType::Date32,
    }
}

/// Arrow field for an attached column; optional columns are nullable.
pub fn to_arrow_field(column: &Column) -> ArrowField {
    ArrowField::new(
        column.name().unwrap_or_default(),
        map_to_arrow_type(column.kind()),
        /* nullable = */ !column.is_required(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::datetime::DateTimeFormat;
    use chrono::FixedOffset;

    #[test]
    fn localized_timestamps_carry_their_offset() {
        let aest = FixedOffset::east_opt(10 * 3600).unwrap();
        let kind = ColumnKind::DateTime(DateTimeFormat::default().with_timezone(aest));
        assert_eq!(
            map_to_arrow_type(&kind),
            DataType::Timestamp(TimeUnit::Microsecond, Some(Arc::from("+10:00")))
        );
        assert_eq!(
            map_to_arrow_type(&ColumnKind::DateTime(DateTimeFormat::default())),
            DataType::Timestamp(TimeUnit::Microsecond, None)
        );
    }

    #[test]
    fn named_zones_keep_their_name() {
        let kind = ColumnKind::DateTime(
            DateTimeFormat::default().with_timezone(chrono_tz::Australia::Sydney),
        );
        assert_eq!(
            map_to_arrow_type(&kind),
            DataType::Timestamp(TimeUnit::Microsecond, Some(Arc::from("Australia/Sydney")))
        );
    }

    #[test]
    fn scalar_kinds() {
        assert_eq!(map_to_arrow_type(&ColumnKind::Integer), DataType::Int64);
        assert_eq!(
            map_to_arrow_type(&ColumnKind::FloatWithSeparators),
            DataType::Float64
        );
        assert_eq!(
            map_to_arrow_type(&ColumnKind::Date(DateTimeFormat::default())),
            DataType::Date32
        );
    }
}
