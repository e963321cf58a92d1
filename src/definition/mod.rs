//! Declarative table definitions (JSON or YAML) and the code that turns them
//! into attached columns.

pub mod types;

pub use types::{ColumnDef, TableDef};

use anyhow::{anyhow, bail, Context, Result};
use encoding_rs::Encoding;
use std::{fs, path::Path};
use tracing::{debug, instrument, warn};

use crate::column::{BooleanMap, Column, ColumnKind, DateTimeFormat, Zone};
use crate::dialect::Dialect;

/// Map a definition's `ty` token onto a column kind.
///
/// Accepted tokens (case-insensitive):
/// - STRING, VARCHAR*, CHAR*        → String
/// - UNICODE, TEXT                  → Unicode (utf-8 unless `encoding` says otherwise)
/// - INTEGER, INT, BIGINT           → Integer
/// - FLOAT, DOUBLE                  → Float
/// - FLOAT_WITH_SEPARATORS, FLOAT_SEP → FloatWithSeparators
/// - BOOLEAN, BOOL                  → Boolean
/// - DECIMAL*, NUMERIC*, NUMBER     → Decimal
/// - DATETIME, TIMESTAMP*           → DateTime
/// - DATE                           → Date
pub fn map_to_kind(def: &ColumnDef) -> Result<ColumnKind> {
    let upper = def.ty.trim().to_ascii_uppercase();
    let kind = if upper == "STRING" || upper.starts_with("VARCHAR") || upper.starts_with("CHAR") {
        ColumnKind::String
    } else if upper == "UNICODE" || upper == "TEXT" {
        ColumnKind::Unicode(encoding_of(def)?)
    } else if upper == "INTEGER" || upper == "INT" || upper == "BIGINT" {
        ColumnKind::Integer
    } else if upper == "FLOAT" || upper == "DOUBLE" {
        ColumnKind::Float
    } else if upper == "FLOAT_WITH_SEPARATORS" || upper == "FLOAT_SEP" {
        ColumnKind::FloatWithSeparators
    } else if upper == "BOOLEAN" || upper == "BOOL" {
        ColumnKind::Boolean(boolean_map_of(def))
    } else if upper == "NUMBER" || upper.starts_with("DECIMAL") || upper.starts_with("NUMERIC") {
        ColumnKind::Decimal
    } else if upper == "DATETIME" || upper.starts_with("TIMESTAMP") {
        ColumnKind::DateTime(format_of(def)?)
    } else if upper == "DATE" {
        ColumnKind::Date(format_of(def)?)
    } else {
        bail!("column `{}` has unknown type `{}`", def.name, def.ty);
    };

    let is_temporal = matches!(kind, ColumnKind::DateTime(_) | ColumnKind::Date(_));
    if !is_temporal && (def.format.is_some() || !def.formats.is_empty() || def.timezone.is_some())
    {
        warn!(column = %def.name, ty = %def.ty, "ignoring date settings on non-date column");
    }
    Ok(kind)
}

fn encoding_of(def: &ColumnDef) -> Result<&'static Encoding> {
    match &def.encoding {
        None => Ok(encoding_rs::UTF_8),
        Some(label) => Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| anyhow!("column `{}` has unknown encoding `{}`", def.name, label)),
    }
}

fn boolean_map_of(def: &ColumnDef) -> BooleanMap {
    let mut map = if def.true_values.is_empty() && def.false_values.is_empty() {
        BooleanMap::default()
    } else {
        let pairs = def
            .true_values
            .iter()
            .map(|t| (t.clone(), true))
            .chain(def.false_values.iter().map(|f| (f.clone(), false)));
        BooleanMap::new(pairs)
    };
    if let Some(t) = &def.true_token {
        map = map.with_true_token(t);
    }
    if let Some(f) = &def.false_token {
        map = map.with_false_token(f);
    }
    map
}

fn format_of(def: &ColumnDef) -> Result<DateTimeFormat> {
    let primary = def
        .format
        .as_deref()
        .unwrap_or(crate::column::datetime::DEFAULT_FORMAT);
    let mut format = DateTimeFormat::new(primary).with_alternates(def.formats.iter().cloned());
    if let Some(tz) = &def.timezone {
        let zone: Zone = tz
            .parse()
            .map_err(|e| anyhow!("column `{}` has bad timezone `{}`: {}", def.name, tz, e))?;
        format = format.with_timezone(zone);
    }
    Ok(format)
}

impl ColumnDef {
    /// Build an unattached column.
    pub fn build(&self) -> Result<Column> {
        let mut column = Column::new(map_to_kind(self)?).with_required(self.required);
        if let Some(title) = &self.title {
            column = column.with_title(title);
        }
        Ok(column)
    }
}

impl TableDef {
    /// Build a dialect with every column attached, in declaration order.
    #[instrument(level = "debug", skip(self), fields(table = %self.name))]
    pub fn build(&self) -> Result<Dialect> {
        let mut dialect = Dialect::new(&self.name, self.dialect.clone());
        for def in &self.columns {
            def.build()?
                .attach(&mut dialect, &def.name)
                .with_context(|| format!("attaching `{}` to `{}`", def.name, self.name))?;
        }
        debug!(columns = dialect.len(), "built table");
        Ok(dialect)
    }
}

/// Read a table definition from a `.json`, `.yaml` or `.yml` file.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<TableDef> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase);
    let def: TableDef = match ext.as_deref() {
        Some("json") => {
            serde_json::from_str(&text).with_context(|| format!("parsing {:?}", path))?
        }
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&text).with_context(|| format!("parsing {:?}", path))?
        }
        _ => bail!("unsupported definition file {:?}", path),
    };
    debug!(table = %def.name, columns = def.columns.len(), "loaded definition");
    Ok(def)
}

/// Load and build in one step.
pub fn load_dialect<P: AsRef<Path>>(path: P) -> Result<Dialect> {
    load_table(path)?.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Value;
    use crate::dialect::Schema;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::tempdir;
    use tracing_subscriber::{fmt, EnvFilter};

    fn init_logging() {
        let _ = fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_target(false)
            .try_init();
    }

    const JSON_DEF: &str = r#"{
        "name": "price",
        "dialect": { "trim": true, "null_tokens": ["", "NULL"] },
        "columns": [
            { "name": "settlement_date", "ty": "DATE",
              "format": "%Y/%m/%d %H:%M:%S", "formats": ["%Y-%m-%d"],
              "timezone": "+10:00" },
            { "name": "region_id", "ty": "VARCHAR2(10)", "title": "Region" },
            { "name": "rrp", "ty": "decimal(15,5)" },
            { "name": "intervention", "ty": "boolean",
              "true_values": ["1"], "false_values": ["0"], "required": false }
        ]
    }"#;

    #[test]
    fn builds_from_json_file() {
        init_logging();
        let dir = tempdir().unwrap();
        let path = dir.path().join("price.json");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(JSON_DEF.as_bytes())
            .unwrap();

        let dialect = load_dialect(&path).unwrap();
        assert_eq!(dialect.name(), "price");
        assert_eq!(
            dialect.titles(),
            vec!["settlement date", "Region", "rrp", "intervention"]
        );

        let record = dialect
            .parse_record(&["2025-06-14", "NSW1", "45.67000", "NULL"])
            .unwrap();
        assert_eq!(
            record[0],
            Some(Value::Date(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()))
        );
        assert_eq!(record[3], None);
        let out = dialect.serialize_record(&record).unwrap();
        assert_eq!(out, vec!["2025/06/14 00:00:00", "NSW1", "45.67000", ""]);
    }

    #[test]
    fn builds_from_yaml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flags.yml");
        std::fs::write(
            &path,
            "name: flags\ncolumns:\n  - name: active\n    ty: bool\n    true_values: [yes, y]\n    false_values: [no, n]\n    true_token: Y\n    false_token: N\n",
        )
        .unwrap();

        let dialect = load_dialect(&path).unwrap();
        let active = dialect.column("active").unwrap();
        assert_eq!(active.parse("YES").unwrap(), Value::Bool(true));
        assert_eq!(active.serialize(&Value::Bool(false)).unwrap(), "N");
    }

    #[test]
    fn reverse_tokens_default_to_the_inverse() {
        let def: ColumnDef = serde_json::from_str(
            r#"{ "name": "flag", "ty": "boolean", "true_values": ["yes"], "false_values": ["no"] }"#,
        )
        .unwrap();
        let column = def.build().unwrap();
        assert_eq!(column.serialize(&Value::Bool(true)).unwrap(), "yes");
        assert!(column.is_required());
    }

    #[test]
    fn a_single_output_token_is_kept() {
        let def: ColumnDef =
            serde_json::from_str(r#"{ "name": "flag", "ty": "boolean", "true_token": "Y" }"#)
                .unwrap();
        let column = def.build().unwrap();
        assert_eq!(column.serialize(&Value::Bool(true)).unwrap(), "Y");
        assert_eq!(column.serialize(&Value::Bool(false)).unwrap(), "false");
        assert_eq!(column.parse("true").unwrap(), Value::Bool(true));
    }

    #[test]
    fn named_timezones_are_accepted() {
        let def: ColumnDef = serde_json::from_str(
            r#"{ "name": "at", "ty": "datetime", "format": "%Y-%m-%d %H:%M",
                 "timezone": "Australia/Sydney" }"#,
        )
        .unwrap();
        let column = def.build().unwrap();
        match column.parse("2025-01-15 12:00").unwrap() {
            Value::Zoned(dt) => assert_eq!(dt.offset().local_minus_utc(), 11 * 3600),
            other => panic!("expected zoned value, got {other:?}"),
        }
        assert!(column.parse("2025-10-05 02:30").is_err());
    }

    #[test]
    fn unknown_settings_are_errors() {
        let bad_type: ColumnDef = serde_json::from_str(r#"{ "name": "x", "ty": "blob" }"#).unwrap();
        assert!(bad_type.build().is_err());

        let bad_encoding: ColumnDef =
            serde_json::from_str(r#"{ "name": "x", "ty": "unicode", "encoding": "klingon" }"#)
                .unwrap();
        assert!(bad_encoding.build().is_err());

        let bad_tz: ColumnDef =
            serde_json::from_str(r#"{ "name": "x", "ty": "datetime", "timezone": "Mars" }"#)
                .unwrap();
        assert!(bad_tz.build().is_err());

        let dir = tempdir().unwrap();
        let path = dir.path().join("table.toml");
        std::fs::write(&path, "").unwrap();
        assert!(load_table(&path).is_err());
    }

    #[test]
    fn duplicate_columns_fail_the_build() {
        let def = TableDef {
            name: "dupes".into(),
            dialect: Default::default(),
            columns: vec![
                serde_json::from_str(r#"{ "name": "a", "ty": "int" }"#).unwrap(),
                serde_json::from_str(r#"{ "name": "a", "ty": "string" }"#).unwrap(),
            ],
        };
        let err = def.build().unwrap_err();
        assert!(format!("{err:#}").contains("duplicate column `a`"));
    }

    #[test]
    fn utf16_text_columns() {
        let def: ColumnDef =
            serde_json::from_str(r#"{ "name": "note", "ty": "text", "encoding": "utf-16" }"#)
                .unwrap();
        let column = def.build().unwrap();
        let raw: &[u8] = b"\xff\xfeS\x00p\x00i\x00n\x00\x08\x03a\x00l\x00 \x00T\x00a\x00p\x00";
        let value = column.parse(raw).unwrap();
        assert_eq!(value, Value::Str("Spin\u{308}al Tap".into()));
        assert_eq!(column.encode(&value).unwrap(), raw.to_vec());
    }
}
