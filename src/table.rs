use std::fs::File;
use std::io::Read;
use std::ops::Deref;
use std::path::Path;

use chrono_tz::Tz;
use indexmap::IndexMap;
use serde_json::Value;

use crate::errors::*;
use crate::range::DateRange;
use crate::scope::{BetweenFilter, TimestampColumn};
use crate::timestamp;

/// One row, keeping the column order it was loaded with.
pub type Record = IndexMap<String, Value>;

/// An in-memory collection of JSON rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    timestamp_column: Option<String>,
    rows: Vec<Record>,
}

impl Table {
    pub fn new(rows: Vec<Record>) -> Self {
        Table {
            timestamp_column: None,
            rows,
        }
    }

    /// Load a JSON array of objects.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).context("Unable to open records file")?;
        let table = Table::from_reader(file)?;
        log::info!(
            "Loaded {} records from {}",
            table.len(),
            path.as_ref().display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rows: Vec<Record> =
            serde_json::from_reader(reader).context("Records were not a JSON array of objects")?;
        Ok(Table::new(rows))
    }

    /// Use `column` for this table instead of the configured default.
    pub fn with_timestamp_column<S: Into<String>>(mut self, column: S) -> Self {
        self.timestamp_column = Some(column.into());
        self
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }
}

impl From<Vec<Record>> for Table {
    fn from(value: Vec<Record>) -> Self {
        Table::new(value)
    }
}

impl Deref for Table {
    type Target = [Record];

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

impl TimestampColumn for Table {
    fn timestamp_column(&self) -> Option<&str> {
        self.timestamp_column.as_deref()
    }
}

impl BetweenFilter for Table {
    type Output = Table;

    /// Rows without the column, or with `null` in it, never match.
    fn filter_between(&self, column: &str, range: &DateRange, timezone: Tz) -> Result<Table> {
        let mut rows = Vec::new();
        for row in &self.rows {
            let Some(at) = row_timestamp(row, column, timezone)? else {
                continue;
            };
            if range.contains(at) {
                rows.push(row.clone());
            }
        }
        log::debug!(
            "{} of {} rows have `{}` in {}",
            rows.len(),
            self.rows.len(),
            column,
            range
        );

        Ok(Table {
            timestamp_column: self.timestamp_column.clone(),
            rows,
        })
    }
}

/// Strings and Unix seconds alike, read as wall-clock time in `tz`.
fn row_timestamp(row: &Record, column: &str, tz: Tz) -> Result<Option<chrono::NaiveDateTime>> {
    let invalid = |value: &Value| Error::InvalidTimestamp {
        column: column.to_string(),
        value: value.to_string(),
    };

    let value = match row.get(column) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    let parsed = match value {
        Value::String(s) => timestamp::parse_in(s, tz),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| timestamp::from_unix_seconds(secs, tz)),
        _ => None,
    };
    parsed.map(Some).ok_or_else(|| invalid(value))
}
