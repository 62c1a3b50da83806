//! Typed column access over result rows.

use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use chrono::NaiveDateTime;
use tokio_postgres::Row;

/// Typed, label-addressed access to the columns of one result row.
///
/// Each getter returns `Ok(None)` for SQL `NULL` and an error when the column
/// is missing or holds an incompatible type.
pub trait ColumnSource {
    fn get_bool(&self, label: &str) -> OrmResult<Option<bool>>;

    fn get_i32(&self, label: &str) -> OrmResult<Option<i32>>;

    fn get_i64(&self, label: &str) -> OrmResult<Option<i64>>;

    fn get_f64(&self, label: &str) -> OrmResult<Option<f64>>;

    fn get_string(&self, label: &str) -> OrmResult<Option<String>>;

    fn get_timestamp(&self, label: &str) -> OrmResult<Option<NaiveDateTime>>;

    fn get_bytes(&self, label: &str) -> OrmResult<Option<Vec<u8>>>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning OrmError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> OrmResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> OrmResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| OrmError::decode(column, e.to_string()))
    }
}

impl ColumnSource for Row {
    fn get_bool(&self, label: &str) -> OrmResult<Option<bool>> {
        self.try_get_column(label)
    }

    fn get_i32(&self, label: &str) -> OrmResult<Option<i32>> {
        self.try_get_column(label)
    }

    fn get_i64(&self, label: &str) -> OrmResult<Option<i64>> {
        self.try_get_column(label)
    }

    fn get_f64(&self, label: &str) -> OrmResult<Option<f64>> {
        self.try_get_column(label)
    }

    fn get_string(&self, label: &str) -> OrmResult<Option<String>> {
        self.try_get_column(label)
    }

    fn get_timestamp(&self, label: &str) -> OrmResult<Option<NaiveDateTime>> {
        self.try_get_column(label)
    }

    fn get_bytes(&self, label: &str) -> OrmResult<Option<Vec<u8>>> {
        self.try_get_column(label)
    }
}

/// An owned row of labelled values, detached from any connection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueRow {
    columns: Vec<(String, Value)>,
}

impl ValueRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column (builder style).
    pub fn with(mut self, label: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(label, value);
        self
    }

    /// Append a column, replacing an existing one with the same label.
    pub fn push(&mut self, label: impl Into<String>, value: impl Into<Value>) {
        let label = label.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(l, _)| *l == label) {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((label, value)),
        }
    }

    pub fn value(&self, label: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn typed<T>(
        &self,
        label: &str,
        expected: &str,
        extract: impl FnOnce(&Value) -> Option<T>,
    ) -> OrmResult<Option<T>> {
        let value = self
            .value(label)
            .ok_or_else(|| OrmError::decode(label, "column not found"))?;
        if value.is_null() {
            return Ok(None);
        }
        extract(value).map(Some).ok_or_else(|| {
            OrmError::decode(
                label,
                format!("expected {expected}, found {}", value.type_label()),
            )
        })
    }
}

impl ColumnSource for ValueRow {
    fn get_bool(&self, label: &str) -> OrmResult<Option<bool>> {
        self.typed(label, "bool", |v| match v {
            Value::Bool(b) => Some(*b),
            _ => None,
        })
    }

    fn get_i32(&self, label: &str) -> OrmResult<Option<i32>> {
        self.typed(label, "i32", |v| match v {
            Value::I32(n) => Some(*n),
            _ => None,
        })
    }

    fn get_i64(&self, label: &str) -> OrmResult<Option<i64>> {
        self.typed(label, "i64", |v| match v {
            Value::I64(n) => Some(*n),
            _ => None,
        })
    }

    fn get_f64(&self, label: &str) -> OrmResult<Option<f64>> {
        self.typed(label, "f64", |v| match v {
            Value::F64(n) => Some(*n),
            _ => None,
        })
    }

    fn get_string(&self, label: &str) -> OrmResult<Option<String>> {
        self.typed(label, "text", |v| match v {
            Value::Text(s) => Some(s.clone()),
            _ => None,
        })
    }

    fn get_timestamp(&self, label: &str) -> OrmResult<Option<NaiveDateTime>> {
        self.typed(label, "timestamp", |v| match v {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        })
    }

    fn get_bytes(&self, label: &str) -> OrmResult<Option<Vec<u8>>> {
        self.typed(label, "bytes", |v| match v {
            Value::Bytes(b) => Some(b.clone()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_row_reads_typed_columns() {
        let row = ValueRow::new().with("id", 7_i64).with("name", "alice");
        assert_eq!(row.get_i64("id").unwrap(), Some(7));
        assert_eq!(row.get_string("name").unwrap(), Some("alice".to_string()));
    }

    #[test]
    fn value_row_null_is_none() {
        let row = ValueRow::new().with("email", Value::Null);
        assert_eq!(row.get_string("email").unwrap(), None);
    }

    #[test]
    fn value_row_missing_column_is_decode_error() {
        let row = ValueRow::new();
        let err = row.get_i64("id").unwrap_err();
        assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "id"));
    }

    #[test]
    fn value_row_type_mismatch_is_decode_error() {
        let row = ValueRow::new().with("id", "seven");
        let err = row.get_i64("id").unwrap_err();
        assert!(err.to_string().contains("expected i64, found text"));
    }

    #[test]
    fn push_replaces_existing_label() {
        let mut row = ValueRow::new().with("name", "a");
        row.push("name", "b");
        assert_eq!(row.len(), 1);
        assert_eq!(row.value("name"), Some(&Value::Text("b".to_string())));
    }
}
