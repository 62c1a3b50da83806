//! Row Mapper: converts result rows into records using their shape descriptor.

use crate::accessor::TypeAccessors;
use crate::error::{OrmError, OrmResult};
use crate::record::Record;
use crate::row::ColumnSource;

/// Maps rows into [`Record`] instances through a [`TypeAccessors`] registry.
#[derive(Debug, Clone, Copy)]
pub struct RowMapper<'a> {
    accessors: &'a TypeAccessors,
}

impl<'a> RowMapper<'a> {
    pub fn new(accessors: &'a TypeAccessors) -> Self {
        Self { accessors }
    }

    /// Build one record from one row.
    ///
    /// Every field of the shape is read from the column with the same label
    /// and stored through the field's setter. Any failure is reported as
    /// [`OrmError::Mapping`].
    pub fn map_row<T: Record>(&self, row: &dyn ColumnSource) -> OrmResult<T> {
        let shape = T::shape();
        let mut record = T::default();

        for field in shape.fields() {
            let accessor = self.accessors.get(field.scalar).map_err(|_| {
                OrmError::mapping(
                    shape.type_name(),
                    field.name,
                    format!("no read accessor registered for {}", field.scalar),
                )
            })?;

            let value = (accessor.read)(row, field.column)
                .map_err(|e| OrmError::mapping(shape.type_name(), field.name, e.to_string()))?;

            (field.set)(&mut record, value).map_err(|rejected| {
                OrmError::mapping(
                    shape.type_name(),
                    field.name,
                    format!(
                        "field of type {} rejected a {} value from column '{}'",
                        field.scalar,
                        rejected.type_label(),
                        field.column
                    ),
                )
            })?;
        }

        Ok(record)
    }

    /// Map every row, in order. The whole call fails on the first bad row.
    pub fn map_all<T, R, I>(&self, rows: I) -> OrmResult<Vec<T>>
    where
        T: Record,
        R: ColumnSource,
        I: IntoIterator<Item = R>,
    {
        rows.into_iter().map(|row| self.map_row(&row)).collect()
    }

    /// Map a result that must hold at most one row.
    ///
    /// Semantics:
    /// - 0 rows: `Ok(None)`
    /// - 1 row: `Ok(Some(record))`
    /// - multiple rows: [`OrmError::IntegrityViolation`]
    pub fn map_unique<T, R, I>(&self, rows: I) -> OrmResult<Option<T>>
    where
        T: Record,
        R: ColumnSource,
        I: IntoIterator<Item = R>,
    {
        let mut rows = rows.into_iter();
        let Some(first) = rows.next() else {
            return Ok(None);
        };
        // The row count is checked before any mapping.
        if rows.next().is_some() {
            let got = 2 + rows.count();
            return Err(OrmError::integrity_violation(format!(
                "expected at most one {} row, got {got}",
                T::shape().type_name()
            )));
        }
        self.map_row(&first).map(Some)
    }
}
