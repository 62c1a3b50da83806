//! Type Accessor Mapping: the registry linking scalar types to the operation
//! that reads them from a result column and the one that binds them into a
//! statement parameter.

use crate::error::{OrmError, OrmResult};
use crate::record::Record;
use crate::row::ColumnSource;
use crate::value::{ScalarType, Value};
use std::collections::HashMap;
use std::fmt;
use tokio_postgres::types::ToSql;

/// A parameter ready to be handed to tokio-postgres.
pub type BoxedParam = Box<dyn ToSql + Sync + Send>;

/// Extract a value of one scalar type from a column, by label.
pub type ReadAccessor = fn(&dyn ColumnSource, &str) -> OrmResult<Value>;

/// Turn a value into a bindable parameter; `None` if the value is of another type.
pub type BindAccessor = fn(&Value) -> Option<BoxedParam>;

/// The read/bind pair registered for one scalar type.
#[derive(Clone, Copy)]
pub struct Accessor {
    pub read: ReadAccessor,
    pub bind: BindAccessor,
    pub read_name: &'static str,
    pub bind_name: &'static str,
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("read", &self.read_name)
            .field("bind", &self.bind_name)
            .finish()
    }
}

macro_rules! builtin_accessor {
    ($getter:ident, $setter:ident, $variant:ident) => {{
        fn read(source: &dyn ColumnSource, label: &str) -> OrmResult<Value> {
            Ok(source.$getter(label)?.map_or(Value::Null, Value::$variant))
        }

        fn bind(value: &Value) -> Option<BoxedParam> {
            match value {
                Value::$variant(v) => Some(Box::new(v.clone()) as BoxedParam),
                _ => None,
            }
        }

        Accessor {
            read,
            bind,
            read_name: stringify!($getter),
            bind_name: stringify!($setter),
        }
    }};
}

/// The built-in accessor for a scalar type.
pub fn builtin(ty: ScalarType) -> Accessor {
    match ty {
        ScalarType::Bool => builtin_accessor!(get_bool, set_bool, Bool),
        ScalarType::I32 => builtin_accessor!(get_i32, set_i32, I32),
        ScalarType::I64 => builtin_accessor!(get_i64, set_i64, I64),
        ScalarType::F64 => builtin_accessor!(get_f64, set_f64, F64),
        ScalarType::Text => builtin_accessor!(get_string, set_string, Text),
        ScalarType::Timestamp => builtin_accessor!(get_timestamp, set_timestamp, Timestamp),
        ScalarType::Bytes => builtin_accessor!(get_bytes, set_bytes, Bytes),
    }
}

/// Registry of accessors keyed by scalar type.
#[derive(Debug, Clone, Default)]
pub struct TypeAccessors {
    entries: HashMap<ScalarType, Accessor>,
}

impl TypeAccessors {
    /// A registry with every built-in scalar type.
    pub fn standard() -> Self {
        Self::only(&ScalarType::ALL)
    }

    /// A registry with no accessors at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with the built-in accessors for the given types only.
    pub fn only(types: &[ScalarType]) -> Self {
        let entries = types.iter().map(|&ty| (ty, builtin(ty))).collect();
        Self { entries }
    }

    /// Register (or replace) the accessor for a type.
    pub fn register(&mut self, ty: ScalarType, accessor: Accessor) -> &mut Self {
        self.entries.insert(ty, accessor);
        self
    }

    pub fn contains(&self, ty: ScalarType) -> bool {
        self.entries.contains_key(&ty)
    }

    /// Look up the accessor for a type.
    pub fn get(&self, ty: ScalarType) -> OrmResult<&Accessor> {
        self.entries
            .get(&ty)
            .ok_or_else(|| OrmError::configuration(format!("no accessor registered for {ty}")))
    }

    /// Check that every listed type has an accessor.
    pub fn validate_types(&self, types: impl IntoIterator<Item = ScalarType>) -> OrmResult<()> {
        for ty in types {
            self.get(ty)?;
        }
        Ok(())
    }

    /// Check that every field of a record type has an accessor.
    pub fn validate_record<T: Record>(&self) -> OrmResult<()> {
        let shape = T::shape();
        for field in shape.fields() {
            if !self.contains(field.scalar) {
                return Err(OrmError::configuration(format!(
                    "no accessor registered for {} (field {}.{})",
                    field.scalar,
                    shape.type_name(),
                    field.name
                )));
            }
        }
        Ok(())
    }

    /// Registered types in a stable order.
    pub fn types(&self) -> Vec<ScalarType> {
        let mut types: Vec<_> = self.entries.keys().copied().collect();
        types.sort();
        types
    }
}
