//! Record shape descriptors.
//!
//! A shape lists, for every field of a record type, the column it is read
//! from, its scalar category and a getter/setter pair. Shapes are normally
//! generated by `#[derive(Record)]` and built once per type.

use crate::value::{ScalarType, Value};
use std::fmt;

/// Describes how one record field moves to and from a column.
pub struct FieldDescriptor<T> {
    /// Rust field name.
    pub name: &'static str,
    /// Column label the field is read from.
    pub column: &'static str,
    pub scalar: ScalarType,
    pub nullable: bool,
    pub get: fn(&T) -> Value,
    /// Store a value into the field; hands the value back if the field rejects it.
    pub set: fn(&mut T, Value) -> Result<(), Value>,
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldDescriptor<T> {}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("scalar", &self.scalar)
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// The full set of field descriptors for a record type.
pub struct RecordShape<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> RecordShape<T> {
    pub fn new(type_name: &'static str, fields: Vec<FieldDescriptor<T>>) -> Self {
        Self { type_name, fields }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.column)
    }
}

impl<T> fmt::Debug for RecordShape<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordShape")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// A type that rows can be mapped into.
///
/// `Default` supplies the blank instance each row starts from. This trait
/// should typically be derived using `#[derive(Record)]`.
///
/// # Example
///
/// ```ignore
/// use user_platform::Record;
///
/// #[derive(Debug, Default, Record)]
/// #[record(rename_all = "camelCase")]
/// struct Contact {
///     id: Option<i64>,
///     phone_number: String,
/// }
/// ```
pub trait Record: Default + Send + Sync + Sized + 'static {
    fn shape() -> &'static RecordShape<Self>;
}
