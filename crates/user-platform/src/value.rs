//! Scalar values and the mapping from Rust field types to scalar categories.

use chrono::NaiveDateTime;
use std::fmt;

/// Semantic scalar category of a column or statement parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarType {
    Bool,
    I32,
    I64,
    F64,
    Text,
    Timestamp,
    Bytes,
}

impl ScalarType {
    /// All built-in scalar categories.
    pub const ALL: [ScalarType; 7] = [
        ScalarType::Bool,
        ScalarType::I32,
        ScalarType::I64,
        ScalarType::F64,
        ScalarType::Text,
        ScalarType::Timestamp,
        ScalarType::Bytes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::F64 => "f64",
            ScalarType::Text => "text",
            ScalarType::Timestamp => "timestamp",
            ScalarType::Bytes => "bytes",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed scalar moving between a record field and a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F64(f64),
    Text(String),
    Timestamp(NaiveDateTime),
    Bytes(Vec<u8>),
}

impl Value {
    /// The scalar category of this value, or `None` for `Null`.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(ScalarType::Bool),
            Value::I32(_) => Some(ScalarType::I32),
            Value::I64(_) => Some(ScalarType::I64),
            Value::F64(_) => Some(ScalarType::F64),
            Value::Text(_) => Some(ScalarType::Text),
            Value::Timestamp(_) => Some(ScalarType::Timestamp),
            Value::Bytes(_) => Some(ScalarType::Bytes),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short description used in error messages (never prints the payload).
    pub fn type_label(&self) -> &'static str {
        self.scalar_type().map_or("null", ScalarType::name)
    }
}

// Narrower and unsigned integers are widened into their canonical category
// before any accessor lookup.
macro_rules! impl_from_widening {
    ($variant:ident => $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(v: $source) -> Self {
                    Value::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

impl_from_widening!(I32 => i32: i8, i16, u8, u16, i32);
impl_from_widening!(I64 => i64: u32, i64);
impl_from_widening!(F64 => f64: f32, f64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A Rust type that can live in a mapped record field.
///
/// Every field of a `#[derive(Record)]` struct must implement this trait, so an
/// unsupported field type is rejected at compile time.
pub trait Scalar: Sized {
    /// Scalar category used to pick the read/bind accessors.
    const SCALAR_TYPE: ScalarType;

    /// Whether `NULL` is an acceptable column value.
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value;

    /// Convert back from a [`Value`], handing the value back if it does not fit.
    fn from_value(value: Value) -> Result<Self, Value>;
}

macro_rules! impl_scalar {
    ($ty:ty, $scalar:ident) => {
        impl Scalar for $ty {
            const SCALAR_TYPE: ScalarType = ScalarType::$scalar;

            fn to_value(&self) -> Value {
                Value::$scalar(self.clone())
            }

            fn from_value(value: Value) -> Result<Self, Value> {
                match value {
                    Value::$scalar(v) => Ok(v),
                    other => Err(other),
                }
            }
        }
    };
}

impl_scalar!(bool, Bool);
impl_scalar!(i32, I32);
impl_scalar!(i64, I64);
impl_scalar!(f64, F64);
impl_scalar!(String, Text);
impl_scalar!(NaiveDateTime, Timestamp);
impl_scalar!(Vec<u8>, Bytes);

impl<T: Scalar> Scalar for Option<T> {
    const SCALAR_TYPE: ScalarType = T::SCALAR_TYPE;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
