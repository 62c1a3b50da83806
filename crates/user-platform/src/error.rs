//! Error types for user-platform

use thiserror::Error;

/// Result type alias for persistence operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum OrmError {
    /// Failed to obtain a database connection
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// A scalar type has no registered accessor
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A statement argument could not be bound
    #[error("Bind error: {0}")]
    Bind(String),

    /// Row-to-record conversion failure
    #[error("Mapping error on {record}.{field}: {message}")]
    Mapping {
        record: &'static str,
        field: String,
        message: String,
    },

    /// Column decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// A uniqueness assumption about the stored data does not hold
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a bind error
    pub fn bind(message: impl Into<String>) -> Self {
        Self::Bind(message.into())
    }

    /// Create a mapping error for a field of a record type
    pub fn mapping(
        record: &'static str,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Mapping {
            record,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create an integrity violation error
    pub fn integrity_violation(message: impl Into<String>) -> Self {
        Self::IntegrityViolation(message.into())
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is a mapping error
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping { .. })
    }

    /// Check if this is an integrity violation
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::IntegrityViolation(_))
    }

    /// Check if this is a connection error
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Classify a tokio_postgres error: a closed connection is a
    /// `Connection` error, everything else a `Query` error
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if err.is_closed() {
            return Self::Connection(err.to_string());
        }
        Self::Query(err)
    }
}
