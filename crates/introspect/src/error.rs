//! Error types for schema introspection

use thiserror::Error;

/// Result type alias for catalog queries
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while reading database metadata
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A catalog query could not be executed
    #[error("Schema access error ({driver}) while {operation}: {message}")]
    Access {
        driver: String,
        operation: String,
        message: String,
    },

    #[error("Table '{table}' does not exist")]
    TableNotFound { table: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Invalid connection configuration: {message}")]
    Configuration { message: String },

    /// A catalog row did not have the expected shape
    #[error("Unexpected catalog row ({driver}): {message}")]
    Decode { driver: String, message: String },
}

impl SchemaError {
    pub fn access(
        driver: impl Into<String>,
        operation: impl Into<String>,
        error: impl std::fmt::Display,
    ) -> Self {
        Self::Access {
            driver: driver.into(),
            operation: operation.into(),
            message: error.to_string(),
        }
    }

    pub fn table_not_found(table: impl Into<String>) -> Self {
        Self::TableNotFound {
            table: table.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn decode(driver: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::Decode {
            driver: driver.into(),
            message: error.to_string(),
        }
    }

    /// Whether the error means the table is missing rather than the catalog unreachable
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound { .. })
    }
}
