//! Error types for code generation

use std::path::{Path, PathBuf};

use crudkit_core::CoreError;
use crudkit_introspect::SchemaError;
use thiserror::Error;

pub type CodegenResult<T> = Result<T, CodegenError>;

#[derive(Debug, Error)]
pub enum CodegenError {
    /// Catalog access failed; nothing was written for the table
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("`{table}` table does not exist")]
    TableNotFound { table: String },

    #[error("{} already exists", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CodegenError {
    pub fn table_not_found(table: impl Into<String>) -> Self {
        Self::TableNotFound {
            table: table.into(),
        }
    }

    pub fn already_exists(path: impl AsRef<Path>) -> Self {
        Self::AlreadyExists {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
