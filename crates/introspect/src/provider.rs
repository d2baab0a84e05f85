//! Schema Metadata Provider
//!
//! The catalog surface the code generators depend on. One implementation
//! exists per database engine; callers only ever see the trait object.

use async_trait::async_trait;

use crate::driver::Driver;
use crate::error::SchemaResult;
use crate::types::{ColumnInfo, ForeignKeyRelation, KeyDescriptor};

/// Read-only access to a database's table, column, key and foreign-key metadata
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// Engine behind this provider
    fn driver(&self) -> Driver;

    /// Whether the table exists
    async fn has_table(&self, table: &str) -> SchemaResult<bool>;

    /// Base tables, sorted by name
    async fn list_tables(&self) -> SchemaResult<Vec<String>>;

    /// Columns of the table in declaration order
    async fn list_columns(&self, table: &str) -> SchemaResult<Vec<ColumnInfo>>;

    /// Relations in both directions, ordered by related table name.
    ///
    /// Returns an empty list for a table without foreign keys and
    /// [`SchemaError::TableNotFound`](crate::SchemaError::TableNotFound) when
    /// the table is missing.
    async fn list_relations_for_table(&self, table: &str) -> SchemaResult<Vec<ForeignKeyRelation>>;

    /// Every (index, column) pair of the table, primary key included
    async fn list_keys_for_table(&self, table: &str) -> SchemaResult<Vec<KeyDescriptor>>;
}
