//! # crudkit-introspect
//!
//! Reads table, column, key and foreign-key metadata from a live database.
//! Each engine has its own [`SchemaProvider`] implementation; [`connect`]
//! picks one from a [`ConnectionConfig`](crudkit_core::ConnectionConfig).

mod catalog;
pub mod connect;
pub mod driver;
pub mod error;
pub mod mysql;
pub mod postgres;
pub mod provider;
pub mod sqlite;
pub mod sqlsrv;
pub mod types;
pub mod unsupported;

pub use connect::connect;
pub use driver::Driver;
pub use error::{SchemaError, SchemaResult};
pub use mysql::MySqlSchema;
pub use postgres::PostgresSchema;
pub use provider::SchemaProvider;
pub use sqlite::SqliteSchema;
pub use sqlsrv::SqlServerSchema;
pub use types::{ColumnInfo, ForeignKeyRelation, KeyDescriptor, RelationDirection, PRIMARY_KEY_NAME};
pub use unsupported::UnsupportedSchema;
