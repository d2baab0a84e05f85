//! SQLite catalog adapter
//!
//! SQLite keeps no catalog of incoming references, so they are found by
//! reading the foreign key list of every table. The pragma table-valued
//! functions take the table name as a bound parameter.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

use crate::catalog::column;
use crate::driver::Driver;
use crate::error::{SchemaError, SchemaResult};
use crate::provider::SchemaProvider;
use crate::types::{sort_relations, ColumnInfo, ForeignKeyRelation, KeyDescriptor};

const DRIVER: &str = "sqlite";

/// Referenced column assumed when neither the constraint nor the target table names one
const FALLBACK_LOCAL_KEY: &str = "id";

const HAS_TABLE_SQL: &str =
    "SELECT COUNT(*) AS total FROM sqlite_master WHERE type = 'table' AND name = ? COLLATE NOCASE";

const TABLES_SQL: &str = "SELECT name FROM sqlite_master
 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
 ORDER BY name";

const COLUMNS_SQL: &str =
    "SELECT name, type AS data_type, \"notnull\" AS not_null FROM pragma_table_info(?) ORDER BY cid";

const PRIMARY_KEY_SQL: &str =
    "SELECT name, pk FROM pragma_table_info(?) WHERE pk > 0 ORDER BY pk";

const FOREIGN_KEYS_SQL: &str = "SELECT \"table\" AS ref_table, \"from\" AS from_column, \"to\" AS to_column
  FROM pragma_foreign_key_list(?)
 ORDER BY id, seq";

// No ORDER BY: the resolver keeps the last matching key, so pragma order is kept
const INDEX_LIST_SQL: &str = "SELECT name, \"unique\" AS is_unique, origin FROM pragma_index_list(?)";

const INDEX_INFO_SQL: &str = "SELECT name, seqno FROM pragma_index_info(?) ORDER BY seqno";

/// One row of `pragma_foreign_key_list`
struct ForeignKeyRow {
    ref_table: String,
    from_column: String,
    to_column: Option<String>,
}

/// Schema provider over a SQLite connection pool
#[derive(Debug, Clone)]
pub struct SqliteSchema {
    pool: SqlitePool,
}

impl SqliteSchema {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn ensure_table(&self, table: &str) -> SchemaResult<()> {
        if self.has_table(table).await? {
            Ok(())
        } else {
            Err(SchemaError::table_not_found(table))
        }
    }

    async fn foreign_keys(&self, table: &str) -> SchemaResult<Vec<ForeignKeyRow>> {
        let rows = sqlx::query(FOREIGN_KEYS_SQL)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SchemaError::access(DRIVER, "reading foreign_key_list", e))?;

        rows.iter()
            .map(|row| -> SchemaResult<ForeignKeyRow> {
                Ok(ForeignKeyRow {
                    ref_table: column(row, "ref_table", DRIVER)?,
                    from_column: column(row, "from_column", DRIVER)?,
                    to_column: column(row, "to_column", DRIVER)?,
                })
            })
            .collect()
    }

    /// Primary key columns in key order
    async fn primary_key(&self, table: &str) -> SchemaResult<Vec<(String, u32)>> {
        let rows = sqlx::query(PRIMARY_KEY_SQL)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SchemaError::access(DRIVER, "reading table_info", e))?;

        rows.iter()
            .map(|row| -> SchemaResult<(String, u32)> {
                let pk: i64 = column(row, "pk", DRIVER)?;
                let seq = u32::try_from(pk).map_err(|e| SchemaError::decode(DRIVER, e))?;
                Ok((column(row, "name", DRIVER)?, seq))
            })
            .collect()
    }

    /// Column a foreign key points at. A constraint written as
    /// `REFERENCES parent` targets the parent's primary key.
    async fn referenced_column(&self, fk: &ForeignKeyRow) -> SchemaResult<String> {
        if let Some(to) = &fk.to_column {
            return Ok(to.clone());
        }

        let primary = self.primary_key(&fk.ref_table).await?;
        Ok(primary
            .into_iter()
            .next()
            .map(|(name, _)| name)
            .unwrap_or_else(|| FALLBACK_LOCAL_KEY.to_string()))
    }
}

#[async_trait]
impl SchemaProvider for SqliteSchema {
    fn driver(&self) -> Driver {
        Driver::Sqlite
    }

    async fn has_table(&self, table: &str) -> SchemaResult<bool> {
        let row = sqlx::query(HAS_TABLE_SQL)
            .bind(table)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SchemaError::access(DRIVER, "checking table existence", e))?;

        let total: i64 = column(&row, "total", DRIVER)?;
        Ok(total > 0)
    }

    async fn list_tables(&self) -> SchemaResult<Vec<String>> {
        let rows = sqlx::query(TABLES_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SchemaError::access(DRIVER, "listing tables", e))?;

        rows.iter().map(|row| column(row, "name", DRIVER)).collect()
    }

    async fn list_columns(&self, table: &str) -> SchemaResult<Vec<ColumnInfo>> {
        self.ensure_table(table).await?;

        let rows = sqlx::query(COLUMNS_SQL)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SchemaError::access(DRIVER, "listing columns", e))?;

        rows.iter()
            .map(|row| -> SchemaResult<ColumnInfo> {
                let not_null: i64 = column(row, "not_null", DRIVER)?;
                Ok(ColumnInfo {
                    name: column(row, "name", DRIVER)?,
                    data_type: column(row, "data_type", DRIVER)?,
                    nullable: not_null == 0,
                })
            })
            .collect()
    }

    async fn list_relations_for_table(
        &self,
        table: &str,
    ) -> SchemaResult<Vec<ForeignKeyRelation>> {
        self.ensure_table(table).await?;
        tracing::debug!("Reading foreign keys of '{}' from pragma_foreign_key_list", table);

        let mut relations = Vec::new();

        for fk in self.foreign_keys(table).await? {
            let local_key = self.referenced_column(&fk).await?;
            relations.push(ForeignKeyRelation::outgoing(fk.ref_table, fk.from_column, local_key));
        }

        // The subject is scanned too so a self reference shows up in both directions
        for other in self.list_tables().await? {
            for fk in self.foreign_keys(&other).await? {
                if !fk.ref_table.eq_ignore_ascii_case(table) {
                    continue;
                }
                let local_key = self.referenced_column(&fk).await?;
                relations.push(ForeignKeyRelation::incoming(
                    other.clone(),
                    fk.from_column,
                    local_key,
                ));
            }
        }

        sort_relations(&mut relations);
        Ok(relations)
    }

    async fn list_keys_for_table(&self, table: &str) -> SchemaResult<Vec<KeyDescriptor>> {
        self.ensure_table(table).await?;
        tracing::debug!("Reading keys of '{}' from pragma_index_list", table);

        let rows = sqlx::query(INDEX_LIST_SQL)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SchemaError::access(DRIVER, "reading index_list", e))?;

        let mut indexes = Vec::with_capacity(rows.len());
        for row in &rows {
            let name: String = column(row, "name", DRIVER)?;
            let is_unique: i64 = column(row, "is_unique", DRIVER)?;
            let origin: String = column(row, "origin", DRIVER)?;
            indexes.push((name, is_unique != 0, origin == "pk"));
        }

        // Rowid aliases have no index entry, so that primary key comes from table_info
        let mut keys: Vec<KeyDescriptor> = Vec::new();
        if !indexes.iter().any(|(_, _, primary)| *primary) {
            keys.extend(
                self.primary_key(table)
                    .await?
                    .into_iter()
                    .map(|(name, seq)| KeyDescriptor::primary(name, seq)),
            );
        }

        for (index_name, is_unique, primary) in &indexes {
            let parts = sqlx::query(INDEX_INFO_SQL)
                .bind(index_name)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| SchemaError::access(DRIVER, "reading index_info", e))?;

            for part in &parts {
                // Expression parts have no column name
                let name: Option<String> = column(part, "name", DRIVER)?;
                let Some(column_name) = name else {
                    continue;
                };
                let seqno: i64 = column(part, "seqno", DRIVER)?;
                let seq = u32::try_from(seqno + 1).map_err(|e| SchemaError::decode(DRIVER, e))?;

                keys.push(if *primary {
                    KeyDescriptor::primary(column_name, seq)
                } else {
                    KeyDescriptor::new(index_name.clone(), column_name, !is_unique, seq)
                });
            }
        }

        Ok(keys)
    }
}
