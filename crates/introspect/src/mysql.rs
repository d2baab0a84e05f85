//! MySQL / MariaDB catalog adapter
//!
//! Reads `INFORMATION_SCHEMA` for the database selected by the connection.
//! Keys come from `SHOW KEYS` so they keep the server's index order.

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::{Executor, Row};

use crate::catalog::{column, is_nullable_flag, relation_row};
use crate::driver::Driver;
use crate::error::{SchemaError, SchemaResult};
use crate::provider::SchemaProvider;
use crate::types::{ColumnInfo, ForeignKeyRelation, KeyDescriptor};

const DRIVER: &str = "mysql";

const HAS_TABLE_SQL: &str = "SELECT COUNT(*) AS total
  FROM INFORMATION_SCHEMA.TABLES
 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?";

const TABLES_SQL: &str = "SELECT TABLE_NAME AS name
  FROM INFORMATION_SCHEMA.TABLES
 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE'
 ORDER BY TABLE_NAME";

const COLUMNS_SQL: &str = "SELECT COLUMN_NAME AS name, DATA_TYPE AS data_type, IS_NULLABLE AS is_nullable
  FROM INFORMATION_SCHEMA.COLUMNS
 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
 ORDER BY ORDINAL_POSITION";

const RELATIONS_SQL: &str = "SELECT TABLE_NAME AS ref_table, COLUMN_NAME AS foreign_key,
       REFERENCED_COLUMN_NAME AS local_key, 'incoming' AS direction
  FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE
 WHERE REFERENCED_TABLE_NAME = ? AND REFERENCED_TABLE_SCHEMA = DATABASE()
UNION
SELECT REFERENCED_TABLE_NAME AS ref_table, COLUMN_NAME AS foreign_key,
       REFERENCED_COLUMN_NAME AS local_key, 'outgoing' AS direction
  FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE
 WHERE TABLE_NAME = ? AND TABLE_SCHEMA = DATABASE() AND REFERENCED_TABLE_NAME IS NOT NULL
 ORDER BY ref_table ASC";

/// Quote a table name for `SHOW KEYS`, which takes no bound parameters
fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// SHOW KEYS reports its counters as signed or unsigned integers depending on the server version
fn integer(row: &MySqlRow, name: &str) -> SchemaResult<i64> {
    row.try_get_unchecked::<i64, _>(name)
        .map_err(|e| SchemaError::decode(DRIVER, format!("column `{}`: {}", name, e)))
}

/// Schema provider over a MySQL connection pool
#[derive(Debug, Clone)]
pub struct MySqlSchema {
    pool: MySqlPool,
}

impl MySqlSchema {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn ensure_table(&self, table: &str) -> SchemaResult<()> {
        if self.has_table(table).await? {
            Ok(())
        } else {
            Err(SchemaError::table_not_found(table))
        }
    }
}

#[async_trait]
impl SchemaProvider for MySqlSchema {
    fn driver(&self) -> Driver {
        Driver::MySql
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
                let nullable: String = column(row, "is_nullable", DRIVER)?;
                Ok(ColumnInfo {
                    name: column(row, "name", DRIVER)?,
                    data_type: column(row, "data_type", DRIVER)?,
                    nullable: is_nullable_flag(&nullable),
                })
            })
            .collect()
    }

    async fn list_relations_for_table(
        &self,
        table: &str,
    ) -> SchemaResult<Vec<ForeignKeyRelation>> {
        self.ensure_table(table).await?;
        tracing::debug!("Reading foreign keys of '{}' from KEY_COLUMN_USAGE", table);

        let rows = sqlx::query(RELATIONS_SQL)
            .bind(table)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SchemaError::access(DRIVER, "listing relations", e))?;

        rows.iter().map(|row| relation_row(row, DRIVER)).collect()
    }

    async fn list_keys_for_table(&self, table: &str) -> SchemaResult<Vec<KeyDescriptor>> {
        self.ensure_table(table).await?;
        tracing::debug!("Reading keys of '{}' with SHOW KEYS", table);

        // Unbound statements go over the text protocol
        let sql = format!("SHOW KEYS FROM {}", quote_identifier(table));
        let rows = self
            .pool
            .fetch_all(sql.as_str())
            .await
            .map_err(|e| SchemaError::access(DRIVER, "listing keys", e))?;

        let mut keys = Vec::with_capacity(rows.len());
        for row in &rows {
            // Functional index parts have no column
            let column_name: Option<String> = column(row, "Column_name", DRIVER)?;
            let Some(column_name) = column_name else {
                continue;
            };
            let seq = integer(row, "Seq_in_index")?;

            keys.push(KeyDescriptor {
                key_name: column(row, "Key_name", DRIVER)?,
                column_name,
                non_unique: integer(row, "Non_unique")? != 0,
                seq_in_index: u32::try_from(seq).map_err(|e| SchemaError::decode(DRIVER, e))?,
            });
        }

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("orders"), "`orders`");
        assert_eq!(quote_identifier("odd`name"), "`odd``name`");
    }
}
