//! PostgreSQL catalog adapter
//!
//! Relations come from `information_schema`, keys from `pg_index`. Both are
//! scoped to one schema (`public` unless configured otherwise).

use async_trait::async_trait;
use sqlx::postgres::PgPool;

use crate::catalog::{column, is_nullable_flag, relation_row};
use crate::driver::Driver;
use crate::error::{SchemaError, SchemaResult};
use crate::provider::SchemaProvider;
use crate::types::{ColumnInfo, ForeignKeyRelation, KeyDescriptor};

const DRIVER: &str = "pgsql";

pub const DEFAULT_SCHEMA: &str = "public";

const HAS_TABLE_SQL: &str = "SELECT EXISTS (
    SELECT 1 FROM information_schema.tables
     WHERE table_schema = $1 AND table_name = $2
) AS present";

const TABLES_SQL: &str = "SELECT table_name::text AS name
  FROM information_schema.tables
 WHERE table_schema = $1 AND table_type = 'BASE TABLE'
 ORDER BY table_name";

const COLUMNS_SQL: &str = "SELECT column_name::text AS name, data_type::text AS data_type,
       is_nullable::text AS is_nullable
  FROM information_schema.columns
 WHERE table_schema = $1 AND table_name = $2
 ORDER BY ordinal_position";

const RELATIONS_SQL: &str = "SELECT kcu.table_name::text AS ref_table,
       kcu.column_name::text AS foreign_key,
       ccu.column_name::text AS local_key,
       'incoming'::text AS direction
  FROM information_schema.table_constraints tc
  JOIN information_schema.key_column_usage kcu
    ON tc.constraint_name = kcu.constraint_name AND tc.constraint_schema = kcu.constraint_schema
  JOIN information_schema.constraint_column_usage ccu
    ON ccu.constraint_name = tc.constraint_name AND ccu.constraint_schema = tc.constraint_schema
 WHERE tc.constraint_type = 'FOREIGN KEY'
   AND ccu.table_name = $1
   AND ccu.table_schema = $2
UNION
SELECT ccu.table_name::text AS ref_table,
       kcu.column_name::text AS foreign_key,
       ccu.column_name::text AS local_key,
       'outgoing'::text AS direction
  FROM information_schema.table_constraints tc
  JOIN information_schema.key_column_usage kcu
    ON tc.constraint_name = kcu.constraint_name AND tc.constraint_schema = kcu.constraint_schema
  JOIN information_schema.constraint_column_usage ccu
    ON ccu.constraint_name = tc.constraint_name AND ccu.constraint_schema = tc.constraint_schema
 WHERE tc.constraint_type = 'FOREIGN KEY'
   AND tc.table_name = $1
   AND tc.table_schema = $2
 ORDER BY ref_table ASC";

// int2vector subscripts start at 0, so the key position comes from the
// ordinality of the unnested indkey. INCLUDE columns sit past indnkeyatts.
// Rows follow index name order; the resolver keeps the last matching key.
const KEYS_SQL: &str = "SELECT CASE WHEN i.indisprimary THEN 'PRIMARY' ELSE idx.relname::text END AS key_name,
       a.attname::text AS column_name,
       NOT i.indisunique AS non_unique,
       k.ord::int4 AS seq_in_index
  FROM pg_index i
  JOIN pg_class t ON t.oid = i.indrelid
  JOIN pg_class idx ON idx.oid = i.indexrelid
  JOIN pg_namespace n ON n.oid = t.relnamespace
 CROSS JOIN LATERAL unnest(i.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord)
  JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum
 WHERE t.relname = $1
   AND n.nspname = $2
   AND k.ord <= i.indnkeyatts
 ORDER BY idx.relname, a.attnum";

/// Schema provider over a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PostgresSchema {
    pool: PgPool,
    schema: String,
}

impl PostgresSchema {
    /// `schema` falls back to `public` when `None`
    pub fn new(pool: PgPool, schema: Option<String>) -> Self {
        Self {
            pool,
            schema: schema.unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
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
impl SchemaProvider for PostgresSchema {
    fn driver(&self) -> Driver {
        Driver::PostgreSql
    }

    async fn has_table(&self, table: &str) -> SchemaResult<bool> {
        let row = sqlx::query(HAS_TABLE_SQL)
            .bind(&self.schema)
            .bind(table)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SchemaError::access(DRIVER, "checking table existence", e))?;

        column(&row, "present", DRIVER)
    }

    async fn list_tables(&self) -> SchemaResult<Vec<String>> {
        let rows = sqlx::query(TABLES_SQL)
            .bind(&self.schema)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SchemaError::access(DRIVER, "listing tables", e))?;

        rows.iter().map(|row| column(row, "name", DRIVER)).collect()
    }

    async fn list_columns(&self, table: &str) -> SchemaResult<Vec<ColumnInfo>> {
        self.ensure_table(table).await?;

        let rows = sqlx::query(COLUMNS_SQL)
            .bind(&self.schema)
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
        tracing::debug!(
            "Reading foreign keys of '{}.{}' from information_schema",
            self.schema,
            table
        );

        let rows = sqlx::query(RELATIONS_SQL)
            .bind(table)
            .bind(&self.schema)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SchemaError::access(DRIVER, "listing relations", e))?;

        rows.iter().map(|row| relation_row(row, DRIVER)).collect()
    }

    async fn list_keys_for_table(&self, table: &str) -> SchemaResult<Vec<KeyDescriptor>> {
        self.ensure_table(table).await?;
        tracing::debug!("Reading keys of '{}.{}' from pg_index", self.schema, table);

        let rows = sqlx::query(KEYS_SQL)
            .bind(table)
            .bind(&self.schema)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SchemaError::access(DRIVER, "listing keys", e))?;

        rows.iter()
            .map(|row| -> SchemaResult<KeyDescriptor> {
                let seq: i32 = column(row, "seq_in_index", DRIVER)?;
                Ok(KeyDescriptor {
                    key_name: column(row, "key_name", DRIVER)?,
                    column_name: column(row, "column_name", DRIVER)?,
                    non_unique: column(row, "non_unique", DRIVER)?,
                    seq_in_index: u32::try_from(seq).map_err(|e| SchemaError::decode(DRIVER, e))?,
                })
            })
            .collect()
    }
}
