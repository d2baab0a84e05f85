#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use crudkit_introspect::{
    ColumnInfo, Driver, ForeignKeyRelation, KeyDescriptor, SchemaError, SchemaProvider,
    SchemaResult,
};

#[derive(Default)]
struct FakeTable {
    columns: Vec<ColumnInfo>,
    relations: Vec<ForeignKeyRelation>,
    keys: Vec<KeyDescriptor>,
}

/// In-memory catalog returning exactly what it was given
#[derive(Default)]
pub struct FakeSchema {
    tables: BTreeMap<String, FakeTable>,
    key_queries: AtomicUsize,
    /// Tables whose key lookups fail with an access error
    broken_keys: Vec<String>,
}

impl FakeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: &str, columns: Vec<ColumnInfo>) -> Self {
        self.tables.entry(name.to_string()).or_default().columns = columns;
        self
    }

    pub fn relation(mut self, table: &str, relation: ForeignKeyRelation) -> Self {
        self.tables.entry(table.to_string()).or_default().relations.push(relation);
        self
    }

    pub fn key(mut self, table: &str, key: KeyDescriptor) -> Self {
        self.tables.entry(table.to_string()).or_default().keys.push(key);
        self
    }

    pub fn failing_keys(mut self, table: &str) -> Self {
        self.tables.entry(table.to_string()).or_default();
        self.broken_keys.push(table.to_string());
        self
    }

    pub fn key_queries(&self) -> usize {
        self.key_queries.load(Ordering::SeqCst)
    }

    fn get(&self, table: &str) -> SchemaResult<&FakeTable> {
        self.tables
            .get(table)
            .ok_or_else(|| SchemaError::table_not_found(table))
    }
}

#[async_trait]
impl SchemaProvider for FakeSchema {
    fn driver(&self) -> Driver {
        Driver::Unsupported("fake".to_string())
    }

    async fn has_table(&self, table: &str) -> SchemaResult<bool> {
        Ok(self.tables.contains_key(table))
    }

    async fn list_tables(&self) -> SchemaResult<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    async fn list_columns(&self, table: &str) -> SchemaResult<Vec<ColumnInfo>> {
        Ok(self.get(table)?.columns.clone())
    }

    async fn list_relations_for_table(&self, table: &str) -> SchemaResult<Vec<ForeignKeyRelation>> {
        Ok(self.get(table)?.relations.clone())
    }

    async fn list_keys_for_table(&self, table: &str) -> SchemaResult<Vec<KeyDescriptor>> {
        self.key_queries.fetch_add(1, Ordering::SeqCst);
        if self.broken_keys.iter().any(|broken| broken == table) {
            return Err(SchemaError::access("fake", "listing keys", "connection reset"));
        }
        Ok(self.get(table)?.keys.clone())
    }
}

/// `customers`, `orders` (non-unique index on customer_id) and `profiles`
/// (unique index on customer_id)
pub fn shop() -> FakeSchema {
    FakeSchema::new()
        .table(
            "customers",
            vec![
                ColumnInfo::new("id", "bigint", false),
                ColumnInfo::new("name", "varchar", false),
                ColumnInfo::new("email", "varchar", true),
                ColumnInfo::new("created_at", "timestamp", true),
                ColumnInfo::new("updated_at", "timestamp", true),
            ],
        )
        .table(
            "orders",
            vec![
                ColumnInfo::new("id", "bigint", false),
                ColumnInfo::new("customer_id", "bigint", false),
                ColumnInfo::new("total", "decimal", false),
                ColumnInfo::new("deleted_at", "timestamp", true),
            ],
        )
        .table(
            "profiles",
            vec![
                ColumnInfo::new("id", "bigint", false),
                ColumnInfo::new("customer_id", "bigint", false),
                ColumnInfo::new("bio", "text", true),
            ],
        )
        .relation("customers", ForeignKeyRelation::incoming("orders", "customer_id", "id"))
        .relation("customers", ForeignKeyRelation::incoming("profiles", "customer_id", "id"))
        .relation("orders", ForeignKeyRelation::outgoing("customers", "customer_id", "id"))
        .relation("profiles", ForeignKeyRelation::outgoing("customers", "customer_id", "id"))
        .key("customers", KeyDescriptor::primary("id", 1))
        .key("orders", KeyDescriptor::primary("id", 1))
        .key("orders", KeyDescriptor::new("orders_customer_id_index", "customer_id", true, 1))
        .key("profiles", KeyDescriptor::primary("id", 1))
        .key("profiles", KeyDescriptor::new("profiles_customer_id_unique", "customer_id", false, 1))
}
