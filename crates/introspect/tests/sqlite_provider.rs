use crudkit_introspect::{
    ColumnInfo, Driver, ForeignKeyRelation, KeyDescriptor, SchemaError, SchemaProvider,
    SqliteSchema,
};
use sqlx::sqlite::SqlitePoolOptions;

const SHOP_SCHEMA: &[&str] = &[
    "CREATE TABLE customers (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT
    )",
    "CREATE TABLE profiles (
        id INTEGER PRIMARY KEY,
        customer_id INTEGER NOT NULL REFERENCES customers(id),
        bio TEXT
    )",
    "CREATE UNIQUE INDEX profiles_customer_id_unique ON profiles (customer_id)",
    "CREATE TABLE orders (
        id INTEGER PRIMARY KEY,
        customer_id INTEGER NOT NULL REFERENCES customers(id),
        total REAL NOT NULL
    )",
    "CREATE INDEX orders_customer_id_index ON orders (customer_id)",
    "CREATE TABLE order_items (
        order_id INTEGER NOT NULL REFERENCES orders(id),
        sku TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        PRIMARY KEY (order_id, sku)
    )",
    "CREATE TABLE tags (id INTEGER PRIMARY KEY, label TEXT)",
];

async fn shop() -> SqliteSchema {
    // One connection: every pooled connection would get its own memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    for statement in SHOP_SCHEMA {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }

    SqliteSchema::new(pool)
}

#[tokio::test]
async fn test_driver_and_tables() {
    let schema = shop().await;

    assert_eq!(schema.driver(), Driver::Sqlite);
    assert_eq!(
        schema.list_tables().await.unwrap(),
        vec!["customers", "order_items", "orders", "profiles", "tags"]
    );
    assert!(schema.has_table("orders").await.unwrap());
    assert!(schema.has_table("ORDERS").await.unwrap());
    assert!(!schema.has_table("invoices").await.unwrap());
}

#[tokio::test]
async fn test_columns_in_declaration_order() {
    let schema = shop().await;

    let columns = schema.list_columns("customers").await.unwrap();
    assert_eq!(
        columns,
        vec![
            ColumnInfo::new("id", "INTEGER", true),
            ColumnInfo::new("name", "TEXT", false),
            ColumnInfo::new("email", "TEXT", true),
        ]
    );
}

#[tokio::test]
async fn test_incoming_relations_sorted_by_related_table() {
    let schema = shop().await;

    let relations = schema.list_relations_for_table("customers").await.unwrap();
    assert_eq!(
        relations,
        vec![
            ForeignKeyRelation::incoming("orders", "customer_id", "id"),
            ForeignKeyRelation::incoming("profiles", "customer_id", "id"),
        ]
    );
}

#[tokio::test]
async fn test_both_directions() {
    let schema = shop().await;

    let relations = schema.list_relations_for_table("orders").await.unwrap();
    assert_eq!(
        relations,
        vec![
            ForeignKeyRelation::outgoing("customers", "customer_id", "id"),
            ForeignKeyRelation::incoming("order_items", "order_id", "id"),
        ]
    );
}

#[tokio::test]
async fn test_table_without_relations() {
    let schema = shop().await;

    assert!(schema.list_relations_for_table("tags").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_table_is_an_error() {
    let schema = shop().await;

    let err = schema.list_relations_for_table("invoices").await.unwrap_err();
    assert!(err.is_table_not_found());

    let err = schema.list_keys_for_table("invoices").await.unwrap_err();
    assert!(matches!(err, SchemaError::TableNotFound { table } if table == "invoices"));
}

#[tokio::test]
async fn test_keys_include_primary_and_indexes() {
    let schema = shop().await;

    let orders = schema.list_keys_for_table("orders").await.unwrap();
    assert_eq!(
        orders,
        vec![
            KeyDescriptor::primary("id", 1),
            KeyDescriptor::new("orders_customer_id_index", "customer_id", true, 1),
        ]
    );

    let profiles = schema.list_keys_for_table("profiles").await.unwrap();
    assert!(profiles.contains(&KeyDescriptor::new(
        "profiles_customer_id_unique",
        "customer_id",
        false,
        1
    )));
}

#[tokio::test]
async fn test_composite_primary_key_positions() {
    let schema = shop().await;

    let keys = schema.list_keys_for_table("order_items").await.unwrap();
    assert_eq!(
        keys,
        vec![KeyDescriptor::primary("order_id", 1), KeyDescriptor::primary("sku", 2)]
    );
}

#[tokio::test]
async fn test_keys_keep_index_list_order() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    for statement in [
        "CREATE TABLE customers (id INTEGER PRIMARY KEY)",
        "CREATE TABLE profiles (id INTEGER PRIMARY KEY, customer_id INTEGER REFERENCES customers(id))",
        "CREATE UNIQUE INDEX a_unique ON profiles (customer_id)",
        "CREATE INDEX z_idx ON profiles (customer_id)",
    ] {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    let schema = SqliteSchema::new(pool);

    // pragma_index_list reports the newest index first
    let keys = schema.list_keys_for_table("profiles").await.unwrap();
    assert_eq!(
        keys,
        vec![
            KeyDescriptor::primary("id", 1),
            KeyDescriptor::new("z_idx", "customer_id", true, 1),
            KeyDescriptor::new("a_unique", "customer_id", false, 1),
        ]
    );
}
