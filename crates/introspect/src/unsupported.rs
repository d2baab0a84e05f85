use async_trait::async_trait;

use crate::driver::Driver;
use crate::error::SchemaResult;
use crate::provider::SchemaProvider;
use crate::types::{ColumnInfo, ForeignKeyRelation, KeyDescriptor};

/// Provider for engines without a catalog adapter.
///
/// Every listing is empty and no error is raised, so generation still runs
/// and simply detects no relationships.
#[derive(Debug, Clone)]
pub struct UnsupportedSchema {
    tag: String,
}

impl UnsupportedSchema {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        tracing::warn!(
            "No schema adapter for driver '{}'; relationships will not be detected",
            tag
        );
        Self { tag }
    }
}

#[async_trait]
impl SchemaProvider for UnsupportedSchema {
    fn driver(&self) -> Driver {
        Driver::Unsupported(self.tag.clone())
    }

    async fn has_table(&self, _table: &str) -> SchemaResult<bool> {
        Ok(true)
    }

    async fn list_tables(&self) -> SchemaResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn list_columns(&self, _table: &str) -> SchemaResult<Vec<ColumnInfo>> {
        Ok(Vec::new())
    }

    async fn list_relations_for_table(
        &self,
        _table: &str,
    ) -> SchemaResult<Vec<ForeignKeyRelation>> {
        Ok(Vec::new())
    }

    async fn list_keys_for_table(&self, _table: &str) -> SchemaResult<Vec<KeyDescriptor>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_engine_yields_empty_metadata() {
        let schema = UnsupportedSchema::new("oracle");

        assert_eq!(schema.driver(), Driver::Unsupported("oracle".to_string()));
        assert!(schema.has_table("customers").await.unwrap());
        assert!(schema.list_relations_for_table("customers").await.unwrap().is_empty());
        assert!(schema.list_keys_for_table("customers").await.unwrap().is_empty());
        assert!(schema.list_columns("customers").await.unwrap().is_empty());
        assert!(schema.list_tables().await.unwrap().is_empty());
    }
}
