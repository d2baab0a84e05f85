//! Relationship Resolver
//!
//! Turns the foreign keys touching a table into Eloquent relationship
//! methods and `@property` annotations for the generated model.
//!
//! A relation where the table holds the foreign key is always to-one. For a
//! relation where another table points at this one, the other table's keys
//! decide: a foreign key column that is the primary key, or the leading
//! column of a unique index, gives a to-one relation, anything else a
//! to-many one.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use crudkit_core::Naming;
use crudkit_introspect::{
    ForeignKeyRelation, KeyDescriptor, RelationDirection, SchemaError, SchemaProvider,
};
use serde::Serialize;

/// Whether an accessor yields one related model or a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Cardinality {
    One,
    Many,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::One => write!(f, "one"),
            Cardinality::Many => write!(f, "many"),
        }
    }
}

/// Eloquent relationship method used by the accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
}

impl RelationKind {
    pub fn from_parts(direction: RelationDirection, cardinality: Cardinality) -> Self {
        match (direction, cardinality) {
            (RelationDirection::Outgoing, _) => RelationKind::BelongsTo,
            (RelationDirection::Incoming, Cardinality::One) => RelationKind::HasOne,
            (RelationDirection::Incoming, Cardinality::Many) => RelationKind::HasMany,
        }
    }

    /// Method called on the model, e.g. `hasMany`
    pub fn method(&self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "belongsTo",
            RelationKind::HasOne => "hasOne",
            RelationKind::HasMany => "hasMany",
        }
    }

    /// Relation class returned by the method, e.g. `HasMany`
    pub fn class_name(&self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "BelongsTo",
            RelationKind::HasOne => "HasOne",
            RelationKind::HasMany => "HasMany",
        }
    }
}

/// One resolved relation, ready to be spliced into the model stub
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedRelationFragment {
    pub relation: ForeignKeyRelation,
    pub cardinality: Cardinality,
    pub kind: RelationKind,
    /// `customer` or `orders`
    pub accessor_name: String,
    /// Related model class, always singular
    pub type_name: String,
    pub accessor_code: String,
    /// `@property Customer $customer` or `@property Order[] $orders`
    pub property_annotation: String,
}

/// Output of one [`RelationshipResolver::resolve`] call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedRelations {
    pub fragments: Vec<GeneratedRelationFragment>,
    /// Accessor methods concatenated in relation order (`{{relations}}`)
    pub functions: String,
    /// Base doc block with one annotation line appended per relation (`{{properties}}`)
    pub properties: String,
}

impl ResolvedRelations {
    fn new(base_properties: &str) -> Self {
        Self {
            fragments: Vec::new(),
            functions: String::new(),
            properties: base_properties.to_string(),
        }
    }

    fn push(&mut self, fragment: GeneratedRelationFragment) {
        self.functions.push_str(&fragment.accessor_code);
        self.properties.push_str("\n * ");
        self.properties.push_str(&fragment.property_annotation);
        self.fragments.push(fragment);
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Cardinality of an incoming relation from the related table's keys.
///
/// Every key entry on `foreign_key` overwrites the decision, so with several
/// matching indexes the last one in catalog order wins. No match means
/// [`Cardinality::One`].
pub fn infer_cardinality(foreign_key: &str, keys: &[KeyDescriptor]) -> Cardinality {
    let mut cardinality = Cardinality::One;

    for key in keys.iter().filter(|key| key.column_name == foreign_key) {
        cardinality = if key.is_primary() || (!key.non_unique && key.seq_in_index == 1) {
            Cardinality::One
        } else {
            Cardinality::Many
        };
    }

    cardinality
}

/// Resolves the relations of a table against a schema provider
pub struct RelationshipResolver<'a> {
    provider: &'a dyn SchemaProvider,
    model_namespace: String,
}

impl<'a> RelationshipResolver<'a> {
    pub fn new(provider: &'a dyn SchemaProvider, model_namespace: impl Into<String>) -> Self {
        Self {
            provider,
            model_namespace: model_namespace.into(),
        }
    }

    /// Resolve every relation touching `table`.
    ///
    /// `base_properties` is the model doc block the annotations are appended
    /// to. Provider errors are returned as is and no output is produced.
    pub async fn resolve(
        &self,
        table: &str,
        base_properties: &str,
    ) -> Result<ResolvedRelations, SchemaError> {
        let relations = self.provider.list_relations_for_table(table).await?;
        let mut resolved = ResolvedRelations::new(base_properties);

        // Keys are read once per related table and dropped with this call
        let mut keys_by_table: HashMap<String, Vec<KeyDescriptor>> = HashMap::new();

        for relation in relations {
            let cardinality = match relation.direction {
                RelationDirection::Outgoing => Cardinality::One,
                RelationDirection::Incoming => {
                    let keys = match keys_by_table.entry(relation.ref_table.clone()) {
                        Entry::Occupied(entry) => entry.into_mut(),
                        Entry::Vacant(entry) => {
                            let keys =
                                self.provider.list_keys_for_table(&relation.ref_table).await?;
                            entry.insert(keys)
                        }
                    };
                    infer_cardinality(&relation.foreign_key, keys)
                }
            };

            let fragment = self.fragment(relation, cardinality);
            tracing::debug!(
                "{} -> {}: {} ({})",
                table,
                fragment.relation.ref_table,
                fragment.accessor_name,
                fragment.kind.method()
            );
            resolved.push(fragment);
        }

        Ok(resolved)
    }

    fn fragment(
        &self,
        relation: ForeignKeyRelation,
        cardinality: Cardinality,
    ) -> GeneratedRelationFragment {
        let kind = RelationKind::from_parts(relation.direction, cardinality);
        let type_name = Naming::model_class(&relation.ref_table);
        let accessor_name = match cardinality {
            Cardinality::One => Naming::singular_accessor(&relation.ref_table),
            Cardinality::Many => Naming::plural_accessor(&relation.ref_table),
        };

        let property_annotation = match cardinality {
            Cardinality::One => format!("@property {} ${}", type_name, accessor_name),
            Cardinality::Many => format!("@property {}[] ${}", type_name, accessor_name),
        };

        let accessor_code = format!(
            r#"
    /**
     * @return \Illuminate\Database\Eloquent\Relations\{class}
     */
    public function {accessor}()
    {{
        return $this->{method}('{namespace}\{model}', '{foreign_key}', '{local_key}');
    }}
    "#,
            class = kind.class_name(),
            accessor = accessor_name,
            method = kind.method(),
            namespace = self.model_namespace,
            model = type_name,
            foreign_key = relation.foreign_key,
            local_key = relation.local_key,
        );

        GeneratedRelationFragment {
            relation,
            cardinality,
            kind,
            accessor_name,
            type_name,
            accessor_code,
            property_annotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_is_one() {
        let keys = vec![KeyDescriptor::primary("customer_id", 1)];
        assert_eq!(infer_cardinality("customer_id", &keys), Cardinality::One);
    }

    #[test]
    fn test_trailing_column_of_unique_index_is_many() {
        let keys = vec![
            KeyDescriptor::new("orders_number_customer_unique", "number", false, 1),
            KeyDescriptor::new("orders_number_customer_unique", "customer_id", false, 2),
        ];
        assert_eq!(infer_cardinality("customer_id", &keys), Cardinality::Many);
    }

    #[test]
    fn test_last_matching_key_wins() {
        let unique_then_plain = vec![
            KeyDescriptor::new("profiles_customer_id_unique", "customer_id", false, 1),
            KeyDescriptor::new("profiles_customer_id_index", "customer_id", true, 1),
        ];
        assert_eq!(infer_cardinality("customer_id", &unique_then_plain), Cardinality::Many);

        let plain_then_primary = vec![
            KeyDescriptor::new("profiles_customer_id_index", "customer_id", true, 1),
            KeyDescriptor::primary("customer_id", 1),
        ];
        assert_eq!(infer_cardinality("customer_id", &plain_then_primary), Cardinality::One);
    }

    #[test]
    fn test_relation_kind() {
        assert_eq!(
            RelationKind::from_parts(RelationDirection::Outgoing, Cardinality::One),
            RelationKind::BelongsTo
        );
        assert_eq!(
            RelationKind::from_parts(RelationDirection::Incoming, Cardinality::Many).method(),
            "hasMany"
        );
        assert_eq!(RelationKind::HasOne.class_name(), "HasOne");
    }
}
