//! Naming conventions for generated code
//!
//! Table names are snake_case plurals (`order_items`), model classes are
//! StudlyCase singulars (`OrderItem`) and relation accessors are camelCase.

use inflector::Inflector;

/// Naming helpers shared by the resolver and the stub replacements
pub struct Naming;

impl Naming {
    /// Singularize a word or identifier
    ///
    /// ```
    /// # use crudkit_core::Naming;
    /// assert_eq!(Naming::singular("customers"), "customer");
    /// assert_eq!(Naming::singular("categories"), "category");
    /// ```
    #[must_use]
    pub fn singular(input: &str) -> String {
        input.to_singular()
    }

    /// Pluralize a word or identifier
    ///
    /// The input is singularized first so already plural names stay stable.
    ///
    /// ```
    /// # use crudkit_core::Naming;
    /// assert_eq!(Naming::plural("order"), "orders");
    /// assert_eq!(Naming::plural("orders"), "orders");
    /// ```
    #[must_use]
    pub fn plural(input: &str) -> String {
        input.to_singular().to_plural()
    }

    /// `StudlyCase`
    #[must_use]
    pub fn studly(input: &str) -> String {
        input.to_pascal_case()
    }

    /// `camelCase`
    #[must_use]
    pub fn camel(input: &str) -> String {
        input.to_camel_case()
    }

    #[must_use]
    pub fn kebab(input: &str) -> String {
        input.to_kebab_case()
    }

    #[must_use]
    pub fn snake(input: &str) -> String {
        input.to_snake_case()
    }

    /// Human readable title, `OrderItem` becomes `Order Item`
    #[must_use]
    pub fn title(input: &str) -> String {
        input.to_title_case()
    }

    /// Model class for a table: `order_items` becomes `OrderItem`
    #[must_use]
    pub fn model_class(table: &str) -> String {
        Self::studly(&Self::singular(table))
    }

    /// Accessor name for a to-one relation: `customers` becomes `customer`
    #[must_use]
    pub fn singular_accessor(table: &str) -> String {
        Self::camel(&Self::singular(table))
    }

    /// Accessor name for a to-many relation: `order_items` becomes `orderItems`
    #[must_use]
    pub fn plural_accessor(table: &str) -> String {
        Self::camel(&Self::plural(table))
    }

    /// Column label used in views: `first_name` becomes `First Name`
    #[must_use]
    pub fn column_title(column: &str) -> String {
        column.replace('_', " ").to_title_case()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_class() {
        assert_eq!(Naming::model_class("customers"), "Customer");
        assert_eq!(Naming::model_class("orders"), "Order");
        assert_eq!(Naming::model_class("order_items"), "OrderItem");
        assert_eq!(Naming::model_class("categories"), "Category");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Naming::singular_accessor("customers"), "customer");
        assert_eq!(Naming::plural_accessor("orders"), "orders");
        assert_eq!(Naming::singular_accessor("order_items"), "orderItem");
        assert_eq!(Naming::plural_accessor("order_items"), "orderItems");
        assert_eq!(Naming::plural_accessor("category"), "categories");
    }

    #[test]
    fn test_case_conversions() {
        assert_eq!(Naming::kebab("OrderItem"), "order-item");
        assert_eq!(Naming::snake("OrderItem"), "order_item");
        assert_eq!(Naming::title("OrderItem"), "Order Item");
        assert_eq!(Naming::camel("OrderItem"), "orderItem");
        assert_eq!(Naming::column_title("first_name"), "First Name");
    }
}
