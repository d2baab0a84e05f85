//! Model Replacement Builder
//!
//! Column driven placeholders of the model stub: doc block properties,
//! validation rules, fillable attributes and soft deletes.

use crudkit_introspect::ColumnInfo;

use crate::relations::ResolvedRelations;
use crate::replacements::Replacements;

const SOFT_DELETE_COLUMN: &str = "deleted_at";

pub struct ModelReplacementBuilder<'a> {
    columns: &'a [ColumnInfo],
    unwanted_columns: &'a [String],
}

impl<'a> ModelReplacementBuilder<'a> {
    pub fn new(columns: &'a [ColumnInfo], unwanted_columns: &'a [String]) -> Self {
        Self {
            columns,
            unwanted_columns,
        }
    }

    fn is_wanted(&self, column: &str) -> bool {
        !self.unwanted_columns.iter().any(|unwanted| unwanted == column)
    }

    /// Columns shown in forms and views and made fillable
    pub fn filtered_columns(&self) -> Vec<&'a str> {
        self.columns
            .iter()
            .map(|column| column.name.as_str())
            .filter(|name| self.is_wanted(name))
            .collect()
    }

    /// Doc block lines for every column, before relation annotations are appended
    pub fn base_properties(&self) -> String {
        let mut properties = String::from("*");
        for column in self.columns {
            properties.push_str(&format!("\n * @property ${}", column.name));
        }
        properties.push_str("\n *");
        properties
    }

    /// `required` rules for wanted NOT NULL columns
    pub fn rules(&self) -> String {
        self.columns
            .iter()
            .filter(|column| !column.nullable && self.is_wanted(&column.name))
            .map(|column| format!("\n\t\t'{}' => 'required',", column.name))
            .collect()
    }

    pub fn fillable(&self) -> String {
        self.filtered_columns()
            .iter()
            .map(|name| format!("\n\t\t'{}'", name))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn has_soft_deletes(&self) -> bool {
        self.columns.iter().any(|column| column.name == SOFT_DELETE_COLUMN)
    }

    /// Model stub placeholders; `relations` carries the resolved accessors and
    /// the completed doc block
    pub fn build(&self, name_table: &str, relations: &ResolvedRelations) -> Replacements {
        let (soft_deletes_namespace, soft_deletes) = if self.has_soft_deletes() {
            (
                "use Illuminate\\Database\\Eloquent\\SoftDeletes;\n",
                "use SoftDeletes;\n",
            )
        } else {
            ("", "")
        };

        Replacements::new()
            .with("{{fillable}}", self.fillable())
            .with("{{nameTable}}", name_table)
            .with("{{rules}}", self.rules())
            .with("{{relations}}", relations.functions.as_str())
            .with("{{properties}}", relations.properties.as_str())
            .with("{{softDeletesNamespace}}", soft_deletes_namespace)
            .with("{{softDeletes}}", soft_deletes)
    }
}
