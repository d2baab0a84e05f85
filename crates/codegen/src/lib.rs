//! # crudkit-codegen
//!
//! Relationship resolution and CRUD scaffolding from database metadata.

pub mod error;
pub mod generator;
pub mod model;
pub mod relations;
pub mod replacements;
pub mod service;
pub mod templates;
pub mod writer;

pub use error::{CodegenError, CodegenResult};
pub use generator::*;
pub use model::ModelReplacementBuilder;
pub use relations::{
    infer_cardinality, Cardinality, GeneratedRelationFragment, RelationKind, RelationshipResolver,
    ResolvedRelations,
};
pub use replacements::Replacements;
pub use service::{service_folder, ServiceTarget};
pub use templates::{render_template, StubLoader, ViewStack};
pub use writer::*;
