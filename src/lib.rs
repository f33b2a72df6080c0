//! JSON Schema → immutable PHP class model.
//!
//! [`lower::parse_schema`] turns a schema document into [`ir::TypeSet`]s,
//! [`graph::ClassGraphBuilder`] walks them into a
//! [`model::ClassDescriptionCollection`] of entities and value objects, and
//! [`emit::PhpEmitter`] renders the collection. [`generator::Generator`]
//! runs the whole pipeline from a [`config::GeneratorConfig`].
pub mod config;
pub mod emit;
pub mod error;
pub mod exception;
pub mod generator;
pub mod graph;
pub mod ir;
pub mod jq_exec;
pub mod lower;
pub mod model;
pub mod naming;
pub mod path_de;
pub mod post_process;
pub mod value_object;

pub use config::GeneratorConfig;
pub use error::{GenerateError, Result};
pub use generator::Generator;
pub use model::{ClassDescription, ClassDescriptionCollection};
