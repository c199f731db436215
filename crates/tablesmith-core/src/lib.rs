//! Core contracts for tablesmith.
//!
//! This crate defines the provider/category registry, schema and table
//! types, the operation-choice variants, and the backend `Workflow`
//! capability trait shared by the generation engine and every backend.

pub mod error;
pub mod ops;
pub mod providers;
pub mod schema;
pub mod table;
pub mod workflow;

pub use error::WorkflowError;
pub use ops::{AggFunc, OpChoice, OpKind};
pub use providers::{Category, ProviderRegistry, ProviderSpec};
pub use schema::{Schema, SchemaColumn, category_map};
pub use table::{Column, Table, Value};
pub use workflow::{ChainContext, Workflow};

/// Separator between the random column prefix and the provider tag.
pub const LABEL_SEPARATOR: &str = "__";
