//! Randomized table-workflow generation engine.
//!
//! Builds a lineage graph of synthetic, versioned tables by chaining
//! relational operations (merge, groupby, pivot, sample, project) against
//! a pluggable backend. All randomness flows through an injected seedable
//! RNG so a fixed seed reproduces a run.

pub mod choices;
pub mod driver;
pub mod errors;
pub mod join;
pub mod model;
pub mod schema;
pub mod synth;
pub mod table;

pub use choices::generate_ops_choices;
pub use driver::{DriverState, WorkflowDriver, effective_excludes};
pub use errors::GenerationError;
pub use join::generate_pkfk_table;
pub use model::{DriverOptions, RunReport};
pub use schema::{PREFIX_LEN, generate_schema, random_prefix};
pub use synth::synthesize;
pub use table::{KeyColumn, generate_table};
