//! In-memory reference backend for tablesmith.
//!
//! Artifacts are column-store tables held in memory and persisted as CSV
//! plus a JSON workflow manifest. The backend executes `sample` and
//! `project`; the relational kinds (`groupby`, `pivot`, `merge`) are
//! rejected as unsupported.

pub mod artifact;
pub mod workflow;

pub use artifact::MemArtifact;
pub use workflow::{LineageEdge, MemWorkflow};
