use std::collections::BTreeSet;
use std::path::Path;

use rand::RngCore;

use crate::error::WorkflowError;
use crate::ops::OpChoice;
use crate::schema::Schema;
use crate::table::Table;

/// Logical state of an open operation chain.
///
/// `schema` and `rows` track the chain's current shape as operations are
/// appended; `code` is the backend-specific accumulated operation log,
/// surfaced in fatal diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ChainContext {
    pub sources: Vec<String>,
    pub choices: Vec<OpChoice>,
    pub schema: Schema,
    pub rows: usize,
    pub code: String,
}

/// Capability interface for a table-execution backend.
///
/// The generation driver owns no table state of its own: it selects
/// sources, chains operations, and asks the backend to materialize. The
/// lineage graph of artifacts lives entirely behind this trait. RNG-taking
/// methods receive the caller's seedable random source so a fixed seed
/// reproduces a run.
pub trait Workflow {
    fn name(&self) -> &str;

    /// Output directory used for persistence and diagnostics.
    fn out_dir(&self) -> &Path;

    /// Labels of all registered artifacts, in creation order.
    fn artifact_labels(&self) -> Vec<String>;

    fn artifact_rows(&self, label: &str) -> Result<usize, WorkflowError>;

    fn artifact_schema(&self, label: &str) -> Result<Schema, WorkflowError>;

    /// Export an artifact's data as an in-memory table.
    fn source_table(&self, label: &str) -> Result<Table, WorkflowError>;

    /// Synthesize and register the first artifact; returns its label.
    fn generate_base_artifact(
        &mut self,
        num_cols: usize,
        num_rows: usize,
        rng: &mut dyn RngCore,
    ) -> Result<String, WorkflowError>;

    /// Pick a source artifact outside `exclude`, honoring the branching
    /// bias `bfactor`.
    fn select_random_artifact(
        &self,
        bfactor: f64,
        exclude: &BTreeSet<String>,
        rng: &mut dyn RngCore,
    ) -> Result<String, WorkflowError>;

    /// Open a new operation-chain context on a source artifact.
    fn initialize_operation(&mut self, source: &str) -> Result<(), WorkflowError>;

    fn current_chain(&self) -> Option<&ChainContext>;

    /// Append a choice to the open chain, updating its logical state.
    fn chain_operation(&mut self, choice: &OpChoice) -> Result<(), WorkflowError>;

    /// Register an out-of-band artifact (a merge right side) and attach it
    /// as an additional source of the open chain.
    fn register_merge_table(
        &mut self,
        label: &str,
        table: Table,
        schema: Schema,
    ) -> Result<(), WorkflowError>;

    /// Produce a fresh unique artifact label.
    fn next_label(&mut self) -> String;

    /// Materialize the open chain into a new artifact under `label`.
    fn execute_current_operation(&mut self, label: &str) -> Result<(), WorkflowError>;

    /// Persist full workflow state; called on completion and on fatal
    /// errors for postmortem inspection.
    fn serialize(&self) -> Result<(), WorkflowError>;
}
