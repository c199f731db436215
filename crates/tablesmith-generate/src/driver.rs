use std::collections::BTreeSet;

use rand::{Rng, RngCore};
use tracing::{error, info, warn};

use tablesmith_core::{OpChoice, OpKind, ProviderRegistry, Workflow, WorkflowError};

use crate::choices::generate_ops_choices;
use crate::errors::GenerationError;
use crate::join::generate_pkfk_table;
use crate::model::{DriverOptions, RunReport};

/// Running state of a generation loop, carried between attempts.
#[derive(Debug, Clone, Default)]
pub struct DriverState {
    pub generated: usize,
    pub exclusions: BTreeSet<String>,
    pub stop: bool,
}

/// Per-iteration exclusion set: the static excludes, plus `pivot` off the
/// chain interior (it restructures the schema and is only safe as a chain
/// terminator), plus `merge` whenever a single artifact slot remains (a
/// merge consumes an extra slot for its right-side table and would
/// overshoot the target).
pub fn effective_excludes(
    static_excludes: &[OpKind],
    last_planned_op: bool,
    one_slot_left: bool,
) -> Vec<OpKind> {
    let mut exclude = static_excludes.to_vec();
    if !last_planned_op && !exclude.contains(&OpKind::Pivot) {
        exclude.push(OpKind::Pivot);
    }
    if one_slot_left && !exclude.contains(&OpKind::Merge) {
        exclude.push(OpKind::Merge);
    }
    exclude
}

/// Top-level control loop building the artifact lineage graph.
///
/// The driver owns no table state: it selects sources, chains operations,
/// and asks the backend to materialize, until the target artifact count
/// is reached or every artifact has run out of legal operations.
#[derive(Debug, Clone)]
pub struct WorkflowDriver {
    options: DriverOptions,
}

impl WorkflowDriver {
    pub fn new(options: DriverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    /// Run generation to completion against a backend.
    ///
    /// Backend errors during chaining or materialization are fatal: they
    /// are logged with the active chain, the workflow state is persisted
    /// best-effort for postmortem inspection, and the error is returned.
    pub fn run(
        &self,
        wf: &mut dyn Workflow,
        registry: &ProviderRegistry,
        rng: &mut dyn RngCore,
    ) -> Result<RunReport, GenerationError> {
        wf.generate_base_artifact(self.options.base_cols, self.options.base_rows, rng)?;

        let mut state = DriverState {
            generated: wf.artifact_labels().len(),
            ..DriverState::default()
        };

        while state.generated < self.options.num_versions {
            if let Err(err) = self.generate_next(wf, registry, rng, &mut state) {
                self.report_fatal(wf, &err);
                if let Err(persist) = wf.serialize() {
                    warn!(error = %persist, "failed to persist workflow state after error");
                }
                return Err(err);
            }
            if state.stop {
                warn!(
                    generated = state.generated,
                    "stopping workflow generation early"
                );
                break;
            }
        }

        wf.serialize()?;
        Ok(RunReport {
            name: self.options.name.clone(),
            requested: self.options.num_versions,
            generated: state.generated,
            stopped_early: state.stop,
            artifacts: wf.artifact_labels(),
        })
    }

    /// One artifact-generation attempt: select a source, chain up to
    /// `matfreq` operations, materialize.
    fn generate_next(
        &self,
        wf: &mut dyn Workflow,
        registry: &ProviderRegistry,
        rng: &mut dyn RngCore,
        state: &mut DriverState,
    ) -> Result<(), GenerationError> {
        let source = wf.select_random_artifact(self.options.bfactor, &state.exclusions, rng)?;
        info!(artifact = %source, "selected source artifact, initializing operation chain");
        wf.initialize_operation(&source)?;

        let ops_to_do = self.options.matfreq.max(1);
        let mut num_ops = 0;
        let mut force_materialize = false;

        while num_ops < ops_to_do && !force_materialize {
            let last_planned = num_ops == ops_to_do - 1;
            let one_slot_left = self.options.num_versions.saturating_sub(state.generated) <= 1;
            let exclude = effective_excludes(&self.options.exclude_ops, last_planned, one_slot_left);

            let (chain_schema, chain_rows) = {
                let chain = wf.current_chain().ok_or(WorkflowError::NoOpenChain)?;
                (chain.schema.clone(), chain.rows)
            };
            let choices = generate_ops_choices(registry, &chain_schema, chain_rows, &exclude, rng);

            if choices.is_empty() {
                warn!(artifact = %source, "no operation choices available");
                state.exclusions.insert(source.clone());
                let labels = wf.artifact_labels();
                if labels.iter().all(|label| state.exclusions.contains(label)) {
                    warn!("no options remaining for any artifact");
                    state.stop = true;
                }
                break;
            }

            let selected = choices[rng.random_range(0..choices.len())].clone();

            if let OpChoice::Merge { key_col } = &selected {
                self.setup_merge(wf, registry, rng, &source, key_col)?;
                // Merges are never combined with further chained ops.
                force_materialize = true;
            }

            info!(op = %selected.kind(), "chaining operation");
            wf.chain_operation(&selected)?;
            num_ops += 1;
        }

        if num_ops > 0 {
            let label = wf.next_label();
            info!(label = %label, ops = num_ops, "executing operation chain");
            wf.execute_current_operation(&label)?;
        }
        state.generated = wf.artifact_labels().len();
        Ok(())
    }

    /// Synthesize and register the right-side table for a merge, attaching
    /// it as the open chain's second source.
    fn setup_merge(
        &self,
        wf: &mut dyn Workflow,
        registry: &ProviderRegistry,
        rng: &mut dyn RngCore,
        source: &str,
        key_col: &str,
    ) -> Result<(), GenerationError> {
        let source_table = wf.source_table(source)?;
        let source_schema = wf.artifact_schema(source)?;
        let (right_table, right_schema) =
            generate_pkfk_table(registry, &source_table, &source_schema, key_col, None, rng)?;
        let right_label = wf.next_label();
        info!(label = %right_label, key = %key_col, "registering merge right-side artifact");
        wf.register_merge_table(&right_label, right_table, right_schema)?;
        Ok(())
    }

    fn report_fatal(&self, wf: &dyn Workflow, err: &GenerationError) {
        error!(error = %err, "error during generation, stopping");
        if let Some(chain) = wf.current_chain() {
            error!(sources = ?chain.sources, ops = ?chain.choices, "active operation chain");
            if !chain.code.is_empty() {
                error!(code = %chain.code, "accumulated backend code");
            }
        }
        error!(out_dir = %wf.out_dir().display(), "writing out workflow state");
    }
}
