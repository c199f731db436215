use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rand::seq::index;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use tablesmith_core::{
    ChainContext, OpChoice, OpKind, ProviderRegistry, Schema, Table, Workflow, WorkflowError,
};
use tablesmith_generate::{GenerationError, generate_schema, generate_table};

use crate::artifact::MemArtifact;

/// One materialized edge of the lineage graph.
#[derive(Debug, Clone, Serialize)]
pub struct LineageEdge {
    pub sources: Vec<String>,
    pub dest: String,
    pub ops: Vec<OpChoice>,
    pub code: String,
}

/// In-memory backend implementing the `Workflow` capability interface.
///
/// Owns the artifact list and lineage edges; labels follow the sequence
/// `a0, a1, ...` in creation order.
pub struct MemWorkflow {
    name: String,
    out_dir: PathBuf,
    artifact_dir: PathBuf,
    run_id: String,
    registry: ProviderRegistry,
    artifacts: Vec<MemArtifact>,
    edges: Vec<LineageEdge>,
    chain: Option<ChainContext>,
    label_seq: usize,
    // Row sampling happens at materialization, which carries no caller
    // RNG; draws come from this workflow-owned seeded source instead.
    sampler: ChaCha8Rng,
}

impl MemWorkflow {
    pub fn new(name: impl Into<String>, out_dir: impl Into<PathBuf>, seed: u64) -> Self {
        let out_dir = out_dir.into();
        Self {
            name: name.into(),
            artifact_dir: out_dir.join("artifacts"),
            out_dir,
            run_id: uuid::Uuid::new_v4().to_string(),
            registry: ProviderRegistry::builtin(),
            artifacts: Vec::new(),
            edges: Vec::new(),
            chain: None,
            label_seq: 0,
            sampler: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn artifacts(&self) -> &[MemArtifact] {
        &self.artifacts
    }

    pub fn edges(&self) -> &[LineageEdge] {
        &self.edges
    }

    fn artifact(&self, label: &str) -> Result<&MemArtifact, WorkflowError> {
        self.artifacts
            .iter()
            .find(|artifact| artifact.label == label)
            .ok_or_else(|| WorkflowError::UnknownArtifact(label.to_string()))
    }

    fn register(&mut self, artifact: MemArtifact) {
        info!(
            label = %artifact.label,
            rows = artifact.rows(),
            cols = artifact.table.num_cols(),
            "artifact registered"
        );
        self.artifacts.push(artifact);
    }

    fn apply_chain(&mut self, chain: &ChainContext) -> Result<(Table, Schema), WorkflowError> {
        let source = chain
            .sources
            .first()
            .ok_or(WorkflowError::NoOpenChain)?
            .clone();
        let (mut table, mut schema) = {
            let artifact = self.artifact(&source)?;
            (artifact.table.clone(), artifact.schema.clone())
        };

        for choice in &chain.choices {
            match choice {
                OpChoice::Sample { frac } => {
                    let rows = table.num_rows();
                    if rows == 0 {
                        continue;
                    }
                    let keep = ((rows as f64) * frac).round().max(1.0) as usize;
                    let keep = keep.min(rows);
                    let mut picked = index::sample(&mut self.sampler, rows, keep).into_vec();
                    picked.sort_unstable();
                    table = take_rows(&table, &picked)?;
                }
                OpChoice::Project { output_cols } => {
                    table = project_columns(&table, output_cols)?;
                    schema.retain_labels(output_cols);
                }
                other => return Err(WorkflowError::UnsupportedOperation(other.kind())),
            }
        }
        Ok((table, schema))
    }
}

impl Workflow for MemWorkflow {
    fn name(&self) -> &str {
        &self.name
    }

    fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn artifact_labels(&self) -> Vec<String> {
        self.artifacts
            .iter()
            .map(|artifact| artifact.label.clone())
            .collect()
    }

    fn artifact_rows(&self, label: &str) -> Result<usize, WorkflowError> {
        Ok(self.artifact(label)?.rows())
    }

    fn artifact_schema(&self, label: &str) -> Result<Schema, WorkflowError> {
        Ok(self.artifact(label)?.schema.clone())
    }

    fn source_table(&self, label: &str) -> Result<Table, WorkflowError> {
        Ok(self.artifact(label)?.table.clone())
    }

    fn generate_base_artifact(
        &mut self,
        num_cols: usize,
        num_rows: usize,
        rng: &mut dyn RngCore,
    ) -> Result<String, WorkflowError> {
        let schema = generate_schema(&self.registry, num_cols, rng);
        let table =
            generate_table(num_rows, &schema, None, rng).map_err(into_workflow_error)?;
        let label = self.next_label();
        let filename = self.artifact_dir.join(format!("{label}.csv"));
        self.register(MemArtifact::new(label.clone(), filename, schema, table));
        Ok(label)
    }

    fn select_random_artifact(
        &self,
        bfactor: f64,
        exclude: &BTreeSet<String>,
        rng: &mut dyn RngCore,
    ) -> Result<String, WorkflowError> {
        let eligible: Vec<&str> = self
            .artifacts
            .iter()
            .map(|artifact| artifact.label.as_str())
            .filter(|label| !exclude.contains(*label))
            .collect();
        if eligible.is_empty() {
            return Err(WorkflowError::NoArtifactAvailable);
        }

        // Deepen from the newest eligible artifact with probability
        // 1/(1+bfactor); branch uniformly over all eligible otherwise.
        let deepen = 1.0 / (1.0 + bfactor.max(0.0));
        let label = if rng.random_bool(deepen.clamp(0.0, 1.0)) {
            eligible[eligible.len() - 1]
        } else {
            eligible[rng.random_range(0..eligible.len())]
        };
        debug!(label = %label, bfactor, "selected source artifact");
        Ok(label.to_string())
    }

    fn initialize_operation(&mut self, source: &str) -> Result<(), WorkflowError> {
        let artifact = self.artifact(source)?;
        self.chain = Some(ChainContext {
            sources: vec![source.to_string()],
            choices: Vec::new(),
            schema: artifact.schema.clone(),
            rows: artifact.rows(),
            code: format!("load({source})\n"),
        });
        Ok(())
    }

    fn current_chain(&self) -> Option<&ChainContext> {
        self.chain.as_ref()
    }

    fn chain_operation(&mut self, choice: &OpChoice) -> Result<(), WorkflowError> {
        let chain = self.chain.as_mut().ok_or(WorkflowError::NoOpenChain)?;
        match choice {
            OpChoice::Sample { frac } => {
                chain.rows = (((chain.rows as f64) * frac).round() as usize).max(1);
                chain.code.push_str(&format!("sample(frac={frac})\n"));
            }
            OpChoice::Project { output_cols } => {
                for label in output_cols {
                    if !chain.schema.contains(label) {
                        return Err(WorkflowError::InvalidOperation {
                            op: OpKind::Project,
                            reason: format!("unknown column '{label}'"),
                        });
                    }
                }
                chain.schema.retain_labels(output_cols);
                chain
                    .code
                    .push_str(&format!("project(cols={output_cols:?})\n"));
            }
            other => return Err(WorkflowError::UnsupportedOperation(other.kind())),
        }
        chain.choices.push(choice.clone());
        Ok(())
    }

    fn register_merge_table(
        &mut self,
        label: &str,
        table: Table,
        schema: Schema,
    ) -> Result<(), WorkflowError> {
        let chain = self.chain.as_mut().ok_or(WorkflowError::NoOpenChain)?;
        chain.sources.push(label.to_string());
        let filename = self.artifact_dir.join(format!("{label}.csv"));
        self.register(MemArtifact::new(label, filename, schema, table));
        Ok(())
    }

    fn next_label(&mut self) -> String {
        let label = format!("a{}", self.label_seq);
        self.label_seq += 1;
        label
    }

    fn execute_current_operation(&mut self, label: &str) -> Result<(), WorkflowError> {
        let chain = self.chain.clone().ok_or(WorkflowError::NoOpenChain)?;
        let (table, schema) = self.apply_chain(&chain)?;
        let filename = self.artifact_dir.join(format!("{label}.csv"));
        self.register(MemArtifact::new(label, filename, schema, table));
        self.edges.push(LineageEdge {
            sources: chain.sources,
            dest: label.to_string(),
            ops: chain.choices,
            code: chain.code,
        });
        self.chain = None;
        Ok(())
    }

    fn serialize(&self) -> Result<(), WorkflowError> {
        std::fs::create_dir_all(&self.artifact_dir)?;
        for artifact in &self.artifacts {
            artifact.serialize(&artifact.filename)?;
        }

        let manifest = WorkflowManifest {
            name: &self.name,
            run_id: &self.run_id,
            written_at: chrono::Utc::now().to_rfc3339(),
            artifacts: self
                .artifacts
                .iter()
                .map(|artifact| ArtifactManifest {
                    label: &artifact.label,
                    filename: &artifact.filename,
                    rows: artifact.rows(),
                    schema: &artifact.schema,
                })
                .collect(),
            edges: &self.edges,
        };
        let encoded = serde_json::to_vec_pretty(&manifest)
            .map_err(|err| WorkflowError::Storage(err.to_string()))?;
        std::fs::write(self.out_dir.join("workflow.json"), encoded)?;

        info!(
            run_id = %self.run_id,
            artifacts = self.artifacts.len(),
            edges = self.edges.len(),
            "workflow state written"
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct ArtifactManifest<'a> {
    label: &'a str,
    filename: &'a Path,
    rows: usize,
    schema: &'a Schema,
}

#[derive(Serialize)]
struct WorkflowManifest<'a> {
    name: &'a str,
    run_id: &'a str,
    written_at: String,
    artifacts: Vec<ArtifactManifest<'a>>,
    edges: &'a [LineageEdge],
}

fn into_workflow_error(err: GenerationError) -> WorkflowError {
    match err {
        GenerationError::Workflow(inner) => inner,
        GenerationError::UnknownProvider(tag) => WorkflowError::UnknownProvider(tag),
        other => WorkflowError::Storage(other.to_string()),
    }
}

fn take_rows(table: &Table, keep: &[usize]) -> Result<Table, WorkflowError> {
    let mut out = Table::new();
    for column in table.columns() {
        let values = keep.iter().map(|ix| column.values[*ix].clone()).collect();
        out.push_column(column.label.clone(), values)?;
    }
    Ok(out)
}

fn project_columns(table: &Table, output_cols: &[String]) -> Result<Table, WorkflowError> {
    for label in output_cols {
        if table.column(label).is_none() {
            return Err(WorkflowError::InvalidOperation {
                op: OpKind::Project,
                reason: format!("unknown column '{label}'"),
            });
        }
    }
    let mut out = Table::new();
    for column in table.columns() {
        if output_cols.contains(&column.label) {
            out.push_column(column.label.clone(), column.values.clone())?;
        }
    }
    Ok(out)
}
