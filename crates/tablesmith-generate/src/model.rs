use serde::{Deserialize, Serialize};

use tablesmith_core::OpKind;

/// Options for the workflow generation driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverOptions {
    /// Workflow name used for labeling and reports.
    pub name: String,
    /// Target artifact count, including the base artifact.
    pub num_versions: usize,
    /// Column count of the base artifact.
    pub base_cols: usize,
    /// Row count of the base artifact.
    pub base_rows: usize,
    /// Branching bias passed to the backend's source selection.
    pub bfactor: f64,
    /// Operations chained per materialization.
    pub matfreq: usize,
    /// Operation kinds never offered during generation.
    pub exclude_ops: Vec<OpKind>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            name: "wf".to_string(),
            num_versions: 10,
            base_cols: 10,
            base_rows: 1000,
            bfactor: 1.0,
            matfreq: 1,
            exclude_ops: Vec::new(),
        }
    }
}

/// Summary of a finished generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub name: String,
    pub requested: usize,
    pub generated: usize,
    pub stopped_early: bool,
    pub artifacts: Vec<String>,
}
