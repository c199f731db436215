use thiserror::Error;

use tablesmith_core::WorkflowError;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),
    #[error("unknown value provider '{0}'")]
    UnknownProvider(String),
    #[error("invalid table: {0}")]
    InvalidTable(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
