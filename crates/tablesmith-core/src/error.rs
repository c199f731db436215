use thiserror::Error;

use crate::ops::OpKind;

/// Errors surfaced across the workflow backend boundary.
///
/// Everything here is fatal to a generation run; the recoverable
/// no-legal-operation condition is represented by an empty choice list,
/// never by an error.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("operation '{0}' is not supported by this backend")]
    UnsupportedOperation(OpKind),
    #[error("cannot apply '{op}': {reason}")]
    InvalidOperation { op: OpKind, reason: String },
    #[error("unknown artifact '{0}'")]
    UnknownArtifact(String),
    #[error("no artifact available for selection")]
    NoArtifactAvailable,
    #[error("no operation chain is open")]
    NoOpenChain,
    #[error("unknown value provider '{0}'")]
    UnknownProvider(String),
    #[error("column '{label}' has {actual} values, expected {expected}")]
    ColumnLength {
        label: String,
        expected: usize,
        actual: usize,
    },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
