use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Aggregate function applied by groupby and pivot operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggFunc {
    Min,
    Max,
    Sum,
    Mean,
    Count,
}

impl AggFunc {
    pub const ALL: [AggFunc; 5] = [
        AggFunc::Min,
        AggFunc::Max,
        AggFunc::Sum,
        AggFunc::Mean,
        AggFunc::Count,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggFunc::Min => "min",
            AggFunc::Max => "max",
            AggFunc::Sum => "sum",
            AggFunc::Mean => "mean",
            AggFunc::Count => "count",
        }
    }
}

impl fmt::Display for AggFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation kind, used for exclusion lists and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Groupby,
    Pivot,
    Merge,
    Sample,
    Project,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Groupby => "groupby",
            OpKind::Pivot => "pivot",
            OpKind::Merge => "merge",
            OpKind::Sample => "sample",
            OpKind::Project => "project",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "groupby" => Ok(OpKind::Groupby),
            "pivot" => Ok(OpKind::Pivot),
            "merge" => Ok(OpKind::Merge),
            "sample" => Ok(OpKind::Sample),
            "project" => Ok(OpKind::Project),
            other => Err(format!("unknown operation kind '{other}'")),
        }
    }
}

/// A fully-specified candidate operation.
///
/// One variant per operation kind, carrying exactly that kind's required
/// arguments; serializes as `{"op": ..., "args": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "lowercase")]
pub enum OpChoice {
    Groupby {
        group_columns: Vec<String>,
        agg_columns: Vec<String>,
        agg_function: AggFunc,
    },
    Pivot {
        index_col: String,
        columns_col: String,
        value_col: String,
        agg_function: AggFunc,
    },
    Merge {
        key_col: String,
    },
    Sample {
        frac: f64,
    },
    Project {
        output_cols: Vec<String>,
    },
}

impl OpChoice {
    pub fn kind(&self) -> OpKind {
        match self {
            OpChoice::Groupby { .. } => OpKind::Groupby,
            OpChoice::Pivot { .. } => OpKind::Pivot,
            OpChoice::Merge { .. } => OpKind::Merge,
            OpChoice::Sample { .. } => OpKind::Sample,
            OpChoice::Project { .. } => OpKind::Project,
        }
    }
}
