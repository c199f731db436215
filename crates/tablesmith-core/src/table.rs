use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// A single synthesized cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Canonical string form, used for distinct-value bookkeeping.
    pub fn key(&self) -> String {
        match self {
            Value::Null => "<null>".to_string(),
            Value::Bool(value) => value.to_string(),
            Value::Int(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::Text(value) => value.clone(),
            Value::Date(value) => value.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn to_csv(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(value) => value.clone(),
            other => other.key(),
        }
    }
}

/// A labeled column vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub label: String,
    pub values: Vec<Value>,
}

/// Column-major in-memory table. All columns have equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_rows(&self) -> usize {
        self.columns
            .first()
            .map(|column| column.values.len())
            .unwrap_or(0)
    }

    pub fn num_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, label: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.label.as_str())
    }

    /// Append a column; its length must match the existing row count.
    pub fn push_column(
        &mut self,
        label: impl Into<String>,
        values: Vec<Value>,
    ) -> Result<(), WorkflowError> {
        let label = label.into();
        if !self.columns.is_empty() && values.len() != self.num_rows() {
            return Err(WorkflowError::ColumnLength {
                label,
                expected: self.num_rows(),
                actual: values.len(),
            });
        }
        self.columns.push(Column { label, values });
        Ok(())
    }

    /// Distinct values of a column in first-occurrence order.
    pub fn distinct(&self, label: &str) -> Option<Vec<Value>> {
        let column = self.column(label)?;
        let mut seen = HashSet::new();
        let mut distinct = Vec::new();
        for value in &column.values {
            if seen.insert(value.key()) {
                distinct.push(value.clone());
            }
        }
        Some(distinct)
    }
}
