use rand::RngCore;
use tracing::{debug, info};

use tablesmith_core::{Schema, Table, Value};

use crate::errors::GenerationError;
use crate::synth::synthesize;

/// A pre-existing key column prepended unchanged to a generated table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyColumn {
    pub label: String,
    pub values: Vec<Value>,
}

/// Materialize a table for a schema.
///
/// Each schema entry becomes a column of `num_rows` independently
/// synthesized values. A supplied key column is prepended unchanged and
/// its length overrides `num_rows`; this is the right-table path for
/// merges, where key values come from the source table.
pub fn generate_table(
    num_rows: usize,
    schema: &Schema,
    key_column: Option<&KeyColumn>,
    rng: &mut dyn RngCore,
) -> Result<Table, GenerationError> {
    let mut table = Table::new();

    let num_rows = match key_column {
        Some(key) => {
            info!(
                rows = key.values.len(),
                cols = schema.len(),
                "generating right-merge table"
            );
            table.push_column(key.label.clone(), key.values.clone())?;
            key.values.len()
        }
        None => {
            info!(rows = num_rows, cols = schema.len(), "generating base table");
            num_rows
        }
    };

    for column in schema.columns() {
        let mut values = Vec::with_capacity(num_rows);
        for _ in 0..num_rows {
            values.push(synthesize(&column.provider, rng)?);
        }
        table.push_column(column.label.clone(), values)?;
    }

    debug!(labels = ?table.labels().collect::<Vec<_>>(), "generated column list");
    Ok(table)
}
