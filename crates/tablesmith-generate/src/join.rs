use rand::{Rng, RngCore};
use tracing::debug;

use tablesmith_core::{ProviderRegistry, Schema, Table};

use crate::errors::GenerationError;
use crate::schema::generate_schema;
use crate::table::{KeyColumn, generate_table};

/// Build the right-side table and schema for a merge, keyed by the
/// distinct values of `key_col` in the source table.
///
/// When `new_col_size` is absent it is drawn uniformly from
/// `[2, max(3, source_cols + 1))`. The returned schema leads with the key
/// column, carrying the source schema's provider tag so the key stays
/// joinable on both sides.
pub fn generate_pkfk_table(
    registry: &ProviderRegistry,
    source_table: &Table,
    source_schema: &Schema,
    key_col: &str,
    new_col_size: Option<usize>,
    rng: &mut dyn RngCore,
) -> Result<(Table, Schema), GenerationError> {
    let key_values = source_table.distinct(key_col).ok_or_else(|| {
        GenerationError::InvalidTable(format!("key column '{key_col}' not in source table"))
    })?;
    let key_provider = source_schema
        .provider_of(key_col)
        .ok_or_else(|| {
            GenerationError::InvalidTable(format!("key column '{key_col}' not in source schema"))
        })?
        .to_string();

    let new_col_size = new_col_size
        .unwrap_or_else(|| rng.random_range(2..usize::max(3, source_table.num_cols() + 1)));

    let mut new_schema = generate_schema(registry, new_col_size, rng);
    let key = KeyColumn {
        label: key_col.to_string(),
        values: key_values,
    };
    debug!(
        key = %key_col,
        distinct = key.values.len(),
        cols = new_col_size,
        "synthesizing join right table"
    );
    let table = generate_table(key.values.len(), &new_schema, Some(&key), rng)?;
    new_schema.insert_front(key_col, key_provider);

    Ok((table, new_schema))
}
