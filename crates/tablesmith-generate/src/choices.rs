use rand::seq::{IndexedRandom, index};
use rand::{Rng, RngCore};
use tracing::debug;

use tablesmith_core::{
    AggFunc, Category, OpChoice, OpKind, ProviderRegistry, Schema, category_map,
};

/// Pick `num` distinct entries uniformly without replacement, or `None`
/// when there are not enough to choose from.
fn select_rand_cols(options: &[String], num: usize, rng: &mut dyn RngCore) -> Option<Vec<String>> {
    if num == 0 || options.len() < num {
        return None;
    }
    let picked = index::sample(rng, options.len(), num);
    Some(picked.iter().map(|ix| options[ix].clone()).collect())
}

fn select_rand_aggregate(rng: &mut dyn RngCore) -> AggFunc {
    AggFunc::ALL.choose(rng).copied().unwrap_or(AggFunc::Count)
}

/// Sample fraction drawn uniformly from [0.1, 0.99], rounded to two
/// decimals.
fn random_fraction(rng: &mut dyn RngCore) -> f64 {
    let frac = 0.1 + (0.99 - 0.1) * rng.random::<f64>();
    (frac * 100.0).round() / 100.0
}

/// Enumerate the operations legal against a schema and row count, with
/// fully specified arguments.
///
/// A sub-choice that cannot find enough distinct columns is omitted
/// rather than failing the call; kinds in `exclude` are filtered last.
/// An empty result is the no-legal-operation condition.
pub fn generate_ops_choices(
    registry: &ProviderRegistry,
    schema: &Schema,
    num_rows: usize,
    exclude: &[OpKind],
    rng: &mut dyn RngCore,
) -> Vec<OpChoice> {
    let col_types = category_map(schema, registry);
    let mut choices = Vec::new();

    if let (Some(numeric), Some(groupable)) = (
        col_types.get(&Category::Numeric),
        col_types.get(&Category::Groupable),
    ) {
        let num_groups = usize::min(rng.random_range(1..3), groupable.len());
        if let Some(group_columns) = select_rand_cols(groupable, num_groups, rng) {
            choices.push(OpChoice::Groupby {
                group_columns,
                agg_columns: numeric.clone(),
                agg_function: select_rand_aggregate(rng),
            });
        }

        if groupable.len() >= 2 {
            let pair = select_rand_cols(groupable, 2, rng);
            let value = select_rand_cols(numeric, 1, rng);
            if let (Some(pair), Some(value)) = (pair, value) {
                let mut pair = pair.into_iter();
                if let (Some(index_col), Some(columns_col), Some(value_col)) =
                    (pair.next(), pair.next(), value.into_iter().next())
                {
                    choices.push(OpChoice::Pivot {
                        index_col,
                        columns_col,
                        value_col,
                        agg_function: select_rand_aggregate(rng),
                    });
                }
            }
        }
    }

    if let Some(joinable) = col_types.get(&Category::Joinable) {
        if let Some(key_col) =
            select_rand_cols(joinable, 1, rng).and_then(|cols| cols.into_iter().next())
        {
            choices.push(OpChoice::Merge { key_col });
        }
    }

    if num_rows >= 10 {
        choices.push(OpChoice::Sample {
            frac: random_fraction(rng),
        });
    }

    if schema.len() > 2 {
        let labels: Vec<String> = schema.labels().map(str::to_string).collect();
        let keep = rng.random_range(1..=schema.len() - 2);
        if let Some(output_cols) = select_rand_cols(&labels, keep, rng) {
            choices.push(OpChoice::Project { output_cols });
        }
    }

    choices.retain(|choice| !exclude.contains(&choice.kind()));
    debug!(num_rows, choices = choices.len(), "enumerated operation choices");
    choices
}
