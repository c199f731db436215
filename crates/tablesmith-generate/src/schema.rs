use rand::{Rng, RngCore};
use rand::distr::Alphanumeric;

use tablesmith_core::{Category, LABEL_SEPARATOR, ProviderRegistry, Schema};

/// Length of the random alphanumeric column prefix.
pub const PREFIX_LEN: usize = 5;

/// Random alphanumeric prefix for a column label.
///
/// Prefixes are drawn independently per column with no collision check,
/// so duplicate labels are possible for very large schemas.
pub fn random_prefix(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// Generate a random schema of `num_cols` columns.
///
/// Below the category count, provider tags are sampled with replacement
/// from the full tag union. At or above it, every category receives at
/// least one column: per-category counts start at one and a uniformly
/// chosen category is incremented until the total matches, then each
/// category's tags are sampled with replacement.
pub fn generate_schema(
    registry: &ProviderRegistry,
    num_cols: usize,
    rng: &mut dyn RngCore,
) -> Schema {
    let mut selection: Vec<&'static str> = Vec::with_capacity(num_cols);

    if num_cols < registry.num_categories() {
        let tags = registry.all_tags();
        for _ in 0..num_cols {
            selection.push(tags[rng.random_range(0..tags.len())]);
        }
    } else {
        let mut counts = vec![1_usize; registry.num_categories()];
        let mut total = counts.len();
        while total < num_cols {
            let idx = rng.random_range(0..counts.len());
            counts[idx] += 1;
            total += 1;
        }
        for (category, count) in Category::ALL.into_iter().zip(counts) {
            let tags = registry.providers_for(category);
            for _ in 0..count {
                selection.push(tags[rng.random_range(0..tags.len())]);
            }
        }
    }

    let mut schema = Schema::new();
    for tag in selection {
        let prefix = random_prefix(rng, PREFIX_LEN);
        schema.push(format!("{prefix}{LABEL_SEPARATOR}{tag}"), tag);
    }
    schema
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn prefix_has_requested_length_and_charset() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let prefix = random_prefix(&mut rng, PREFIX_LEN);
        assert_eq!(prefix.len(), PREFIX_LEN);
        assert!(prefix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn labels_are_prefix_separator_tag() {
        let registry = ProviderRegistry::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let schema = generate_schema(&registry, 6, &mut rng);
        for column in schema.columns() {
            let (prefix, tag) = column
                .label
                .split_once(LABEL_SEPARATOR)
                .expect("label has separator");
            assert_eq!(prefix.len(), PREFIX_LEN);
            assert_eq!(tag, column.provider);
            assert!(registry.is_known(tag));
        }
    }
}
