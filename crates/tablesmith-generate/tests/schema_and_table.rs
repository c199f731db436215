use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tablesmith_core::{Category, ProviderRegistry, Value, category_map};
use tablesmith_generate::{KeyColumn, generate_schema, generate_table};

#[test]
fn schema_has_exactly_the_requested_columns() {
    let registry = ProviderRegistry::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for num_cols in 1..=16 {
        let schema = generate_schema(&registry, num_cols, &mut rng);
        assert_eq!(schema.len(), num_cols);
    }
}

#[test]
fn large_schemas_cover_every_category() {
    let registry = ProviderRegistry::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    for num_cols in registry.num_categories()..=20 {
        let schema = generate_schema(&registry, num_cols, &mut rng);
        let map = category_map(&schema, &registry);
        for category in Category::ALL {
            assert!(
                map.get(&category).is_some_and(|cols| !cols.is_empty()),
                "schema of {num_cols} columns misses category {category}"
            );
        }
    }
}

#[test]
fn small_schemas_sample_from_the_tag_union() {
    let registry = ProviderRegistry::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for num_cols in 1..registry.num_categories() {
        let schema = generate_schema(&registry, num_cols, &mut rng);
        assert_eq!(schema.len(), num_cols);
        for column in schema.columns() {
            assert!(registry.is_known(&column.provider));
        }
    }
}

#[test]
fn table_columns_match_schema_and_row_count() {
    let registry = ProviderRegistry::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let schema = generate_schema(&registry, 6, &mut rng);
    let table = generate_table(25, &schema, None, &mut rng).expect("generate table");

    assert_eq!(table.num_cols(), schema.len());
    assert_eq!(table.num_rows(), 25);
    for column in table.columns() {
        assert_eq!(column.values.len(), 25);
        assert!(schema.contains(&column.label));
    }
}

#[test]
fn key_column_is_prepended_and_overrides_row_count() {
    let registry = ProviderRegistry::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let schema = generate_schema(&registry, 4, &mut rng);
    let key = KeyColumn {
        label: "k__city".to_string(),
        values: vec![
            Value::Text("Springfield".into()),
            Value::Text("Shelbyville".into()),
            Value::Text("Ogdenville".into()),
        ],
    };

    let table = generate_table(100, &schema, Some(&key), &mut rng).expect("generate table");

    assert_eq!(table.num_rows(), 3);
    assert_eq!(table.num_cols(), schema.len() + 1);
    let first = &table.columns()[0];
    assert_eq!(first.label, key.label);
    assert_eq!(first.values, key.values);
}

#[test]
fn fixed_seed_reproduces_schema_and_table() {
    let registry = ProviderRegistry::builtin();

    let mut first = ChaCha8Rng::seed_from_u64(99);
    let mut second = ChaCha8Rng::seed_from_u64(99);

    let schema_a = generate_schema(&registry, 8, &mut first);
    let schema_b = generate_schema(&registry, 8, &mut second);
    assert_eq!(schema_a, schema_b);

    let table_a = generate_table(40, &schema_a, None, &mut first).expect("generate table");
    let table_b = generate_table(40, &schema_b, None, &mut second).expect("generate table");
    assert_eq!(table_a, table_b);
}
