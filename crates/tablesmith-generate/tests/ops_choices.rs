use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tablesmith_core::{OpChoice, OpKind, ProviderRegistry, Schema};
use tablesmith_generate::generate_ops_choices;

fn schema_of(entries: &[(&str, &str)]) -> Schema {
    let mut schema = Schema::new();
    for (label, provider) in entries {
        schema.push(*label, *provider);
    }
    schema
}

fn kinds(choices: &[OpChoice]) -> Vec<OpKind> {
    choices.iter().map(OpChoice::kind).collect()
}

#[test]
fn full_schema_offers_every_kind() {
    let registry = ProviderRegistry::builtin();
    let schema = schema_of(&[
        ("a1__city", "city"),
        ("b2__state_abbr", "state_abbr"),
        ("c3__weekday", "weekday"),
        ("d4__int_small", "int_small"),
        ("e5__word", "word"),
    ]);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let choices = generate_ops_choices(&registry, &schema, 100, &[], &mut rng);
    let kinds = kinds(&choices);
    for kind in [
        OpKind::Groupby,
        OpKind::Pivot,
        OpKind::Merge,
        OpKind::Sample,
        OpKind::Project,
    ] {
        assert!(kinds.contains(&kind), "missing {kind}");
    }
}

#[test]
fn groupby_requires_numeric_and_groupable() {
    let registry = ProviderRegistry::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    let numeric_only = schema_of(&[("a__int_small", "int_small"), ("b__price", "price")]);
    let choices = generate_ops_choices(&registry, &numeric_only, 100, &[], &mut rng);
    assert!(!kinds(&choices).contains(&OpKind::Groupby));

    let groupable_only = schema_of(&[("a__weekday", "weekday"), ("b__month", "month")]);
    let choices = generate_ops_choices(&registry, &groupable_only, 100, &[], &mut rng);
    assert!(!kinds(&choices).contains(&OpKind::Groupby));

    let both = schema_of(&[("a__weekday", "weekday"), ("b__int_small", "int_small")]);
    let choices = generate_ops_choices(&registry, &both, 100, &[], &mut rng);
    let groupby = choices
        .iter()
        .find(|choice| choice.kind() == OpKind::Groupby)
        .expect("groupby offered");
    match groupby {
        OpChoice::Groupby {
            group_columns,
            agg_columns,
            ..
        } => {
            assert_eq!(group_columns, &vec!["a__weekday".to_string()]);
            // Aggregation targets all numeric columns.
            assert_eq!(agg_columns, &vec!["b__int_small".to_string()]);
        }
        other => panic!("unexpected choice {other:?}"),
    }
}

#[test]
fn pivot_needs_two_distinct_groupable_columns() {
    let registry = ProviderRegistry::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let one_groupable = schema_of(&[("a__weekday", "weekday"), ("b__int_small", "int_small")]);
    let choices = generate_ops_choices(&registry, &one_groupable, 100, &[], &mut rng);
    assert!(!kinds(&choices).contains(&OpKind::Pivot));

    let two_groupable = schema_of(&[
        ("a__weekday", "weekday"),
        ("b__month", "month"),
        ("c__int_small", "int_small"),
    ]);
    for _ in 0..16 {
        let choices = generate_ops_choices(&registry, &two_groupable, 100, &[], &mut rng);
        let pivot = choices
            .iter()
            .find(|choice| choice.kind() == OpKind::Pivot)
            .expect("pivot offered");
        match pivot {
            OpChoice::Pivot {
                index_col,
                columns_col,
                value_col,
                ..
            } => {
                assert_ne!(index_col, columns_col);
                assert_eq!(value_col, "c__int_small");
            }
            other => panic!("unexpected choice {other:?}"),
        }
    }
}

#[test]
fn merge_requires_a_joinable_column() {
    let registry = ProviderRegistry::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let no_joinable = schema_of(&[("a__word", "word"), ("b__int_small", "int_small")]);
    let choices = generate_ops_choices(&registry, &no_joinable, 100, &[], &mut rng);
    assert!(!kinds(&choices).contains(&OpKind::Merge));

    let joinable = schema_of(&[("a__city", "city"), ("b__word", "word")]);
    let choices = generate_ops_choices(&registry, &joinable, 100, &[], &mut rng);
    let merge = choices
        .iter()
        .find(|choice| choice.kind() == OpKind::Merge)
        .expect("merge offered");
    assert_eq!(
        merge,
        &OpChoice::Merge {
            key_col: "a__city".to_string()
        }
    );
}

#[test]
fn sample_needs_at_least_ten_rows() {
    let registry = ProviderRegistry::builtin();
    let schema = schema_of(&[("a__word", "word"), ("b__word", "word")]);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let choices = generate_ops_choices(&registry, &schema, 9, &[], &mut rng);
    assert!(!kinds(&choices).contains(&OpKind::Sample));

    let choices = generate_ops_choices(&registry, &schema, 10, &[], &mut rng);
    let sample = choices
        .iter()
        .find(|choice| choice.kind() == OpKind::Sample)
        .expect("sample offered");
    match sample {
        OpChoice::Sample { frac } => assert!((0.1..=0.99).contains(frac)),
        other => panic!("unexpected choice {other:?}"),
    }
}

#[test]
fn project_keeps_a_strict_subset() {
    let registry = ProviderRegistry::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    let two_cols = schema_of(&[("a__word", "word"), ("b__word", "word")]);
    let choices = generate_ops_choices(&registry, &two_cols, 100, &[], &mut rng);
    assert!(!kinds(&choices).contains(&OpKind::Project));

    let five_cols = schema_of(&[
        ("a__word", "word"),
        ("b__word", "word"),
        ("c__word", "word"),
        ("d__word", "word"),
        ("e__word", "word"),
    ]);
    for _ in 0..32 {
        let choices = generate_ops_choices(&registry, &five_cols, 100, &[], &mut rng);
        let project = choices
            .iter()
            .find(|choice| choice.kind() == OpKind::Project)
            .expect("project offered");
        match project {
            OpChoice::Project { output_cols } => {
                assert!((1..=five_cols.len() - 2).contains(&output_cols.len()));
                for label in output_cols {
                    assert!(five_cols.contains(label));
                }
            }
            other => panic!("unexpected choice {other:?}"),
        }
    }
}

#[test]
fn excluded_kinds_never_appear() {
    let registry = ProviderRegistry::builtin();
    let schema = schema_of(&[
        ("a1__city", "city"),
        ("b2__state_abbr", "state_abbr"),
        ("c3__weekday", "weekday"),
        ("d4__int_small", "int_small"),
        ("e5__word", "word"),
    ]);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let exclude = [OpKind::Groupby, OpKind::Pivot, OpKind::Merge];
    let choices = generate_ops_choices(&registry, &schema, 100, &exclude, &mut rng);
    for kind in kinds(&choices) {
        assert!(!exclude.contains(&kind));
    }
    assert!(!choices.is_empty());

    let all = [
        OpKind::Groupby,
        OpKind::Pivot,
        OpKind::Merge,
        OpKind::Sample,
        OpKind::Project,
    ];
    let choices = generate_ops_choices(&registry, &schema, 100, &all, &mut rng);
    assert!(choices.is_empty());
}

#[test]
fn nothing_eligible_yields_an_empty_list() {
    let registry = ProviderRegistry::builtin();
    let schema = schema_of(&[("a__word", "word"), ("b__sentence", "sentence")]);
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let choices = generate_ops_choices(&registry, &schema, 5, &[], &mut rng);
    assert!(choices.is_empty());
}
