use std::collections::HashMap;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tablesmith_core::{OpKind, ProviderRegistry};
use tablesmith_generate::{DriverOptions, RunReport, WorkflowDriver};
use tablesmith_mem::{MemArtifact, MemWorkflow};

fn temp_out_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tablesmith_{tag}_{}", uuid::Uuid::new_v4()))
}

fn run(options: DriverOptions, out_dir: &PathBuf, seed: u64) -> (MemWorkflow, RunReport) {
    let registry = ProviderRegistry::builtin();
    let mut wf = MemWorkflow::new(options.name.clone(), out_dir.clone(), seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let report = WorkflowDriver::new(options)
        .run(&mut wf, &registry, &mut rng)
        .expect("generation run");
    (wf, report)
}

/// Shortest number of lineage edges from the base to each artifact.
fn depths(wf: &MemWorkflow) -> HashMap<String, usize> {
    let mut depths = HashMap::new();
    depths.insert("a0".to_string(), 0);
    // Edges are recorded in creation order, so one pass suffices.
    for edge in wf.edges() {
        let depth = edge
            .sources
            .iter()
            .filter_map(|source| depths.get(source).copied())
            .min()
            .unwrap_or(usize::MAX);
        if depth != usize::MAX {
            depths.insert(edge.dest.clone(), depth + 1);
        }
    }
    depths
}

#[test]
fn single_version_generates_only_the_base() {
    let out_dir = temp_out_dir("single");
    let options = DriverOptions {
        name: "single".to_string(),
        num_versions: 1,
        base_cols: 6,
        base_rows: 50,
        ..DriverOptions::default()
    };

    let (wf, report) = run(options, &out_dir, 1);

    assert_eq!(report.generated, 1);
    assert!(!report.stopped_early);
    assert_eq!(wf.artifacts().len(), 1);
    assert!(wf.edges().is_empty());

    std::fs::remove_dir_all(&out_dir).ok();
}

#[test]
fn five_versions_of_single_op_edges() {
    let out_dir = temp_out_dir("five");
    let options = DriverOptions {
        name: "five".to_string(),
        num_versions: 5,
        base_cols: 8,
        base_rows: 100,
        matfreq: 1,
        exclude_ops: vec![OpKind::Groupby, OpKind::Pivot, OpKind::Merge],
        ..DriverOptions::default()
    };

    let (wf, report) = run(options, &out_dir, 2);

    assert_eq!(report.generated, 5);
    assert_eq!(wf.artifacts().len(), 5);

    for edge in wf.edges() {
        assert_eq!(edge.ops.len(), 1);
        assert!(matches!(
            edge.ops[0].kind(),
            OpKind::Sample | OpKind::Project
        ));
    }

    // Every artifact is reachable from the base within four edges.
    let depths = depths(&wf);
    for artifact in wf.artifacts() {
        let depth = depths.get(&artifact.label).copied().expect("reachable");
        assert!(depth <= 4, "artifact {} at depth {depth}", artifact.label);
    }

    std::fs::remove_dir_all(&out_dir).ok();
}

#[test]
fn run_stops_early_when_no_operation_is_legal() {
    let out_dir = temp_out_dir("stall");
    // Five rows rule out sample; everything else is excluded, so the base
    // artifact immediately exhausts its options.
    let options = DriverOptions {
        name: "stall".to_string(),
        num_versions: 4,
        base_cols: 6,
        base_rows: 5,
        exclude_ops: vec![
            OpKind::Groupby,
            OpKind::Pivot,
            OpKind::Merge,
            OpKind::Project,
        ],
        ..DriverOptions::default()
    };

    let (wf, report) = run(options, &out_dir, 3);

    assert_eq!(report.generated, 1);
    assert!(report.stopped_early);
    assert!(wf.edges().is_empty());
    // Early stop still persists a usable result.
    assert!(out_dir.join("workflow.json").exists());

    std::fs::remove_dir_all(&out_dir).ok();
}

#[test]
fn fixed_seeds_reproduce_the_run() {
    let out_a = temp_out_dir("det_a");
    let out_b = temp_out_dir("det_b");
    let options = DriverOptions {
        name: "det".to_string(),
        num_versions: 4,
        base_cols: 8,
        base_rows: 60,
        exclude_ops: vec![OpKind::Groupby, OpKind::Pivot, OpKind::Merge],
        ..DriverOptions::default()
    };

    let (wf_a, report_a) = run(options.clone(), &out_a, 42);
    let (wf_b, report_b) = run(options, &out_b, 42);

    assert_eq!(report_a.artifacts, report_b.artifacts);
    assert_eq!(report_a.generated, report_b.generated);
    for (a, b) in wf_a.artifacts().iter().zip(wf_b.artifacts()) {
        assert_eq!(a.label, b.label);
        assert_eq!(a.schema, b.schema);
        assert_eq!(a.table, b.table);
    }

    std::fs::remove_dir_all(&out_a).ok();
    std::fs::remove_dir_all(&out_b).ok();
}

#[test]
fn serialized_state_round_trips() {
    let out_dir = temp_out_dir("serde");
    let options = DriverOptions {
        name: "serde".to_string(),
        num_versions: 3,
        base_cols: 6,
        base_rows: 40,
        exclude_ops: vec![OpKind::Groupby, OpKind::Pivot, OpKind::Merge],
        ..DriverOptions::default()
    };

    let (wf, report) = run(options, &out_dir, 7);

    let manifest: serde_json::Value = serde_json::from_slice(
        &std::fs::read(out_dir.join("workflow.json")).expect("manifest written"),
    )
    .expect("manifest parses");
    assert_eq!(manifest["name"], "serde");
    assert_eq!(
        manifest["artifacts"].as_array().map(Vec::len),
        Some(report.generated)
    );
    assert_eq!(
        manifest["edges"].as_array().map(Vec::len),
        Some(wf.edges().len())
    );

    for artifact in wf.artifacts() {
        let (header, rows) =
            MemArtifact::deserialize(&artifact.filename).expect("artifact reads back");
        let labels: Vec<String> = artifact.table.labels().map(str::to_string).collect();
        assert_eq!(header, labels);
        assert_eq!(rows.len(), artifact.rows());
    }

    std::fs::remove_dir_all(&out_dir).ok();
}
