use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tablesmith_core::{OpKind, ProviderRegistry};
use tablesmith_generate::{DriverOptions, GenerationError, WorkflowDriver};
use tablesmith_mem::MemWorkflow;

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tablesmith", version, about = "Synthetic table-workflow generator")]
struct Cli {
    /// Workflow name.
    #[arg(long, default_value = "wf")]
    name: String,
    /// Target artifact count, including the base artifact.
    #[arg(long, default_value_t = 10)]
    num_versions: usize,
    /// Columns of the base artifact.
    #[arg(long, default_value_t = 10)]
    cols: usize,
    /// Rows of the base artifact.
    #[arg(long, default_value_t = 1000)]
    rows: usize,
    /// Output directory for artifacts and the workflow manifest.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,
    /// Branching factor for source selection.
    #[arg(long, default_value_t = 1.0)]
    bfactor: f64,
    /// Operations chained per materialization.
    #[arg(long, default_value_t = 1)]
    matfreq: usize,
    /// Operation kinds to exclude (repeatable). Defaults to the kinds the
    /// in-memory backend cannot execute; pass `none` to clear.
    #[arg(long, value_name = "OP")]
    exclude: Vec<String>,
    /// RNG seed; a random seed is drawn when absent.
    #[arg(long)]
    seed: Option<u64>,
    /// Log filter, e.g. `info` or `tablesmith_generate=debug`.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_excludes(raw: &[String]) -> Result<Vec<OpKind>, CliError> {
    if raw.is_empty() {
        // The in-memory backend only executes sample and project.
        return Ok(vec![OpKind::Groupby, OpKind::Pivot, OpKind::Merge]);
    }
    if raw.len() == 1 && raw[0] == "none" {
        return Ok(Vec::new());
    }
    raw.iter()
        .map(|value| value.parse::<OpKind>().map_err(CliError::InvalidConfig))
        .collect()
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .map_err(|err| CliError::InvalidConfig(err.to_string()))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let exclude_ops = parse_excludes(&cli.exclude)?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, "starting workflow generation");

    let options = DriverOptions {
        name: cli.name.clone(),
        num_versions: cli.num_versions,
        base_cols: cli.cols,
        base_rows: cli.rows,
        bfactor: cli.bfactor,
        matfreq: cli.matfreq,
        exclude_ops,
    };

    let registry = ProviderRegistry::builtin();
    let mut wf = MemWorkflow::new(cli.name, cli.out_dir.clone(), seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let report = WorkflowDriver::new(options).run(&mut wf, &registry, &mut rng)?;

    std::fs::create_dir_all(&cli.out_dir)?;
    std::fs::write(
        cli.out_dir.join("run_report.json"),
        serde_json::to_vec_pretty(&report)?,
    )?;

    println!(
        "workflow '{}': {}/{} artifacts in {}{}",
        report.name,
        report.generated,
        report.requested,
        cli.out_dir.display(),
        if report.stopped_early {
            " (stopped early)"
        } else {
            ""
        }
    );
    Ok(())
}
