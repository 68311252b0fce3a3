use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use polars::prelude::{AnyValue, DataFrame, PolarsResult};
use roadtrip_core::{
    db,
    pipelines::{all_stage_descriptors, downstream_stages},
    report, Checkpoint, PipelineConfig, SpeedPairing, TripPipeline, TripSummary,
};
use roadtrip_parser::read_checkpoint_table;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Road trip statistics from recorded checkpoints", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute miles per gallon on the fastest segment
    Run(RunArgs),
    /// Print the per-segment report
    Segments(SourceArgs),
    /// List the pipeline stages and their dependencies
    Stages,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["csv", "sqlite"])))]
struct SourceArgs {
    /// Checkpoint table exported as CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Read checkpoints from the SQLite database at DATABASE_URL
    #[arg(long)]
    sqlite: bool,

    /// Table to read with --sqlite (overrides the config file)
    #[arg(long, conflicts_with = "csv")]
    table: Option<String>,

    /// Pipeline configuration (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pair every segment with a speed instead of dropping the last one
    #[arg(long)]
    corrected_speeds: bool,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Print the full trip summary as JSON
    #[arg(long)]
    json: bool,

    /// Also write the segment report as Parquet
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let summary = run_pipeline(&args.source).await?;

            if let Some(path) = &args.report {
                let mut df = summary.segment_report()?;
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                report::write_parquet(&mut df, file)?;
                info!(path = %path.display(), rows = df.height(), "segment report written");
            }

            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Fastest segment: {} ({:.2} mph)",
                    summary.fastest_segment, summary.speeds_mph[summary.fastest_segment]
                );
                println!("Miles per gallon: {:.2}", summary.miles_per_gallon);
            }
            Ok(())
        }
        Command::Segments(source) => {
            let summary = run_pipeline(&source).await?;
            let df = summary.segment_report()?;
            println!("{}", segment_table(&df)?);
            Ok(())
        }
        Command::Stages => {
            println!("{}", stage_table());
            Ok(())
        }
    }
}

async fn run_pipeline(source: &SourceArgs) -> Result<TripSummary> {
    let config = load_config(source)?;
    let checkpoints: Arc<[Checkpoint]> = load_checkpoints(source, &config).await?.into();
    let pipeline = TripPipeline::new(config);

    match pipeline.run_concurrent(checkpoints).await {
        Ok(summary) => Ok(summary),
        Err(err) => {
            if let Some(stage) = err.stage() {
                let skipped: Vec<&str> = downstream_stages(stage)
                    .iter()
                    .map(|s| s.code_identifier())
                    .collect();
                warn!(stage = stage.code_identifier(), ?skipped, "pipeline stage failed");
            }
            Err(err).context("trip pipeline failed")
        }
    }
}

fn load_config(source: &SourceArgs) -> Result<PipelineConfig> {
    let mut config = match &source.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if source.corrected_speeds {
        config.speed_pairing = SpeedPairing::Corrected;
    }
    Ok(config)
}

async fn load_checkpoints(source: &SourceArgs, config: &PipelineConfig) -> Result<Vec<Checkpoint>> {
    match (&source.csv, source.sqlite) {
        (Some(path), false) => {
            let checkpoints =
                read_checkpoint_table(path, &config.layout, &config.input.table_options())
                    .with_context(|| format!("failed to load {}", path.display()))?;
            info!(path = %path.display(), rows = checkpoints.len(), "loaded checkpoints");
            Ok(checkpoints)
        }
        (None, true) => {
            let pool = connect_pool().await?;
            let table = source.table.as_deref().unwrap_or(&config.input.table);
            Ok(db::load_checkpoints(&pool, table, &config.layout).await?)
        }
        _ => bail!("pass exactly one of --csv <FILE> or --sqlite"),
    }
}

async fn connect_pool() -> Result<db::DbPool> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("ROADTRIP_DATABASE_URL"))
        .context("DATABASE_URL (or ROADTRIP_DATABASE_URL) must be set")?;
    Ok(db::connect(&database_url).await?)
}

fn segment_table(df: &DataFrame) -> PolarsResult<Table> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>(),
    );

    for row in 0..df.height() {
        let cells = df
            .get_columns()
            .iter()
            .map(|column| column.get(row).map(format_cell))
            .collect::<PolarsResult<Vec<_>>>()?;
        table.add_row(cells);
    }
    Ok(table)
}

fn format_cell(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => "-".to_string(),
        AnyValue::Float64(v) => format!("{v:.2}"),
        other => other.to_string(),
    }
}

fn stage_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["stage", "depends on", "description"]);
    for descriptor in all_stage_descriptors() {
        let depends_on = descriptor
            .depends_on
            .iter()
            .map(|s| s.code_identifier())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            descriptor.stage.code_identifier(),
            depends_on.as_str(),
            descriptor.description,
        ]);
    }
    table
}
