use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use narrative_web::{EngineConfig, NarrativeEngine, TableCache, TopicCatalog};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "precomputed/timeseries/df_nodes.json")]
    nodes: PathBuf,

    #[arg(long, default_value = "precomputed/timeseries/df_edges.json")]
    edges: PathBuf,

    /// Period label (e.g. 2024Q1) or raw period key; defaults to the latest period.
    #[arg(long, conflicts_with_all = ["index", "all"])]
    period: Option<String>,

    /// Zero-based period index, clamped to the available range.
    #[arg(long, conflicts_with = "all")]
    index: Option<usize>,

    /// Emit every period's payload under `periods`.
    #[arg(long)]
    all: bool,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    topics: Option<PathBuf>,

    /// Fuzzy theme query; matching node indices are listed under `highlighted`.
    #[arg(long)]
    search: Option<String>,

    #[arg(long)]
    list_periods: bool,

    #[arg(long)]
    pretty: bool,

    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("narrative_web=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    let catalog = match &args.topics {
        Some(path) => TopicCatalog::from_path(path)?,
        None => TopicCatalog::default(),
    };

    let dataset = TableCache::global().load(&args.nodes, &args.edges)?;

    let engine = NarrativeEngine::new(dataset, catalog, config);
    let mut periods = engine.periods();

    if args.list_periods {
        for (index, period) in periods.periods().iter().enumerate() {
            println!("{index}\t{}\t{}", period.label, period.key);
        }
        return Ok(());
    }

    let rendered = if args.all {
        let payloads = engine.prepare_all();
        engine.batch_report(&payloads).to_json(args.pretty)?
    } else {
        if let Some(selector) = &args.period {
            let position = periods
                .position_of(selector)
                .ok_or_else(|| anyhow!("unknown period {selector}; available: {}", periods.labels().join(", ")))?;
            periods.select(position);
        } else if let Some(index) = args.index {
            periods.select(index);
        }

        let period = periods
            .current()
            .ok_or_else(|| anyhow!("node table has no periods"))?;
        let payload = match &args.search {
            Some(query) => engine.prepare_with_search(period, query),
            None => engine.prepare(period),
        };
        info!("{}", payload.headline());
        engine.report(&payload).to_json(args.pretty)?
    };

    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write payload to {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{rendered}").context("failed to write payload to stdout")?;
        }
    }

    Ok(())
}
