use anyhow::{Context, Result};
use clap::Parser;
use rainforge_core::{pipeline::AnalysisBuilder, resolver::archive::HistoricalArchiveSource};
use std::{fs, path::PathBuf, sync::Arc, time::Duration};
use tracing::info;

mod archive;
mod config;
mod logging;
mod plotting;
mod request;
mod workflow;

/// Rooftop rainwater harvesting analysis for a single site.
#[derive(Parser, Debug)]
#[command(name = "rainforge", version, about)]
struct Args {
    /// Request file (YAML, or JSON when the extension is .json)
    #[arg(short, long, default_value = "rainforge-app/request.yaml")]
    request: PathBuf,

    /// Directory holding knowledge-base overrides; missing files fall back to the built-in tables
    #[arg(long)]
    knowledge_base: Option<PathBuf>,

    /// Output directory (default: ./data/runs/rainforge_<timestamp>)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Historical daily-precipitation archive (JSON) used as the live climate source
    #[arg(long)]
    archive: Option<PathBuf>,

    /// Per-source timeout in milliseconds
    #[arg(long, default_value_t = 3000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();
    info!("--- Rainforge ---");

    let request = request::load(&args.request)?;
    let kb = config::load_knowledge_base(args.knowledge_base.as_deref())?;

    let mut builder = AnalysisBuilder::new()
        .with_knowledge_base(Arc::new(kb))
        .with_source_timeout(Duration::from_millis(args.timeout_ms));
    if let Some(path) = &args.archive {
        info!(archive = %path.display(), "Using historical archive as live climate source");
        builder = builder.with_climate_source(Arc::new(HistoricalArchiveSource::new(
            archive::FileArchiveFetcher::new(path),
        )));
    }
    let engine = builder.build().context("Failed to build analysis engine")?;

    let output_dir = args.output_dir.unwrap_or_else(|| {
        PathBuf::from(format!(
            "./data/runs/rainforge_{}",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        ))
    });
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    // Keep the request next to its results for traceability.
    let file_name = args
        .request
        .file_name()
        .map_or_else(|| "request.yaml".into(), |n| n.to_os_string());
    fs::copy(&args.request, output_dir.join(file_name))
        .with_context(|| format!("Failed to copy {:?} into the output directory", args.request))?;

    workflow::run(&engine, &request, &output_dir).await?;

    println!("\nAnalysis complete. Results are in '{}'", output_dir.display());
    Ok(())
}
