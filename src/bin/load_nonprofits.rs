//! Load exempt-organization records into Elasticsearch.
//!
//! ```bash
//! # First 100 501(c)(3) rows of a BMF extract
//! load-nonprofits --file data/eo_oh.csv
//!
//! # Every subsection, no limit, with code labels attached
//! load-nonprofits --file data/eo_oh.csv --all --limit 0 --enrich
//!
//! # A directory of per-organization JSON files
//! load-nonprofits --json-dir data/json_output
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use nonprofit_search::codes::NteeCodebook;
use nonprofit_search::config::Config;
use nonprofit_search::ingest::loader::{
    ingest_rows, load_json_dir, organization_mappings, CsvRows, IngestOptions,
};
use nonprofit_search::ingest::normalize::{subsection_is, CHARITABLE_SUBSECTION};
use nonprofit_search::models::RawRow;
use nonprofit_search::search::gateway::SearchGateway;

/// Load nonprofit records into Elasticsearch
#[derive(Parser)]
#[command(name = "load-nonprofits")]
#[command(version)]
struct Cli {
    /// CSV extract to load
    #[arg(long, default_value = "data/eo_oh_1k.csv", conflicts_with = "json_dir")]
    file: PathBuf,

    /// Load every *.json file in this directory instead of a CSV
    #[arg(long)]
    json_dir: Option<PathBuf>,

    /// Max rows to index (0 = no limit)
    #[arg(long, default_value_t = 100)]
    limit: usize,

    /// Index all subsections (default indexes only 501(c)(3))
    #[arg(long)]
    all: bool,

    /// Attach human-readable code labels to each CSV row
    #[arg(long, conflicts_with = "json_dir")]
    enrich: bool,

    /// Target index (defaults to ELASTIC_INDEX)
    #[arg(long)]
    index: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let index = cli.index.clone().unwrap_or_else(|| config.elastic.index.clone());

    let gateway = SearchGateway::connect(&config.elastic).await?;

    match &cli.json_dir {
        Some(dir) => load_json(&gateway, &index, dir).await,
        None => load_csv(&gateway, &index, &cli, &config).await,
    }
}

async fn load_json(gateway: &SearchGateway, index: &str, dir: &Path) -> Result<()> {
    // Won't overwrite an existing index
    gateway.create_index(index, None).await?;

    let documents = load_json_dir(dir)?;
    if documents.is_empty() {
        tracing::info!("No JSON files found to load in {}", dir.display());
        return Ok(());
    }

    gateway
        .bulk_append(index, &documents)
        .await
        .context("Bulk append failed")?;
    Ok(())
}

async fn load_csv(gateway: &SearchGateway, index: &str, cli: &Cli, config: &Config) -> Result<()> {
    gateway
        .create_index(index, Some(&organization_mappings()))
        .await?;

    let ntee = if cli.enrich {
        Some(NteeCodebook::load(&config.ntee_codebook)?)
    } else {
        None
    };

    let options = IngestOptions {
        limit: if cli.limit == 0 { usize::MAX } else { cli.limit },
        enrich_with: ntee.as_ref(),
    };

    let charitable = subsection_is(CHARITABLE_SUBSECTION);
    let keep = |row: &RawRow| cli.all || charitable(row);

    let rows = CsvRows::open(&cli.file)?;
    let added = ingest_rows(gateway, index, rows, keep, &options).await?;

    tracing::info!(
        "Inserted {added} documents into index '{index}' from {}",
        cli.file.display()
    );
    Ok(())
}
