//! Read extract rows from CSV or JSON files and push them into the index.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::io::Read;
use std::path::Path;
use walkdir::WalkDir;

use crate::codes::NteeCodebook;
use crate::ingest::normalize::{enrich, normalize_row};
use crate::models::RawRow;
use crate::search::gateway::SearchGateway;

/// Field mappings for the organization index.
pub fn organization_mappings() -> Value {
    json!({
        "properties": {
            "ein": { "type": "keyword" },
            "name": { "type": "text", "fields": { "raw": { "type": "keyword" } } },
            "city": { "type": "text" },
            "state": { "type": "keyword" },
            "ntee": { "type": "keyword" },
            "subsection": { "type": "keyword" },
            "deductibility": { "type": "keyword" },
            "asset_amt": { "type": "long" },
            "ruling": { "type": "integer" }
        }
    })
}

/// Streaming CSV reader yielding header-keyed rows.
///
/// Cells that are not valid UTF-8 are decoded lossily instead of failing the row.
pub struct CsvRows<R: Read> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    record: csv::ByteRecord,
}

impl<R: Read> CsvRows<R> {
    pub fn new(input: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
        let headers = reader
            .byte_headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();
        Ok(Self {
            reader,
            headers,
            record: csv::ByteRecord::new(),
        })
    }
}

impl CsvRows<std::fs::File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Self::new(file)
    }
}

impl<R: Read> Iterator for CsvRows<R> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_byte_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => Some(Ok(self
                .headers
                .iter()
                .zip(self.record.iter())
                .map(|(h, v)| (h.clone(), String::from_utf8_lossy(v).into_owned()))
                .collect())),
            Err(e) => Some(Err(e).context("Failed to read CSV record")),
        }
    }
}

/// Options for [`ingest_rows`].
pub struct IngestOptions<'a> {
    /// Stop after this many documents have been written
    pub limit: usize,
    /// Attach code labels using this codebook before writing
    pub enrich_with: Option<&'a NteeCodebook>,
}

/// Normalize and write every row accepted by `keep`, up to `options.limit`.
///
/// Rows with an EIN are upserted under it; rows without one are appended.
/// Returns the number of documents written. The first engine error aborts the
/// run with everything before it already indexed.
pub async fn ingest_rows<I, F>(
    gateway: &SearchGateway,
    index: &str,
    rows: I,
    keep: F,
    options: &IngestOptions<'_>,
) -> Result<usize>
where
    I: IntoIterator<Item = Result<RawRow>>,
    F: Fn(&RawRow) -> bool,
{
    let mut added = 0usize;
    if options.limit == 0 {
        return Ok(added);
    }

    for row in rows {
        let row = row?;
        if !keep(&row) {
            continue;
        }

        let (mut record, id) = normalize_row(&row);
        if let Some(ntee) = options.enrich_with {
            enrich(&mut record, ntee);
        }

        match id {
            Some(id) => {
                gateway
                    .upsert_document(index, &id, &record)
                    .await
                    .with_context(|| format!("Failed to index organization {id}"))?;
            }
            None => {
                gateway
                    .append_document(index, &record)
                    .await
                    .context("Failed to append organization without EIN")?;
            }
        }

        added += 1;
        if added >= options.limit {
            break;
        }
    }

    Ok(added)
}

/// Load every `*.json` file directly inside `dir`, in file-name order.
/// Files that fail to parse are skipped with a warning.
pub fn load_json_dir(dir: &Path) -> Result<Vec<Value>> {
    let mut documents = Vec::new();

    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("json")
        {
            continue;
        }

        // Non-UTF-8 content is invalid JSON and takes the skip path below
        let data =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        match serde_json::from_slice::<Value>(&data) {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                tracing::warn!("Skipping {}, invalid JSON: {e}", path.display());
            }
        }
    }

    Ok(documents)
}
