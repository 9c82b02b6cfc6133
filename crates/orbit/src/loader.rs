//! Dataset ingestion
//!
//! Two input shapes are accepted: the raw CSV export, which is aggregated
//! after load, and the precomputed JSON document, which already carries its
//! views. Either way, records missing a country or industry are dropped.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::aggregate::Aggregator;
use crate::cache::{PrecomputedData, PrecomputedDocument};
use crate::record::{deserialize_user_count, retain_valid, AdoptionRecord};
use crate::{OrbitError, Result};

/// Where a dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
  Csv(PathBuf),
  Document(PathBuf),
}

impl DataSource {
  /// Pick the input format from the file extension
  pub fn from_path(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    let is_json = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(|ext| ext.eq_ignore_ascii_case("json"))
      .unwrap_or(false);

    if is_json {
      DataSource::Document(path)
    } else {
      DataSource::Csv(path)
    }
  }

  pub fn path(&self) -> &Path {
    match self {
      DataSource::Csv(path) | DataSource::Document(path) => path,
    }
  }
}

/// CSV row before validation; empty cells become empty strings
#[derive(Debug, Deserialize)]
struct CsvRow {
  #[serde(default)]
  country: String,
  #[serde(default)]
  industry: String,
  #[serde(default)]
  ai_tool: String,
  adoption_rate: f64,
  #[serde(deserialize_with = "deserialize_user_count")]
  daily_active_users: u64,
  year: i32,
  #[serde(default)]
  user_feedback: String,
  #[serde(default)]
  age_group: String,
  #[serde(default)]
  company_size: String,
}

impl From<CsvRow> for AdoptionRecord {
  fn from(row: CsvRow) -> Self {
    AdoptionRecord {
      country: row.country,
      industry: row.industry,
      ai_tool: row.ai_tool,
      adoption_rate: row.adoption_rate,
      daily_active_users: row.daily_active_users,
      year: row.year,
      user_feedback: row.user_feedback,
      age_group: row.age_group,
      company_size: row.company_size,
    }
  }
}

/// Parse CSV content into validated records
///
/// Rows whose numeric cells do not parse are skipped with a warning; a
/// missing or unreadable header fails the whole load.
pub fn parse_csv(content: &str) -> Result<Vec<AdoptionRecord>> {
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .trim(csv::Trim::All)
    .from_reader(content.as_bytes());

  // Surface header problems before iterating rows
  reader.headers()?;

  let mut records = Vec::new();
  let mut skipped = 0usize;

  for (line_number, result) in reader.deserialize::<CsvRow>().enumerate() {
    match result {
      Ok(row) => records.push(AdoptionRecord::from(row)),
      Err(e) => {
        skipped += 1;
        // +2 for 1-based lines and the header row
        tracing::warn!("Skipping malformed row {} in CSV: {}", line_number + 2, e);
      }
    }
  }

  if skipped > 0 {
    tracing::info!("CSV parsing complete: {} rows parsed, {} rows skipped", records.len(), skipped);
  }

  Ok(retain_valid(records))
}

/// Parse a precomputed document, dropping invalid raw records
pub fn parse_document(content: &str) -> Result<PrecomputedDocument> {
  let mut document: PrecomputedDocument = serde_json::from_str(content)?;
  document.raw_data = retain_valid(document.raw_data);
  Ok(document)
}

async fn read(path: &Path) -> Result<String> {
  tokio::fs::read_to_string(path).await.map_err(|e| OrbitError::io(path, e))
}

/// Read and aggregate a dataset
pub async fn load(source: &DataSource, aggregator: Aggregator) -> Result<PrecomputedData> {
  let content = read(source.path()).await?;

  let data = match source {
    DataSource::Csv(_) => PrecomputedData::build(parse_csv(&content)?, aggregator),
    DataSource::Document(_) => PrecomputedData::from_document(parse_document(&content)?, aggregator),
  };

  tracing::info!("Loaded {} records from {}", data.records().len(), source.path().display());
  Ok(data)
}

/// Write the precomputed document for `data` as pretty JSON
pub async fn write_document(data: &PrecomputedData, path: &Path) -> Result<PrecomputedDocument> {
  let document = data.to_document();
  let content = serde_json::to_string_pretty(&document)?;
  tokio::fs::write(path, content).await.map_err(|e| OrbitError::io(path, e))?;
  Ok(document)
}
