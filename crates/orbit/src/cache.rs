//! Precomputed view cache
//!
//! All six views are computed once over the unfiltered dataset. Queries with
//! no filter borrow those views directly; filtered queries narrow the raw
//! records and run the matching aggregator again.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;

use crate::aggregate::{
  AgeGroupData, Aggregator, CompanySizeData, CountryData, DerivedView, Dimension, IndustryData,
  ToolData, TrendData,
};
use crate::config::UserStatistic;
use crate::filter::RecordFilter;
use crate::record::AdoptionRecord;
use crate::summary::DashboardStats;

pub const DOCUMENT_VERSION: &str = "1.0";

/// The six views computed over one record collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregations {
  pub by_country: Vec<CountryData>,
  pub by_industry: Vec<IndustryData>,
  pub by_tool: Vec<ToolData>,
  pub by_year: Vec<TrendData>,
  pub by_age_group: Vec<AgeGroupData>,
  pub by_company_size: Vec<CompanySizeData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
  #[serde(default)]
  pub total_records: usize,
  #[serde(default, deserialize_with = "deserialize_generated_at")]
  pub generated_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub version: String,
  /// Statistic behind `totalUsers` in the stored views
  ///
  /// Documents without it were produced with the median.
  #[serde(default)]
  pub user_statistic: UserStatistic,
}

/// Accept RFC 3339 timestamps as well as offset-less ones, read as UTC
fn deserialize_generated_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
  D: Deserializer<'de>,
{
  let Some(raw) = Option::<String>::deserialize(deserializer)? else {
    return Ok(None);
  };

  if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
    return Ok(Some(timestamp.with_timezone(&Utc)));
  }

  raw
    .parse::<NaiveDateTime>()
    .map(|naive| Some(naive.and_utc()))
    .map_err(|e| serde::de::Error::custom(format!("invalid generatedAt {raw:?}: {e}")))
}

/// Serialized form of a fully aggregated dataset
///
/// Only the raw records, the views and the year list are required; missing
/// dashboard totals are recomputed on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecomputedDocument {
  pub raw_data: Vec<AdoptionRecord>,
  pub aggregations: Aggregations,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub dashboard_stats: Option<DashboardStats>,
  pub available_years: Vec<i32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metadata: Option<DocumentMetadata>,
}

impl PrecomputedDocument {
  /// Statistic the stored views were computed with
  pub fn user_statistic(&self) -> UserStatistic {
    self.metadata.as_ref().map(|m| m.user_statistic).unwrap_or_default()
  }
}

/// Raw records plus every view over the unfiltered dataset
#[derive(Debug, Clone)]
pub struct PrecomputedData {
  aggregator: Aggregator,
  records: Vec<AdoptionRecord>,
  views: [DerivedView; 6],
  stats: DashboardStats,
  available_years: Vec<i32>,
}

impl PrecomputedData {
  /// Run every aggregator over an already validated collection
  pub fn build(records: Vec<AdoptionRecord>, aggregator: Aggregator) -> Self {
    let views = Dimension::ALL.map(|dimension| aggregator.aggregate(dimension, &records));
    let stats = aggregator.summarize(&records);
    let available_years = distinct_years(&records);

    tracing::info!(
      "Precomputed {} views over {} records ({} years)",
      views.len(),
      records.len(),
      available_years.len()
    );

    Self { aggregator, records, views, stats, available_years }
  }

  /// Adopt a document that already carries its aggregations
  ///
  /// The stored views are reused only when they were computed with the
  /// aggregator's statistic; otherwise every view is rebuilt from the raw
  /// records so filtered and unfiltered queries agree.
  pub fn from_document(document: PrecomputedDocument, aggregator: Aggregator) -> Self {
    let stored = document.user_statistic();
    if stored != aggregator.statistic() {
      tracing::info!(
        "Document views use the {:?} statistic but {:?} is configured, re-aggregating",
        stored,
        aggregator.statistic()
      );
      return Self::build(document.raw_data, aggregator);
    }

    let PrecomputedDocument { raw_data, aggregations, dashboard_stats, available_years, .. } =
      document;

    let views = [
      DerivedView::Country(aggregations.by_country),
      DerivedView::Industry(aggregations.by_industry),
      DerivedView::Tool(aggregations.by_tool),
      DerivedView::Year(aggregations.by_year),
      DerivedView::AgeGroup(aggregations.by_age_group),
      DerivedView::CompanySize(aggregations.by_company_size),
    ];
    let stats = dashboard_stats.unwrap_or_else(|| {
      tracing::debug!("Document has no dashboard totals, computing them");
      aggregator.summarize(&raw_data)
    });

    tracing::info!("Loaded precomputed document with {} records", raw_data.len());

    Self { aggregator, records: raw_data, views, stats, available_years }
  }

  pub fn records(&self) -> &[AdoptionRecord] {
    &self.records
  }

  pub fn aggregator(&self) -> &Aggregator {
    &self.aggregator
  }

  /// Distinct years across the dataset, ascending
  pub fn available_years(&self) -> &[i32] {
    &self.available_years
  }

  /// The view for `dimension`, recomputed only when the filter narrows the data
  pub fn view(&self, dimension: Dimension, filter: &RecordFilter) -> Cow<'_, DerivedView> {
    if filter.is_empty() {
      return Cow::Borrowed(self.precomputed(dimension));
    }

    let subset = filter.apply(&self.records);
    tracing::debug!("Recomputing {} view over {} filtered records", dimension, subset.len());
    Cow::Owned(self.aggregator.aggregate(dimension, subset))
  }

  /// Dashboard totals for the filtered subset
  pub fn summary(&self, filter: &RecordFilter) -> Cow<'_, DashboardStats> {
    if filter.is_empty() {
      return Cow::Borrowed(&self.stats);
    }

    Cow::Owned(self.aggregator.summarize(filter.apply(&self.records)))
  }

  fn precomputed(&self, dimension: Dimension) -> &DerivedView {
    // Same order as Dimension::ALL
    let index = match dimension {
      Dimension::Country => 0,
      Dimension::Industry => 1,
      Dimension::Tool => 2,
      Dimension::Year => 3,
      Dimension::AgeGroup => 4,
      Dimension::CompanySize => 5,
    };
    &self.views[index]
  }

  /// Serializable snapshot of the dataset and its unfiltered views
  pub fn to_document(&self) -> PrecomputedDocument {
    let mut aggregations = Aggregations::default();
    for view in &self.views {
      match view.clone() {
        DerivedView::Country(rows) => aggregations.by_country = rows,
        DerivedView::Industry(rows) => aggregations.by_industry = rows,
        DerivedView::Tool(rows) => aggregations.by_tool = rows,
        DerivedView::Year(rows) => aggregations.by_year = rows,
        DerivedView::AgeGroup(rows) => aggregations.by_age_group = rows,
        DerivedView::CompanySize(rows) => aggregations.by_company_size = rows,
      }
    }

    PrecomputedDocument {
      raw_data: self.records.clone(),
      aggregations,
      dashboard_stats: Some(self.stats.clone()),
      available_years: self.available_years.clone(),
      metadata: Some(DocumentMetadata {
        total_records: self.records.len(),
        generated_at: Some(Utc::now()),
        version: DOCUMENT_VERSION.to_string(),
        user_statistic: self.aggregator.statistic(),
      }),
    }
  }
}

fn distinct_years(records: &[AdoptionRecord]) -> Vec<i32> {
  let mut years: Vec<i32> = records.iter().map(|r| r.year).collect();
  years.sort_unstable();
  years.dedup();
  years
}
