use serde::{Deserialize, Serialize};

use crate::record::AdoptionRecord;

/// Year and country selection applied before aggregation
///
/// Unset fields match everything; set fields are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
  #[serde(default)]
  pub year: Option<i32>,
  #[serde(default)]
  pub country: Option<String>,
}

impl RecordFilter {
  pub fn new(year: Option<i32>, country: Option<String>) -> Self {
    Self { year, country }
  }

  pub fn year(year: i32) -> Self {
    Self { year: Some(year), country: None }
  }

  pub fn country(country: impl Into<String>) -> Self {
    Self { year: None, country: Some(country.into()) }
  }

  pub fn is_empty(&self) -> bool {
    self.year.is_none() && self.country.is_none()
  }

  pub fn matches(&self, record: &AdoptionRecord) -> bool {
    self.year.map_or(true, |year| record.year == year)
      && self.country.as_deref().map_or(true, |country| record.country == country)
  }

  /// Narrow `records` to the matching subset without touching the source
  pub fn apply<'a>(&self, records: &'a [AdoptionRecord]) -> Vec<&'a AdoptionRecord> {
    records.iter().filter(|r| self.matches(r)).collect()
  }
}
