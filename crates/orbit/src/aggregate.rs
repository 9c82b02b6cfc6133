//! Per-dimension aggregators
//!
//! Each aggregator groups records by one key, reduces every group with the
//! configured user statistic and the mean adoption rate, and orders the rows
//! the way the dashboard presents them.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::config::{OrbitConfig, UserStatistic};
use crate::record::AdoptionRecord;
use crate::reduce::group_by;
use crate::OrbitError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryData {
  pub country: String,
  pub total_users: f64,
  pub average_adoption: f64,
  pub count: usize,
  pub lat: f64,
  pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryData {
  pub industry: String,
  pub total_users: f64,
  pub average_adoption: f64,
  pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolData {
  pub tool: String,
  pub total_users: f64,
  pub average_adoption: f64,
  pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendData {
  pub year: i32,
  pub average_adoption: f64,
  pub total_users: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGroupData {
  pub age_group: String,
  pub total_users: f64,
  pub average_adoption: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySizeData {
  pub size: String,
  pub total_users: f64,
  pub average_adoption: f64,
}

/// One of the six grouping axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
  Country,
  Industry,
  Tool,
  Year,
  AgeGroup,
  CompanySize,
}

impl Dimension {
  pub const ALL: [Dimension; 6] = [
    Dimension::Country,
    Dimension::Industry,
    Dimension::Tool,
    Dimension::Year,
    Dimension::AgeGroup,
    Dimension::CompanySize,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Dimension::Country => "country",
      Dimension::Industry => "industry",
      Dimension::Tool => "tool",
      Dimension::Year => "year",
      Dimension::AgeGroup => "age-group",
      Dimension::CompanySize => "company-size",
    }
  }
}

impl fmt::Display for Dimension {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Dimension {
  type Err = OrbitError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized = s.trim().to_lowercase().replace('_', "-");
    Dimension::ALL
      .iter()
      .find(|d| d.as_str() == normalized)
      .copied()
      .ok_or_else(|| OrbitError::invalid_dimension(s))
  }
}

/// The rows of one dimension's aggregation
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedView {
  Country(Vec<CountryData>),
  Industry(Vec<IndustryData>),
  Tool(Vec<ToolData>),
  Year(Vec<TrendData>),
  AgeGroup(Vec<AgeGroupData>),
  CompanySize(Vec<CompanySizeData>),
}

impl DerivedView {
  pub fn dimension(&self) -> Dimension {
    match self {
      DerivedView::Country(_) => Dimension::Country,
      DerivedView::Industry(_) => Dimension::Industry,
      DerivedView::Tool(_) => Dimension::Tool,
      DerivedView::Year(_) => Dimension::Year,
      DerivedView::AgeGroup(_) => Dimension::AgeGroup,
      DerivedView::CompanySize(_) => Dimension::CompanySize,
    }
  }

  pub fn len(&self) -> usize {
    match self {
      DerivedView::Country(rows) => rows.len(),
      DerivedView::Industry(rows) => rows.len(),
      DerivedView::Tool(rows) => rows.len(),
      DerivedView::Year(rows) => rows.len(),
      DerivedView::AgeGroup(rows) => rows.len(),
      DerivedView::CompanySize(rows) => rows.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Rows as JSON values, in view order
  pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
    match self {
      DerivedView::Country(rows) => serde_json::to_value(rows),
      DerivedView::Industry(rows) => serde_json::to_value(rows),
      DerivedView::Tool(rows) => serde_json::to_value(rows),
      DerivedView::Year(rows) => serde_json::to_value(rows),
      DerivedView::AgeGroup(rows) => serde_json::to_value(rows),
      DerivedView::CompanySize(rows) => serde_json::to_value(rows),
    }
  }
}

/// Runs the per-dimension aggregations with an injected configuration
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
  config: OrbitConfig,
}

impl Aggregator {
  pub fn new(config: OrbitConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &OrbitConfig {
    &self.config
  }

  pub fn statistic(&self) -> UserStatistic {
    self.config.user_statistic
  }

  /// Aggregate along any dimension
  pub fn aggregate<'a, I>(&self, dimension: Dimension, records: I) -> DerivedView
  where
    I: IntoIterator<Item = &'a AdoptionRecord>,
  {
    match dimension {
      Dimension::Country => DerivedView::Country(self.by_country(records)),
      Dimension::Industry => DerivedView::Industry(self.by_industry(records)),
      Dimension::Tool => DerivedView::Tool(self.by_tool(records)),
      Dimension::Year => DerivedView::Year(self.by_year(records)),
      Dimension::AgeGroup => DerivedView::AgeGroup(self.by_age_group(records)),
      Dimension::CompanySize => DerivedView::CompanySize(self.by_company_size(records)),
    }
  }

  /// Rows come back in country-name order; callers rank them if needed
  pub fn by_country<'a, I>(&self, records: I) -> Vec<CountryData>
  where
    I: IntoIterator<Item = &'a AdoptionRecord>,
  {
    let statistic = self.statistic();

    group_by(records, |r| r.country.clone())
      .into_iter()
      .map(|(country, group)| {
        let position = self.config.coordinates_for(&country);
        CountryData {
          total_users: group.total_users(statistic),
          average_adoption: group.mean_adoption(),
          count: group.count,
          lat: position.lat,
          lng: position.lng,
          country,
        }
      })
      .collect()
  }

  pub fn by_industry<'a, I>(&self, records: I) -> Vec<IndustryData>
  where
    I: IntoIterator<Item = &'a AdoptionRecord>,
  {
    let statistic = self.statistic();

    let mut rows: Vec<IndustryData> = group_by(records, |r| r.industry.clone())
      .into_iter()
      .map(|(industry, group)| IndustryData {
        industry,
        total_users: group.total_users(statistic),
        average_adoption: group.mean_adoption(),
        count: group.count,
      })
      .collect();

    rows.sort_by(|a, b| descending(a.total_users, b.total_users));
    rows
  }

  pub fn by_tool<'a, I>(&self, records: I) -> Vec<ToolData>
  where
    I: IntoIterator<Item = &'a AdoptionRecord>,
  {
    let statistic = self.statistic();

    let mut rows: Vec<ToolData> = group_by(records, |r| r.ai_tool.clone())
      .into_iter()
      .map(|(tool, group)| ToolData {
        tool,
        total_users: group.total_users(statistic),
        average_adoption: group.mean_adoption(),
        count: group.count,
      })
      .collect();

    rows.sort_by(|a, b| descending(a.total_users, b.total_users));
    rows
  }

  /// Rows come back in ascending year order
  pub fn by_year<'a, I>(&self, records: I) -> Vec<TrendData>
  where
    I: IntoIterator<Item = &'a AdoptionRecord>,
  {
    let statistic = self.statistic();

    group_by(records, |r| r.year)
      .into_iter()
      .map(|(year, group)| TrendData {
        year,
        average_adoption: group.mean_adoption(),
        total_users: group.total_users(statistic),
      })
      .collect()
  }

  /// Rows follow the canonical age order; unknown labels rank -1 and come first
  pub fn by_age_group<'a, I>(&self, records: I) -> Vec<AgeGroupData>
  where
    I: IntoIterator<Item = &'a AdoptionRecord>,
  {
    let statistic = self.statistic();

    let mut rows: Vec<AgeGroupData> = group_by(records, |r| r.age_group.clone())
      .into_iter()
      .map(|(age_group, group)| AgeGroupData {
        age_group,
        total_users: group.total_users(statistic),
        average_adoption: group.mean_adoption(),
      })
      .collect();

    rows.sort_by_key(|row| self.config.age_rank(&row.age_group));
    rows
  }

  /// Rows follow the canonical size order; unknown labels rank -1 and come first
  pub fn by_company_size<'a, I>(&self, records: I) -> Vec<CompanySizeData>
  where
    I: IntoIterator<Item = &'a AdoptionRecord>,
  {
    let statistic = self.statistic();

    let mut rows: Vec<CompanySizeData> = group_by(records, |r| r.company_size.clone())
      .into_iter()
      .map(|(size, group)| CompanySizeData {
        size,
        total_users: group.total_users(statistic),
        average_adoption: group.mean_adoption(),
      })
      .collect();

    rows.sort_by_key(|row| self.config.size_rank(&row.size));
    rows
  }
}

// Stable, so equal totals keep their key order
fn descending(a: f64, b: f64) -> Ordering {
  b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
