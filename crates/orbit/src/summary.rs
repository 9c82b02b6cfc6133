//! Top-line dashboard totals

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::aggregate::Aggregator;
use crate::record::AdoptionRecord;
use crate::reduce::{mean_adoption, sum_users};

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  /// Platform-wide sum, independent of the grouped user statistic
  pub total_users: u64,
  pub average_adoption: f64,
  pub total_countries: usize,
  pub total_industries: usize,
  pub top_tool: String,
  pub top_country: String,
}

impl Aggregator {
  /// Composite summary of a record collection
  ///
  /// An empty collection yields zero totals and `"N/A"` leaders instead of NaN.
  pub fn summarize<'a, I>(&self, records: I) -> DashboardStats
  where
    I: IntoIterator<Item = &'a AdoptionRecord>,
  {
    let records: Vec<&AdoptionRecord> = records.into_iter().collect();

    let countries: HashSet<&str> = records.iter().map(|r| r.country.as_str()).collect();
    let industries: HashSet<&str> = records.iter().map(|r| r.industry.as_str()).collect();

    let top_tool = self
      .by_tool(records.iter().copied())
      .into_iter()
      .next()
      .map(|row| row.tool)
      .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    // First row wins ties, matching a stable descending sort
    let top_country = self
      .by_country(records.iter().copied())
      .into_iter()
      .reduce(|best, row| if row.total_users > best.total_users { row } else { best })
      .map(|row| row.country)
      .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    DashboardStats {
      total_users: sum_users(records.iter().copied()),
      average_adoption: mean_adoption(records.iter().copied()),
      total_countries: countries.len(),
      total_industries: industries.len(),
      top_tool,
      top_country,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{OrbitConfig, UserStatistic};

  fn record(country: &str, industry: &str, tool: &str, users: u64, rate: f64) -> AdoptionRecord {
    AdoptionRecord {
      country: country.to_string(),
      industry: industry.to_string(),
      ai_tool: tool.to_string(),
      adoption_rate: rate,
      daily_active_users: users,
      year: 2024,
      user_feedback: String::new(),
      age_group: "35-44".to_string(),
      company_size: "Enterprise".to_string(),
    }
  }

  #[test]
  fn test_summarize_empty() {
    let records: Vec<AdoptionRecord> = Vec::new();
    let stats = Aggregator::default().summarize(&records);

    assert_eq!(stats.total_users, 0);
    assert_eq!(stats.average_adoption, 0.0);
    assert!(!stats.average_adoption.is_nan());
    assert_eq!(stats.total_countries, 0);
    assert_eq!(stats.total_industries, 0);
    assert_eq!(stats.top_tool, "N/A");
    assert_eq!(stats.top_country, "N/A");
  }

  #[test]
  fn test_summarize_totals_are_plain_sums() {
    let records = vec![
      record("USA", "Finance", "ChatGPT", 100, 50.0),
      record("USA", "Retail", "Claude", 300, 70.0),
      record("UK", "Finance", "Claude", 50, 30.0),
    ];
    let stats = Aggregator::default().summarize(&records);

    assert_eq!(stats.total_users, 450);
    assert_eq!(stats.average_adoption, 50.0);
    assert_eq!(stats.total_countries, 2);
    assert_eq!(stats.total_industries, 2);
    // Median per tool: Claude 175, ChatGPT 100
    assert_eq!(stats.top_tool, "Claude");
    // Median per country: USA 200, UK 50
    assert_eq!(stats.top_country, "USA");
  }

  #[test]
  fn test_top_country_follows_statistic() {
    let records = vec![
      record("USA", "Finance", "ChatGPT", 10, 50.0),
      record("USA", "Finance", "ChatGPT", 10, 50.0),
      record("USA", "Finance", "ChatGPT", 10, 50.0),
      record("UK", "Finance", "ChatGPT", 25, 50.0),
    ];

    let median = Aggregator::default().summarize(&records);
    assert_eq!(median.top_country, "UK");

    let sum = Aggregator::new(OrbitConfig::with_statistic(UserStatistic::Sum)).summarize(&records);
    assert_eq!(sum.top_country, "USA");
  }
}
