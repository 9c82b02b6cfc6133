//! Grouping and statistical reducers
//!
//! Every aggregator groups records through [`group_by`] and then reduces each
//! group with [`GroupAggregate::mean_adoption`] and
//! [`GroupAggregate::total_users`].

use std::collections::BTreeMap;

use crate::config::UserStatistic;
use crate::record::AdoptionRecord;

/// Per-key accumulator built during a single aggregation call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupAggregate {
  /// Every `daily_active_users` value seen for the key, kept for order statistics
  pub users: Vec<u64>,
  pub adoption_sum: f64,
  pub count: usize,
}

impl GroupAggregate {
  pub fn add(&mut self, record: &AdoptionRecord) {
    self.users.push(record.daily_active_users);
    self.adoption_sum += record.adoption_rate;
    self.count += 1;
  }

  /// Arithmetic mean of the adoption rates in this group
  pub fn mean_adoption(&self) -> f64 {
    if self.count == 0 {
      return 0.0;
    }
    self.adoption_sum / self.count as f64
  }

  /// Users figure for this group under the given statistic
  pub fn total_users(&self, statistic: UserStatistic) -> f64 {
    match statistic {
      UserStatistic::Sum => self.users.iter().sum::<u64>() as f64,
      UserStatistic::Median => median(&self.users),
    }
  }
}

/// Group records by `key`
///
/// Groups only exist for keys at least one record mapped to, so every
/// returned aggregate has `count >= 1`. Keys come back in `Ord` order.
pub fn group_by<'a, K, I, F>(records: I, key: F) -> BTreeMap<K, GroupAggregate>
where
  K: Ord,
  I: IntoIterator<Item = &'a AdoptionRecord>,
  F: Fn(&AdoptionRecord) -> K,
{
  let mut groups: BTreeMap<K, GroupAggregate> = BTreeMap::new();

  for record in records {
    groups.entry(key(record)).or_default().add(record);
  }

  groups
}

/// Median of the values, 0.0 for an empty slice
pub fn median(values: &[u64]) -> f64 {
  if values.is_empty() {
    return 0.0;
  }

  let mut sorted = values.to_vec();
  sorted.sort_unstable();

  let mid = sorted.len() / 2;
  if sorted.len() % 2 == 0 {
    (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
  } else {
    sorted[mid] as f64
  }
}

/// Plain sum of daily active users across the records
pub fn sum_users<'a, I>(records: I) -> u64
where
  I: IntoIterator<Item = &'a AdoptionRecord>,
{
  records.into_iter().map(|r| r.daily_active_users).sum()
}

/// Mean adoption rate across the records, 0.0 when there are none
pub fn mean_adoption<'a, I>(records: I) -> f64
where
  I: IntoIterator<Item = &'a AdoptionRecord>,
{
  let (sum, count) =
    records.into_iter().fold((0.0, 0usize), |(sum, count), r| (sum + r.adoption_rate, count + 1));

  if count == 0 {
    0.0
  } else {
    sum / count as f64
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(country: &str, users: u64, rate: f64) -> AdoptionRecord {
    AdoptionRecord {
      country: country.to_string(),
      industry: "Finance".to_string(),
      ai_tool: "Claude".to_string(),
      adoption_rate: rate,
      daily_active_users: users,
      year: 2024,
      user_feedback: String::new(),
      age_group: "25-34".to_string(),
      company_size: "SME".to_string(),
    }
  }

  #[test]
  fn test_median() {
    assert_eq!(median(&[]), 0.0);
    assert_eq!(median(&[7]), 7.0);
    assert_eq!(median(&[300, 100]), 200.0);
    assert_eq!(median(&[5, 1, 3]), 3.0);
    assert_eq!(median(&[1, 2, 4, 100]), 3.0);
    assert_eq!(median(&[1, 2]), 1.5);
  }

  #[test]
  fn test_group_by_counts_and_sums() {
    let records =
      vec![record("USA", 100, 50.0), record("UK", 50, 20.0), record("USA", 300, 70.0)];
    let groups = group_by(&records, |r| r.country.clone());

    assert_eq!(groups.len(), 2);
    let usa = &groups["USA"];
    assert_eq!(usa.count, 2);
    assert_eq!(usa.users, vec![100, 300]);
    assert_eq!(usa.mean_adoption(), 60.0);
    assert_eq!(usa.total_users(UserStatistic::Sum), 400.0);
    assert_eq!(usa.total_users(UserStatistic::Median), 200.0);

    let keys: Vec<&String> = groups.keys().collect();
    assert_eq!(keys, vec!["UK", "USA"]);
  }

  #[test]
  fn test_group_by_empty_input() {
    let records: Vec<AdoptionRecord> = Vec::new();
    assert!(group_by(&records, |r| r.year).is_empty());
  }

  #[test]
  fn test_empty_group_mean_is_zero() {
    assert_eq!(GroupAggregate::default().mean_adoption(), 0.0);
  }

  #[test]
  fn test_global_reducers() {
    let records = vec![record("USA", 10, 40.0), record("UK", 30, 60.0)];
    assert_eq!(sum_users(&records), 40);
    assert_eq!(mean_adoption(&records), 50.0);

    let empty: Vec<AdoptionRecord> = Vec::new();
    assert_eq!(sum_users(&empty), 0);
    assert_eq!(mean_adoption(&empty), 0.0);
  }
}
