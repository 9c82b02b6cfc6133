//! The adoption record model

use serde::{Deserialize, Deserializer, Serialize};

/// One observation of AI tool usage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoptionRecord {
  pub country: String,
  pub industry: String,
  pub ai_tool: String,
  /// Percentage in the 0-100 range
  pub adoption_rate: f64,
  #[serde(deserialize_with = "deserialize_user_count")]
  pub daily_active_users: u64,
  pub year: i32,
  #[serde(default)]
  pub user_feedback: String,
  pub age_group: String,
  pub company_size: String,
}

impl AdoptionRecord {
  /// Records without a country or industry never reach aggregation
  pub fn is_valid(&self) -> bool {
    !self.country.trim().is_empty() && !self.industry.trim().is_empty()
  }
}

/// Read a user count written either as an integer or as a whole float
///
/// Exports that pass through a float column write `1200` as `1200.0`; both
/// forms load, anything negative or fractional is rejected.
pub fn deserialize_user_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
  D: Deserializer<'de>,
{
  let value = f64::deserialize(deserializer)?;
  if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
    return Err(serde::de::Error::custom(format!("invalid user count {value}")));
  }
  Ok(value as u64)
}

/// Drop every record that fails [`AdoptionRecord::is_valid`]
pub fn retain_valid(records: Vec<AdoptionRecord>) -> Vec<AdoptionRecord> {
  let before = records.len();
  let valid: Vec<AdoptionRecord> = records.into_iter().filter(AdoptionRecord::is_valid).collect();

  let dropped = before - valid.len();
  if dropped > 0 {
    tracing::debug!("Dropped {} records missing country or industry", dropped);
  }

  valid
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(country: &str, industry: &str) -> AdoptionRecord {
    AdoptionRecord {
      country: country.to_string(),
      industry: industry.to_string(),
      ai_tool: "ChatGPT".to_string(),
      adoption_rate: 42.0,
      daily_active_users: 1000,
      year: 2024,
      user_feedback: String::new(),
      age_group: "25-34".to_string(),
      company_size: "SME".to_string(),
    }
  }

  #[test]
  fn test_validity() {
    assert!(record("USA", "Finance").is_valid());
    assert!(!record("", "Finance").is_valid());
    assert!(!record("USA", "").is_valid());
    assert!(!record("  ", "Finance").is_valid());
  }

  #[test]
  fn test_retain_valid_keeps_order() {
    let records = vec![record("USA", "Finance"), record("", "Retail"), record("UK", "Retail")];
    let valid = retain_valid(records);
    assert_eq!(valid.len(), 2);
    assert_eq!(valid[0].country, "USA");
    assert_eq!(valid[1].country, "UK");
  }

  #[test]
  fn test_feedback_defaults_when_missing() {
    let json = r#"{
      "country": "India",
      "industry": "Healthcare",
      "ai_tool": "Gemini",
      "adoption_rate": 61.5,
      "daily_active_users": 250,
      "year": 2023,
      "age_group": "35-44",
      "company_size": "Enterprise"
    }"#;
    let parsed: AdoptionRecord = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.user_feedback, "");
    assert_eq!(parsed.daily_active_users, 250);
  }

  #[test]
  fn test_user_count_accepts_whole_floats() {
    let json = |users: &str| {
      format!(
        r#"{{"country":"UK","industry":"Retail","ai_tool":"Claude","adoption_rate":40.0,"daily_active_users":{users},"year":2024,"age_group":"18-24","company_size":"SME"}}"#
      )
    };

    let parsed: AdoptionRecord = serde_json::from_str(&json("1200.0")).unwrap();
    assert_eq!(parsed.daily_active_users, 1200);

    assert!(serde_json::from_str::<AdoptionRecord>(&json("12.5")).is_err());
    assert!(serde_json::from_str::<AdoptionRecord>(&json("-3")).is_err());
  }
}
