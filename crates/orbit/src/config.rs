//! Configuration management for Orbit
//!
//! Holds the static lookup data (country coordinates, canonical category
//! orders) and the grouped user statistic. A config is built once and handed
//! to an [`crate::Aggregator`]; nothing reads it from global state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{OrbitError, Result};

/// Statistic used for `total_users` inside every grouped view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatistic {
  /// Arithmetic sum of daily active users per group
  Sum,
  /// Median of daily active users per group
  #[default]
  Median,
}

/// Decimal-degree position used to place a country on the globe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub lat: f64,
  pub lng: f64,
}

impl Coordinates {
  pub const ORIGIN: Coordinates = Coordinates { lat: 0.0, lng: 0.0 };
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitConfig {
  #[serde(default)]
  pub user_statistic: UserStatistic,
  /// Canonical display order of age groups
  #[serde(default = "default_age_order")]
  pub age_order: Vec<String>,
  /// Canonical display order of company sizes
  #[serde(default = "default_size_order")]
  pub size_order: Vec<String>,
  /// Extra or replacement coordinates, merged over the built-in table
  #[serde(default)]
  pub coordinates: HashMap<String, Coordinates>,
}

const COUNTRY_COORDINATES: [(&str, f64, f64); 20] = [
  ("USA", 37.0902, -95.7129),
  ("Canada", 56.1304, -106.3468),
  ("UK", 55.3781, -3.4360),
  ("France", 46.2276, 2.2137),
  ("Germany", 51.1657, 10.4515),
  ("India", 20.5937, 78.9629),
  ("China", 35.8617, 104.1954),
  ("Japan", 36.2048, 138.2529),
  ("Australia", -25.2744, 133.7751),
  ("Brazil", -14.2350, -51.9253),
  ("South Korea", 35.9078, 127.7669),
  ("Mexico", 23.6345, -102.5528),
  ("Spain", 40.4637, -3.7492),
  ("Italy", 41.8719, 12.5674),
  ("Netherlands", 52.1326, 5.2913),
  ("Sweden", 60.1282, 18.6435),
  ("Switzerland", 46.8182, 8.2275),
  ("Singapore", 1.3521, 103.8198),
  ("UAE", 23.4241, 53.8478),
  ("Russia", 61.5240, 105.3188),
];

fn default_age_order() -> Vec<String> {
  ["18-24", "25-34", "35-44", "45-54", "55+"].iter().map(|s| s.to_string()).collect()
}

fn default_size_order() -> Vec<String> {
  ["Startup", "SME", "Enterprise"].iter().map(|s| s.to_string()).collect()
}

/// The built-in coordinate table
pub fn default_coordinates() -> HashMap<String, Coordinates> {
  COUNTRY_COORDINATES
    .iter()
    .map(|(country, lat, lng)| (country.to_string(), Coordinates { lat: *lat, lng: *lng }))
    .collect()
}

impl Default for OrbitConfig {
  fn default() -> Self {
    Self {
      user_statistic: UserStatistic::default(),
      age_order: default_age_order(),
      size_order: default_size_order(),
      coordinates: default_coordinates(),
    }
  }
}

impl OrbitConfig {
  /// Default configuration with a different grouped user statistic
  pub fn with_statistic(user_statistic: UserStatistic) -> Self {
    Self { user_statistic, ..Self::default() }
  }

  /// Load configuration from a file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| OrbitError::io(path, e))?;
    let mut config: OrbitConfig = serde_json::from_str(&content)?;

    // File entries override the built-in table rather than replacing it
    let mut coordinates = default_coordinates();
    coordinates.extend(config.coordinates.drain());
    config.coordinates = coordinates;

    Ok(config)
  }

  /// Load configuration from the current directory, the user config dir, or defaults
  pub fn load() -> Result<Self> {
    for path in search_paths() {
      if path.exists() {
        tracing::debug!("Loading config from {}", path.display());
        return Self::load_from_file(path);
      }
    }

    Ok(OrbitConfig::default())
  }

  /// Save configuration to a file
  pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(self)?;
    std::fs::write(path, content).map_err(|e| OrbitError::io(path, e))?;
    Ok(())
  }

  /// Coordinates for a country, `(0, 0)` when the country is not in the table
  pub fn coordinates_for(&self, country: &str) -> Coordinates {
    self.coordinates.get(country).copied().unwrap_or(Coordinates::ORIGIN)
  }

  /// Position of an age group in the canonical order, -1 when unknown
  pub fn age_rank(&self, age_group: &str) -> i64 {
    rank(&self.age_order, age_group)
  }

  /// Position of a company size in the canonical order, -1 when unknown
  pub fn size_rank(&self, size: &str) -> i64 {
    rank(&self.size_order, size)
  }
}

fn rank(order: &[String], label: &str) -> i64 {
  order.iter().position(|entry| entry == label).map(|i| i as i64).unwrap_or(-1)
}

fn search_paths() -> Vec<PathBuf> {
  let mut paths: Vec<PathBuf> =
    [".orbit.json", "orbit.json", ".orbit/config.json"].iter().map(PathBuf::from).collect();

  if let Some(config_dir) = dirs::config_dir() {
    paths.push(config_dir.join("orbit").join("config.json"));
  }

  paths
}
