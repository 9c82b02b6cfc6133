use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrbitError {
  #[error("Failed to read {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse CSV dataset: {source}")]
  Csv {
    #[from]
    source: csv::Error,
  },

  #[error("Failed to parse JSON: {source}")]
  Json {
    #[from]
    source: serde_json::Error,
  },

  #[error("No data loaded yet")]
  NotLoaded,

  #[error("Load {token} was superseded by load {latest}")]
  StaleLoad { token: u64, latest: u64 },

  #[error("Unknown dimension '{name}' (expected one of: country, industry, tool, year, age-group, company-size)")]
  InvalidDimension { name: String },
}

impl OrbitError {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io { path: path.into(), source }
  }

  pub fn stale_load(token: u64, latest: u64) -> Self {
    Self::StaleLoad { token, latest }
  }

  pub fn invalid_dimension(name: impl Into<String>) -> Self {
    Self::InvalidDimension { name: name.into() }
  }

  /// Whether this error came from reading or decoding the dataset
  pub fn is_load_failure(&self) -> bool {
    matches!(self, Self::Io { .. } | Self::Csv { .. } | Self::Json { .. })
  }
}

pub type Result<T> = std::result::Result<T, OrbitError>;
