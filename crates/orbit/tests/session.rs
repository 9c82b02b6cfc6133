use anyhow::Result;
use orbit::loader::DataSource;
use orbit::session::LoadStatus;
use orbit::{Aggregator, OrbitError, PrecomputedData, Session};
use std::path::PathBuf;

fn fixture() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/ai_adoption_sample.csv")
}

#[cfg(test)]
mod session_tests {
  use super::*;

  #[tokio::test]
  async fn test_load_installs_data() -> Result<()> {
    let session = Session::new(Aggregator::default());
    assert!(matches!(session.data(), Err(OrbitError::NotLoaded)));

    let loaded = session.load(&DataSource::from_path(fixture())).await?;
    assert_eq!(session.status(), LoadStatus::Ready);
    assert_eq!(session.data()?.records().len(), loaded.records().len());
    Ok(())
  }

  #[tokio::test]
  async fn test_failed_load_reports_message() {
    let session = Session::default();
    let result = session.load(&DataSource::from_path("missing/dataset.csv")).await;

    assert!(result.is_err());
    match session.status() {
      LoadStatus::Failed(message) => assert!(message.contains("missing/dataset.csv")),
      other => panic!("unexpected status {other:?}"),
    }
    assert!(session.data().is_err());
  }

  #[tokio::test]
  async fn test_reload_keeps_previous_data_until_done() -> Result<()> {
    let session = Session::default();
    session.load(&DataSource::from_path(fixture())).await?;

    let _pending = session.begin();
    assert_eq!(session.status(), LoadStatus::Ready);
    assert_eq!(session.data()?.records().len(), 6);
    Ok(())
  }

  #[tokio::test]
  async fn test_slow_load_finishing_last_is_discarded() -> Result<()> {
    let session = Session::default();

    let slow = session.begin();
    let fresh = session.load(&DataSource::from_path(fixture())).await?;

    let stale = session.complete(slow, Ok(PrecomputedData::build(Vec::new(), Aggregator::default())));
    assert!(matches!(stale, Err(OrbitError::StaleLoad { .. })));

    assert_eq!(session.data()?.records().len(), fresh.records().len());
    Ok(())
  }
}
