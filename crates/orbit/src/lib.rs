//! Orbit - AI Tool Adoption Analytics
//!
//! Loads AI tool adoption records and turns them into the aggregated views a
//! dashboard presents: by country, industry, tool, year, age group and
//! company size, plus top-line totals.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod loader;
pub mod record;
pub mod reduce;
pub mod session;
pub mod summary;

pub use aggregate::{Aggregator, DerivedView, Dimension};
pub use cache::{PrecomputedData, PrecomputedDocument};
pub use config::{OrbitConfig, UserStatistic};
pub use error::{OrbitError, Result};
pub use filter::RecordFilter;
pub use loader::DataSource;
pub use record::AdoptionRecord;
pub use session::Session;
pub use summary::DashboardStats;
