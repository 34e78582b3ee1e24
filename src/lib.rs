//! # Faculty Salary Statistics Library
//!
//! `salarystats` keeps the aggregates behind an interactive faculty salary
//! dashboard up to date while the user filters the data. It loads the salary
//! dataset, maintains grouped statistics incrementally as records enter and
//! leave the current selection, and hands chart-ready values to an external
//! renderer.
//!
//! ## Features
//!
//! - Validated CSV ingestion of salary records
//! - Grouped aggregation with pluggable add/remove reducers
//! - Built-in count, sum, average and match-ratio reducers
//! - Cross-filtering: a selection on any dimension updates every grouping
//! - A ready-made dashboard with gender balance, average salary, rank
//!   distribution and salary scatter charts
//! - JSON snapshots for rendering
//!
//! ## Example
//!
//! ```no_run
//! use salarystats::{DashboardConfig, SalaryDashboard, Sex};
//!
//! let config = DashboardConfig::from_json_file("dashboard.json")?;
//! let mut dashboard = SalaryDashboard::load(config)?;
//!
//! dashboard.select_discipline(Some("A"))?;
//! let snapshot = dashboard.snapshot()?;
//! println!("female average: {:.0}", snapshot.average_salary(Sex::Female));
//! println!("{}", snapshot.to_json()?);
//! # Ok::<(), salarystats::Error>(())
//! ```

pub mod aggregation;
pub mod config;
pub mod crossfilter;
pub mod dashboard;
pub mod error;
pub mod ingest;
pub mod types;

// Re-export main types for convenience
pub use config::DashboardConfig;
pub use dashboard::{DashboardSnapshot, SalaryDashboard};
pub use error::{AggregateError, Error, IngestError};
pub use types::{Rank, Record, Sex};
