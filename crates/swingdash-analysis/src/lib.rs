//! Session cleaning and comparison for launch-monitor golf data
//!
//! This crate turns two raw shot logs (a baseline and a comparison session)
//! into summary statistics and signed improvement deltas.
//!
//! # Overview
//!
//! The pipeline runs these stages, leaves first:
//!
//! 1. **Cleaning** ([`cleaning::preprocess`]): drop the `[unit]` header row,
//!    strip units and coerce numeric columns, parse dates, tag the session
//! 2. **Side classification** ([`side::add_side_column`]): Left / Straight /
//!    Right from a deviation angle with a dead zone
//! 3. **Outlier filtering** ([`filter::iqr_filter`]): drop rows outside the
//!    IQR fence of any checked column
//! 4. **Grouping** ([`grouping::add_group_column`]): optional coarse buckets
//! 5. **Balancing** ([`balance::balance_samples`]): seeded simple or
//!    stratified downsampling to equal shot counts
//! 6. **Analytics** ([`analytics`]): per-metric summaries, deltas ranked by
//!    improvement, KPI rows
//!
//! [`pipeline::run_comparison`] runs all of them with a
//! [`config::PipelineConfig`] and returns a [`pipeline::ComparisonReport`].
//!
//! # Data model
//!
//! - [`dataset::Dataset`]: column-major table of [`dataset::Value`] cells
//! - [`catalogue::MetricCatalogue`]: which columns are numeric, which are key
//!   metrics and whether higher or lower values are better
//!
//! Bad input never fails a stage: unparseable cells become missing, absent
//! columns are skipped, and empty inputs produce empty tables. The only
//! rejected input is an invalid [`config::PipelineConfig`].
//!
//! # Examples
//!
//! ```
//! use swingdash_analysis::{
//!     catalogue::MetricCatalogue,
//!     config::PipelineConfig,
//!     dataset::{Dataset, Value},
//!     pipeline::{self, SessionLabels},
//! };
//!
//! let session = |speeds: &[&str]| {
//!     Dataset::from_columns([(
//!         "Club Speed",
//!         speeds.iter().map(|s| Value::text(*s)).collect::<Vec<_>>(),
//!     )])
//! };
//! let old = session(&["[mph]", "90.0 mph", "92.0 mph"])?;
//! let new = session(&["[mph]", "95.0 mph", "97.0 mph"])?;
//!
//! let report = pipeline::run_comparison(
//!     &old,
//!     &new,
//!     &SessionLabels::default(),
//!     &PipelineConfig::default(),
//!     &MetricCatalogue::default(),
//! )?;
//! let speed = &report.comparison.rows[0];
//! assert_eq!(speed.metric, "Club Speed");
//! assert_eq!(speed.delta, Some(5.0));
//! assert_eq!(speed.improvement_sign, Some(1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analytics;
pub mod balance;
pub mod catalogue;
pub mod cleaning;
pub mod config;
pub mod dataset;
pub mod filter;
pub mod grouping;
pub mod pipeline;
pub mod side;
