//! Statistical primitives for the SwingDash session comparison pipeline.
//!
//! This crate provides the small set of numeric tools the pipeline needs:
//!
//! - **Descriptive statistics**: count, mean, median, sample variance and standard deviation
//! - **Percentiles**: linear-interpolated quantiles used by the IQR outlier fence
//!
//! Both operate on `f64` samples where missing observations are represented as `None`
//! (or `NaN`) and are skipped before any computation.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing a metric column
//! - [`percentiles`]: Percentile computation and storage
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use swingdash_stats::descriptive::DescriptiveStats;
//!
//! let values = [Some(1.0), None, Some(2.0), Some(3.0)];
//! let stats = DescriptiveStats::from_optional(values).unwrap();
//! assert_eq!(stats.count, 3);
//! assert_eq!(stats.mean, 2.0);
//! assert_eq!(stats.std_dev, Some(1.0));
//! ```
//!
//! ## Computing quartiles
//!
//! ```
//! use swingdash_stats::percentiles::Percentiles;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let quartiles = Percentiles::new(&values, &[25.0, 75.0]);
//! assert_eq!(quartiles.get(25.0), Some(2.0));
//! assert_eq!(quartiles.get(75.0), Some(4.0));
//! ```

pub mod descriptive;
pub mod percentiles;
