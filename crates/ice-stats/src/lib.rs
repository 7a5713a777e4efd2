//! Statistical building blocks for the sales analysis.
//!
//! This crate provides a small, fixed set of statistical tools:
//!
//! - **Descriptive statistics**: five-number summary, mean, sample variance
//! - **Percentiles**: linearly interpolated percentiles of sorted data
//! - **Correlation**: Pearson correlation of paired observations
//! - **Hypothesis tests**: Bartlett's test for equal variances and Welch's t-test
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation
//! - [`correlation`]: Pearson correlation coefficient
//! - [`hypothesis`]: Two-sample variance and mean comparison tests
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use ice_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.median, 3.0);
//! ```
//!
//! ## Comparing two samples
//!
//! ```
//! use ice_stats::hypothesis::welch_t_test;
//!
//! let a = [6.0, 7.0, 8.0];
//! let b = [6.0, 7.0, 8.0];
//! let result = welch_t_test(&a, &b).unwrap();
//! assert!((result.p_value - 1.0).abs() < 1e-9);
//! ```

pub mod correlation;
pub mod descriptive;
pub mod hypothesis;
pub mod percentiles;
