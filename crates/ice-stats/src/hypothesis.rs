//! Two-sample hypothesis tests.
//!
//! This module provides the two tests used to compare independent samples:
//!
//! - [`bartlett`]: Bartlett's test for equality of variances across samples
//! - [`welch_t_test`]: Welch's unequal-variance t-test for a difference in means
//!
//! Both tests need at least two observations per sample, since the sample
//! variance is undefined below that.
//!
//! # Degenerate inputs
//!
//! Real review scores are coarse, so zero-variance samples do occur. Instead
//! of returning NaN the tests resolve them explicitly:
//!
//! - Bartlett with every variance equal (including all zero) reports a
//!   statistic of 0 and a p-value of 1. With some, but not all, variances zero
//!   the statistic is infinite and the p-value 0.
//! - Welch with a zero standard error reports `t = 0, p = 1` when the means
//!   agree and `t = ±inf, p = 0` when they differ.
//!
//! # Examples
//!
//! ```
//! use ice_stats::hypothesis::{bartlett, welch_t_test};
//!
//! let a = [7.1, 6.8, 8.0, 7.5, 6.9];
//! let b = [6.2, 5.9, 7.0, 6.4, 6.1];
//!
//! let variances = bartlett(&[&a, &b]).unwrap();
//! let means = welch_t_test(&a, &b).unwrap();
//! assert!(variances.p_value > 0.05);
//! assert!(means.p_value < 0.05);
//! ```

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, StudentsT};

use crate::descriptive::{mean, sample_variance};

/// Minimum number of observations per sample.
pub const MIN_SAMPLE_SIZE: usize = 2;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TestError {
    #[display("sample {index} has {size} observation(s), at least {MIN_SAMPLE_SIZE} are required")]
    InsufficientSample { index: usize, size: usize },
    #[display("at least two samples are required, got {count}")]
    TooFewSamples { count: usize },
    #[display("invalid distribution parameters: {source}")]
    Distribution { source: statrs::StatsError },
}

impl From<statrs::StatsError> for TestError {
    fn from(source: statrs::StatsError) -> Self {
        Self::Distribution { source }
    }
}

/// Result of Bartlett's test for equal variances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BartlettTest {
    /// The chi-squared test statistic.
    pub statistic: f64,
    /// Degrees of freedom (`k - 1` for `k` samples).
    pub df: f64,
    /// Upper-tail probability of the statistic.
    pub p_value: f64,
}

impl BartlettTest {
    /// Whether the variances are judged equal at significance level `alpha`.
    #[must_use]
    pub fn variances_equal(&self, alpha: f64) -> bool {
        self.p_value > alpha
    }
}

/// Result of Welch's two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WelchTest {
    /// The t statistic (`mean(a) - mean(b)` over its standard error).
    pub statistic: f64,
    /// Welch-Satterthwaite degrees of freedom, `NaN` when both samples are
    /// constant.
    pub df: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

fn check_sizes(samples: &[&[f64]]) -> Result<(), TestError> {
    if let Some((index, sample)) = samples
        .iter()
        .enumerate()
        .find(|(_, s)| s.len() < MIN_SAMPLE_SIZE)
    {
        return Err(TestError::InsufficientSample {
            index,
            size: sample.len(),
        });
    }
    Ok(())
}

/// Bartlett's test that all `samples` come from populations with equal
/// variances.
///
/// # Errors
///
/// Returns [`TestError::TooFewSamples`] for fewer than two samples and
/// [`TestError::InsufficientSample`] when any sample has fewer than two
/// observations.
#[expect(clippy::cast_precision_loss)]
pub fn bartlett(samples: &[&[f64]]) -> Result<BartlettTest, TestError> {
    if samples.len() < 2 {
        return Err(TestError::TooFewSamples {
            count: samples.len(),
        });
    }
    check_sizes(samples)?;

    let k = samples.len() as f64;
    let df = k - 1.0;
    let variances = samples
        .iter()
        .map(|s| sample_variance(s).unwrap_or(0.0))
        .collect::<Vec<_>>();

    let zero_count = variances.iter().filter(|v| **v == 0.0).count();
    if zero_count == variances.len() {
        return Ok(BartlettTest {
            statistic: 0.0,
            df,
            p_value: 1.0,
        });
    }
    if zero_count > 0 {
        return Ok(BartlettTest {
            statistic: f64::INFINITY,
            df,
            p_value: 0.0,
        });
    }

    let total = samples.iter().map(|s| s.len()).sum::<usize>() as f64;
    let dof = samples
        .iter()
        .map(|s| (s.len() - 1) as f64)
        .collect::<Vec<_>>();
    let pooled = dof.iter().zip(&variances).map(|(d, v)| d * v).sum::<f64>() / (total - k);

    let numerator = (total - k) * pooled.ln()
        - dof
            .iter()
            .zip(&variances)
            .map(|(d, v)| d * v.ln())
            .sum::<f64>();
    let correction =
        1.0 + (dof.iter().map(|d| 1.0 / d).sum::<f64>() - 1.0 / (total - k)) / (3.0 * df);
    let statistic = (numerator / correction).max(0.0);

    let chi2 = ChiSquared::new(df)?;
    let p_value = chi2.sf(statistic).clamp(0.0, 1.0);

    Ok(BartlettTest {
        statistic,
        df,
        p_value,
    })
}

/// Welch's t-test for a difference in means between two independent samples,
/// without assuming equal population variances.
///
/// # Errors
///
/// Returns [`TestError::InsufficientSample`] when either sample has fewer
/// than two observations.
#[expect(clippy::cast_precision_loss)]
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Result<WelchTest, TestError> {
    check_sizes(&[a, b])?;

    let (na, nb) = (a.len() as f64, b.len() as f64);
    let (mean_a, mean_b) = (mean(a).unwrap_or(0.0), mean(b).unwrap_or(0.0));
    let se_a = sample_variance(a).unwrap_or(0.0) / na;
    let se_b = sample_variance(b).unwrap_or(0.0) / nb;
    let se2 = se_a + se_b;
    let diff = mean_a - mean_b;

    if se2 == 0.0 {
        let df = f64::NAN;
        return Ok(if diff == 0.0 {
            WelchTest {
                statistic: 0.0,
                df,
                p_value: 1.0,
            }
        } else {
            WelchTest {
                statistic: f64::INFINITY.copysign(diff),
                df,
                p_value: 0.0,
            }
        });
    }

    let statistic = diff / se2.sqrt();
    let df = se2.powi(2) / (se_a.powi(2) / (na - 1.0) + se_b.powi(2) / (nb - 1.0));
    let dist = StudentsT::new(0.0, 1.0, df)?;
    let p_value = (2.0 * dist.sf(statistic.abs())).clamp(0.0, 1.0);

    Ok(WelchTest {
        statistic,
        df,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_identical_samples_fail_to_reject() {
        let a = [6.5, 7.0, 8.2, 5.9];
        let welch = welch_t_test(&a, &a).unwrap();
        assert_eq!(welch.statistic, 0.0);
        assert_close(welch.p_value, 1.0, 1e-12);

        let bartlett = bartlett(&[&a, &a]).unwrap();
        assert_close(bartlett.statistic, 0.0, 1e-12);
        assert!(bartlett.variances_equal(0.05));
    }

    #[test]
    fn test_constant_samples() {
        let a = [5.0, 5.0, 5.0];
        let b = [5.0, 5.0];
        let welch = welch_t_test(&a, &b).unwrap();
        assert_eq!(welch.p_value, 1.0);
        assert_eq!(bartlett(&[&a, &b]).unwrap().p_value, 1.0);

        let c = [6.0, 6.0];
        let welch = welch_t_test(&a, &c).unwrap();
        assert_eq!(welch.statistic, f64::NEG_INFINITY);
        assert_eq!(welch.p_value, 0.0);
        assert!(welch.df.is_nan());
    }

    #[test]
    fn test_far_tail_p_values_stay_positive() {
        let a = [1.0, 1.1, 0.9, 1.0, 1.05, 0.95, 1.0, 1.02, 0.98, 1.01];
        let b = [9.0, 9.1, 8.9, 9.0, 9.05, 8.95, 9.0, 9.02, 8.98, 9.01];
        let welch = welch_t_test(&a, &b).unwrap();
        assert!(welch.p_value > 0.0);
        assert!(welch.p_value < 1e-20);

        let narrow = [5.0, 5.001, 4.999, 5.0, 5.0005, 4.9995, 5.0, 5.0002];
        let wide = [1.0, 9.0, 3.0, 8.0, 2.0, 7.5, 0.5, 9.5];
        let result = bartlett(&[&narrow, &wide]).unwrap();
        assert!(result.p_value > 0.0);
        assert!(result.p_value < 1e-16);
    }

    #[test]
    fn test_one_zero_variance_is_unequal() {
        let a = [5.0, 5.0, 5.0];
        let b = [1.0, 2.0, 3.0];
        let result = bartlett(&[&a, &b]).unwrap();
        assert!(result.statistic.is_infinite());
        assert!(!result.variances_equal(0.05));
    }

    #[test]
    fn test_welch_known_values() {
        // Means 2.5 and 6.5, both variances 5/3, n = 4.
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        let result = welch_t_test(&a, &b).unwrap();
        let expected_t = -4.0 / (2.0 * 5.0 / 3.0 / 4.0_f64).sqrt();
        assert_close(result.statistic, expected_t, 1e-12);
        assert_close(result.df, 6.0, 1e-9);
        assert!(result.p_value < 0.01);
        assert!(result.p_value > 0.001);
    }

    #[test]
    fn test_bartlett_detects_spread_difference() {
        let narrow = [5.0, 5.1, 4.9, 5.0, 5.05, 4.95, 5.0, 5.02];
        let wide = [1.0, 9.0, 3.0, 8.0, 2.0, 7.5, 0.5, 9.5];
        let result = bartlett(&[&narrow, &wide]).unwrap();
        assert!(result.p_value < 0.001);
        assert_eq!(result.df, 1.0);
    }

    #[test]
    fn test_small_samples_are_rejected() {
        let err = welch_t_test(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            TestError::InsufficientSample { index: 0, size: 1 }
        ));
        let err = bartlett(&[&[1.0, 2.0], &[]]).unwrap_err();
        assert!(matches!(
            err,
            TestError::InsufficientSample { index: 1, size: 0 }
        ));
        assert!(matches!(
            bartlett(&[&[1.0, 2.0]]).unwrap_err(),
            TestError::TooFewSamples { count: 1 }
        ));
    }
}
