//! Settings of a full analysis run.
//!
//! Every field has a default, so a configuration file only needs the values
//! it changes:
//!
//! ```
//! use ice_analysis::config::AnalysisConfig;
//!
//! let config: AnalysisConfig = serde_json::from_str(r#"{ "top_n": 3 }"#).unwrap();
//! assert_eq!(config.top_n, 3);
//! assert_eq!(config.window.recent_years, 5);
//! config.validate().unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    comparison::ComparisonSpec,
    dimension::Dimension,
    loader::LoaderOptions,
    policy::{CleaningPolicy, PolicyError},
    window::WindowPolicy,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("invalid cleaning policy")]
    Policy(PolicyError),
    #[display("{field} must be positive")]
    NotPositive { field: &'static str },
    #[display("{field} must be a finite, non-negative number, got {value}")]
    InvalidNumber { field: &'static str, value: f64 },
    #[display("significance level of '{label}' must be in (0, 1), got {alpha}")]
    InvalidAlpha { label: String, alpha: f64 },
}

/// Platforms with few sales before a cut-off year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyCutoff {
    /// Only releases strictly before this year are considered.
    pub before_year: i32,
    /// Platforms whose total sales stay below this amount are reported.
    pub max_total_sales: f64,
}

impl Default for LegacyCutoff {
    fn default() -> Self {
        Self {
            before_year: 1995,
            max_total_sales: 1.0,
        }
    }
}

/// Which rows a per-platform analysis reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Only rows inside the analysis window.
    Window,
    /// The whole cleaned table.
    Full,
}

/// A platform whose score/sales correlation is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationTarget {
    pub platform: String,
    pub scope: Scope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub loader: LoaderOptions,
    pub cleaning: CleaningPolicy,
    pub window: WindowPolicy,
    /// Length of every "top" list.
    pub top_n: usize,
    pub legacy: LegacyCutoff,
    /// Relative change above which a platform counts as growing, and below
    /// whose negation it counts as declining.
    pub trend_threshold: f64,
    pub correlations: Vec<CorrelationTarget>,
    pub comparisons: Vec<ComparisonSpec>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            loader: LoaderOptions::default(),
            cleaning: CleaningPolicy::default(),
            window: WindowPolicy::default(),
            top_n: 5,
            legacy: LegacyCutoff::default(),
            trend_threshold: 0.1,
            correlations: vec![
                CorrelationTarget {
                    platform: "PS4".to_owned(),
                    scope: Scope::Window,
                },
                CorrelationTarget {
                    platform: "XOne".to_owned(),
                    scope: Scope::Full,
                },
            ],
            comparisons: vec![
                ComparisonSpec::new(Dimension::Platform, "XOne", "PC"),
                ComparisonSpec::new(Dimension::Genre, "Action", "Sports"),
            ],
        }
    }
}

impl AnalysisConfig {
    /// Checks every setting that the type system does not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cleaning.validate().map_err(ConfigError::Policy)?;
        if self.top_n == 0 {
            return Err(ConfigError::NotPositive { field: "top_n" });
        }
        if self.window.recent_years == 0 {
            return Err(ConfigError::NotPositive {
                field: "window.recent_years",
            });
        }
        for (field, value) in [
            ("trend_threshold", self.trend_threshold),
            ("legacy.max_total_sales", self.legacy.max_total_sales),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidNumber { field, value });
            }
        }
        for spec in &self.comparisons {
            if !(spec.alpha > 0.0 && spec.alpha < 1.0) {
                return Err(ConfigError::InvalidAlpha {
                    label: spec.label(),
                    alpha: spec.alpha,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dimension::Measure, policy::MissingStrategy, table::Column};

    #[test]
    fn test_default_is_valid() {
        let config = AnalysisConfig::default();
        config.validate().unwrap();
        assert_eq!(config.comparisons.len(), 2);
        assert!(config.comparisons.iter().all(|c| c.measure == Measure::UserScore));
    }

    #[test]
    fn test_partial_json_overrides() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"{
                "loader": { "delimiter": ";" },
                "window": { "recent_years": 3 },
                "comparisons": [
                    { "dimension": "platform", "group_a": "PS4", "group_b": "XOne", "alpha": 0.01 }
                ],
                "correlations": []
            }"#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.loader.delimiter, ';');
        assert_eq!(config.loader.missing_markers, LoaderOptions::default().missing_markers);
        assert_eq!(config.window.recent_years, 3);
        assert_eq!(config.comparisons[0].alpha, 0.01);
        assert!(config.correlations.is_empty());
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn test_invalid_settings() {
        let config = AnalysisConfig {
            top_n: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "top_n" })
        ));

        let mut config = AnalysisConfig::default();
        config.comparisons[1].alpha = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidAlpha { .. })));

        let config = AnalysisConfig {
            trend_threshold: f64::NAN,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidNumber { .. })));

        let mut config = AnalysisConfig::default();
        config
            .cleaning
            .columns
            .get_mut(&Column::NaSales)
            .unwrap()
            .missing = MissingStrategy::NotEvaluated;
        assert!(matches!(config.validate(), Err(ConfigError::Policy(_))));
    }
}
