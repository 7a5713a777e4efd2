//! Two-sample comparisons between categorical slices.
//!
//! A comparison extracts a measure (by default the user score) from the rows
//! of two groups, runs Bartlett's test for equal variances and then Welch's
//! t-test for equal means. Welch's form is used whatever Bartlett's test
//! concludes; its outcome is only recorded.

use ice_stats::{
    descriptive,
    hypothesis::{self, BartlettTest, MIN_SAMPLE_SIZE, TestError},
};
use serde::{Deserialize, Serialize};

use crate::{
    dimension::{Dimension, Measure},
    features::AnalysisTable,
};

/// Significance level used when none is given.
pub const DEFAULT_ALPHA: f64 = 0.05;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ComparisonError {
    #[display(
        "group '{group}' has {size} observation(s), at least {MIN_SAMPLE_SIZE} are required"
    )]
    InsufficientSample { group: String, size: usize },
    #[display("statistical test failed")]
    Stats(TestError),
}

/// Which two groups to compare, and on what.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSpec {
    pub dimension: Dimension,
    pub group_a: String,
    pub group_b: String,
    #[serde(default = "default_measure")]
    pub measure: Measure,
    /// Restrict both groups to titles whose critic and user scores are
    /// evaluated.
    #[serde(default)]
    pub reviewed_only: bool,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_measure() -> Measure {
    Measure::UserScore
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

impl ComparisonSpec {
    /// Compares `measure` between two values of `dimension` with the default
    /// settings.
    #[must_use]
    pub fn new(dimension: Dimension, group_a: &str, group_b: &str) -> Self {
        Self {
            dimension,
            group_a: group_a.to_owned(),
            group_b: group_b.to_owned(),
            measure: default_measure(),
            reviewed_only: false,
            alpha: DEFAULT_ALPHA,
        }
    }

    /// Short human-readable description, e.g. `user_score: platform XOne vs PC`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{}: {} {} vs {}",
            self.measure, self.dimension, self.group_a, self.group_b
        )
    }
}

/// Outcome of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Welch's t statistic.
    pub statistic: f64,
    /// Two-sided p-value of Welch's test.
    pub p_value: f64,
    /// Whether Bartlett's test judged the variances equal.
    pub equal_variance: bool,
    /// Whether the null hypothesis of equal means is rejected.
    pub reject_null: bool,
    pub df: f64,
    pub bartlett: BartlettTest,
    pub size_a: usize,
    pub size_b: usize,
    pub mean_a: f64,
    pub mean_b: f64,
}

/// Values of `measure` in rows where `dimension` equals `value`.
///
/// Unevaluated scores are included in their encoded form; filter the table
/// with [`AnalysisTable::reviewed`] first to leave them out.
#[must_use]
pub fn extract_sample(
    table: &AnalysisTable,
    dimension: Dimension,
    value: &str,
    measure: Measure,
) -> Vec<f64> {
    table
        .rows()
        .iter()
        .filter(|row| dimension.matches(row, value))
        .map(|row| measure.value(row))
        .collect()
}

/// Runs the comparison described by `spec` on `table`.
///
/// # Errors
///
/// Returns [`ComparisonError::InsufficientSample`] when either group has
/// fewer than two observations; no p-value is produced in that case.
pub fn compare(
    table: &AnalysisTable,
    spec: &ComparisonSpec,
) -> Result<ComparisonResult, ComparisonError> {
    let reviewed;
    let table = if spec.reviewed_only {
        reviewed = table.reviewed();
        &reviewed
    } else {
        table
    };

    let a = extract_sample(table, spec.dimension, &spec.group_a, spec.measure);
    let b = extract_sample(table, spec.dimension, &spec.group_b, spec.measure);
    for (group, sample) in [(&spec.group_a, &a), (&spec.group_b, &b)] {
        if sample.len() < MIN_SAMPLE_SIZE {
            return Err(ComparisonError::InsufficientSample {
                group: group.clone(),
                size: sample.len(),
            });
        }
    }

    let bartlett = hypothesis::bartlett(&[&a, &b]).map_err(ComparisonError::Stats)?;
    let welch = hypothesis::welch_t_test(&a, &b).map_err(ComparisonError::Stats)?;

    Ok(ComparisonResult {
        statistic: welch.statistic,
        p_value: welch.p_value,
        equal_variance: bartlett.variances_equal(spec.alpha),
        reject_null: welch.p_value < spec.alpha,
        df: welch.df,
        bartlett,
        size_a: a.len(),
        size_b: b.len(),
        mean_a: descriptive::mean(&a).unwrap_or(f64::NAN),
        mean_b: descriptive::mean(&b).unwrap_or(f64::NAN),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        features::tests::{game, table},
        record::{GameRecord, Score},
    };

    fn scored(platform: &str, genre: &str, user_score: Score) -> GameRecord {
        let mut record = game("x", platform, 2015, genre, 1.0);
        record.user_score = user_score;
        record
    }

    #[test]
    fn test_identical_groups_fail_to_reject() {
        let table = table(
            [6.0, 7.5, 8.0]
                .into_iter()
                .flat_map(|s| {
                    [
                        scored("XOne", "Action", Score::Rated(s)),
                        scored("PC", "Action", Score::Rated(s)),
                    ]
                })
                .collect(),
        );
        let result = compare(&table, &ComparisonSpec::new(Dimension::Platform, "XOne", "PC")).unwrap();
        assert!((result.p_value - 1.0).abs() < 1e-9);
        assert!(result.equal_variance);
        assert!(!result.reject_null);
        assert_eq!((result.size_a, result.size_b), (3, 3));
    }

    #[test]
    fn test_clearly_different_groups_are_rejected() {
        let action = [2.1, 2.5, 3.0, 2.2, 2.8, 3.1];
        let sports = [8.0, 8.6, 7.9, 8.3, 9.0, 8.8];
        let records = action
            .iter()
            .map(|s| scored("PS4", "Action", Score::Rated(*s)))
            .chain(sports.iter().map(|s| scored("PS4", "Sports", Score::Rated(*s))))
            .collect();
        let result = compare(
            &table(records),
            &ComparisonSpec::new(Dimension::Genre, "Action", "Sports"),
        )
        .unwrap();
        assert!(result.reject_null);
        assert!(result.p_value < 1e-6);
        assert!(result.statistic < 0.0);
    }

    #[test]
    fn test_small_group_is_insufficient() {
        let table = table(vec![
            scored("XOne", "Action", Score::Rated(7.0)),
            scored("XOne", "Action", Score::Rated(6.0)),
            scored("PC", "Action", Score::Rated(8.0)),
        ]);
        let err = compare(&table, &ComparisonSpec::new(Dimension::Platform, "XOne", "PC")).unwrap_err();
        assert!(matches!(
            err,
            ComparisonError::InsufficientSample { ref group, size: 1 } if group == "PC"
        ));
    }

    #[test]
    fn test_sentinel_scores_are_included_unless_reviewed_only() {
        let table = table(vec![
            scored("XOne", "Action", Score::Rated(7.0)),
            scored("XOne", "Action", Score::Rated(6.0)),
            scored("XOne", "Action", Score::NotEvaluated),
            scored("PC", "Action", Score::Rated(8.0)),
            scored("PC", "Action", Score::Rated(5.0)),
        ]);
        let sample = extract_sample(&table, Dimension::Platform, "XOne", Measure::UserScore);
        assert_eq!(sample, [7.0, 6.0, Score::SENTINEL]);

        let mut spec = ComparisonSpec::new(Dimension::Platform, "XOne", "PC");
        assert_eq!(compare(&table, &spec).unwrap().size_a, 3);
        spec.reviewed_only = true;
        let result = compare(&table, &spec).unwrap();
        assert_eq!(result.size_a, 2);
        assert!((result.mean_a - 6.5).abs() < 1e-12);
    }

    #[test]
    fn test_spec_defaults_from_json() {
        let spec: ComparisonSpec = serde_json::from_str(
            r#"{ "dimension": "genre", "group_a": "Action", "group_b": "Sports" }"#,
        )
        .unwrap();
        assert_eq!(spec, ComparisonSpec::new(Dimension::Genre, "Action", "Sports"));
        assert_eq!(spec.label(), "user_score: genre Action vs Sports");
    }
}
