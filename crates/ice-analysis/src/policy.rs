//! Column-by-column cleaning policy.
//!
//! The policy states, for each [`Column`], what to do when a value is missing
//! and which type the value must be coerced to. The default policy is:
//!
//! | column             | missing value        | target            |
//! |--------------------|----------------------|-------------------|
//! | `year_of_release`  | drop the row         | integer           |
//! | `name`             | fill with `unknown`  | text              |
//! | `genre`            | fill with `unknown`  | text              |
//! | `rating`           | fill with `unknown`  | text              |
//! | `user_score`       | not evaluated        | score in 0..=10   |
//! | `critic_score`     | not evaluated        | score in 0..=100  |
//! | `platform`         | reject               | text              |
//! | regional sales     | reject               | float             |
//!
//! `user_score` additionally accepts the placeholder token `tbd`, which means
//! the same as a missing score.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};

use crate::table::Column;

/// Marker written into text columns whose value is missing.
pub const UNKNOWN_MARKER: &str = "unknown";

/// Placeholder token for a user score that is "to be determined".
pub const USER_SCORE_PLACEHOLDER: &str = "tbd";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PolicyError {
    #[display("no cleaning policy for column '{column}'")]
    Uncovered { column: Column },
    #[display("column '{column}' cannot be coerced to {target:?}")]
    IncompatibleTarget { column: Column, target: TargetType },
    #[display("missing-value strategy {strategy:?} cannot be used for column '{column}'")]
    IncompatibleStrategy {
        column: Column,
        strategy: MissingStrategy,
    },
    #[display("score range for column '{column}' is empty")]
    EmptyRange { column: Column },
    #[display("placeholder tokens are only supported on score columns, not '{column}'")]
    UnexpectedPlaceholders { column: Column },
}

/// What to do with a missing cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum MissingStrategy {
    /// Remove the whole row before any other cleaning.
    DropRow,
    /// Replace with a literal text value.
    Fill { value: String },
    /// Mark the score as not evaluated.
    NotEvaluated,
    /// Treat as an error.
    Reject,
}

/// The semantic type a column is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetType {
    Text,
    /// A four-digit year.
    Integer,
    /// A finite, non-negative amount.
    Float,
    /// A review score inside `min..=max`, or not evaluated.
    Score { min: f64, max: f64 },
}

impl TargetType {
    fn suits(self, column: Column) -> bool {
        match column {
            Column::Name | Column::Platform | Column::Genre | Column::Rating => {
                matches!(self, TargetType::Text)
            }
            Column::YearOfRelease => matches!(self, TargetType::Integer),
            Column::NaSales | Column::EuSales | Column::JpSales | Column::OtherSales => {
                matches!(self, TargetType::Float)
            }
            Column::CriticScore | Column::UserScore => matches!(self, TargetType::Score { .. }),
        }
    }
}

/// Cleaning rules for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnPolicy {
    pub missing: MissingStrategy,
    pub target: TargetType,
    /// Tokens that mean "not evaluated yet" (score columns only, matched
    /// case-insensitively).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placeholders: Vec<String>,
}

impl ColumnPolicy {
    fn new(missing: MissingStrategy, target: TargetType) -> Self {
        Self {
            missing,
            target,
            placeholders: vec![],
        }
    }

    /// Whether `text` is one of this column's placeholder tokens.
    #[must_use]
    pub fn is_placeholder(&self, text: &str) -> bool {
        self.placeholders
            .iter()
            .any(|p| p.eq_ignore_ascii_case(text))
    }
}

/// The complete cleaning policy, one entry per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningPolicy {
    pub columns: BTreeMap<Column, ColumnPolicy>,
}

impl Default for CleaningPolicy {
    fn default() -> Self {
        let fill_unknown = || {
            ColumnPolicy::new(
                MissingStrategy::Fill {
                    value: UNKNOWN_MARKER.to_owned(),
                },
                TargetType::Text,
            )
        };
        let sales = || ColumnPolicy::new(MissingStrategy::Reject, TargetType::Float);

        let columns = BTreeMap::from([
            (Column::Name, fill_unknown()),
            (
                Column::Platform,
                ColumnPolicy::new(MissingStrategy::Reject, TargetType::Text),
            ),
            (
                Column::YearOfRelease,
                ColumnPolicy::new(MissingStrategy::DropRow, TargetType::Integer),
            ),
            (Column::Genre, fill_unknown()),
            (Column::NaSales, sales()),
            (Column::EuSales, sales()),
            (Column::JpSales, sales()),
            (Column::OtherSales, sales()),
            (
                Column::CriticScore,
                ColumnPolicy::new(
                    MissingStrategy::NotEvaluated,
                    TargetType::Score {
                        min: 0.0,
                        max: 100.0,
                    },
                ),
            ),
            (
                Column::UserScore,
                ColumnPolicy {
                    placeholders: vec![USER_SCORE_PLACEHOLDER.to_owned()],
                    ..ColumnPolicy::new(
                        MissingStrategy::NotEvaluated,
                        TargetType::Score {
                            min: 0.0,
                            max: 10.0,
                        },
                    )
                },
            ),
            (Column::Rating, fill_unknown()),
        ]);
        Self { columns }
    }
}

impl CleaningPolicy {
    /// The rules for `column`.
    ///
    /// # Panics
    ///
    /// Panics if the policy does not cover `column`; call [`Self::validate`]
    /// first.
    #[must_use]
    pub fn get(&self, column: Column) -> &ColumnPolicy {
        &self.columns[&column]
    }

    /// Columns whose missing values remove the row.
    pub fn drop_columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns
            .iter()
            .filter(|(_, policy)| policy.missing == MissingStrategy::DropRow)
            .map(|(column, _)| *column)
    }

    /// Checks that every column is covered and every rule suits its column.
    pub fn validate(&self) -> Result<(), PolicyError> {
        for column in Column::ALL {
            let policy = self
                .columns
                .get(&column)
                .ok_or(PolicyError::Uncovered { column })?;

            if !policy.target.suits(column) {
                return Err(PolicyError::IncompatibleTarget {
                    column,
                    target: policy.target,
                });
            }
            if matches!(policy.target, TargetType::Score { min, max } if min.partial_cmp(&max) != Some(Ordering::Less))
            {
                return Err(PolicyError::EmptyRange { column });
            }

            let strategy_ok = match &policy.missing {
                MissingStrategy::DropRow | MissingStrategy::Reject => true,
                MissingStrategy::Fill { .. } => policy.target == TargetType::Text,
                MissingStrategy::NotEvaluated => {
                    matches!(policy.target, TargetType::Score { .. })
                }
            };
            if !strategy_ok {
                return Err(PolicyError::IncompatibleStrategy {
                    column,
                    strategy: policy.missing.clone(),
                });
            }

            if !policy.placeholders.is_empty() && !matches!(policy.target, TargetType::Score { .. })
            {
                return Err(PolicyError::UnexpectedPlaceholders { column });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        let policy = CleaningPolicy::default();
        policy.validate().unwrap();
        assert_eq!(
            policy.drop_columns().collect::<Vec<_>>(),
            [Column::YearOfRelease]
        );
        assert!(policy.get(Column::UserScore).is_placeholder("TBD"));
        assert!(!policy.get(Column::CriticScore).is_placeholder("tbd"));
    }

    #[test]
    fn test_uncovered_column() {
        let mut policy = CleaningPolicy::default();
        policy.columns.remove(&Column::Rating);
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::Uncovered {
                column: Column::Rating
            })
        ));
    }

    #[test]
    fn test_fill_on_numeric_column_is_rejected() {
        let mut policy = CleaningPolicy::default();
        policy.columns.insert(
            Column::NaSales,
            ColumnPolicy::new(
                MissingStrategy::Fill {
                    value: "0".into(),
                },
                TargetType::Float,
            ),
        );
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::IncompatibleStrategy {
                column: Column::NaSales,
                ..
            })
        ));
    }

    #[test]
    fn test_wrong_target_and_empty_range() {
        let mut policy = CleaningPolicy::default();
        policy.columns.insert(
            Column::YearOfRelease,
            ColumnPolicy::new(MissingStrategy::DropRow, TargetType::Text),
        );
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::IncompatibleTarget { .. })
        ));

        let mut policy = CleaningPolicy::default();
        policy.columns.insert(
            Column::CriticScore,
            ColumnPolicy::new(
                MissingStrategy::NotEvaluated,
                TargetType::Score {
                    min: 10.0,
                    max: 10.0,
                },
            ),
        );
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_policy_round_trips_through_json() {
        let json = r#"{
            "strategy": "fill",
            "value": "n/a"
        }"#;
        let strategy: MissingStrategy = serde_json::from_str(json).unwrap();
        assert_eq!(
            strategy,
            MissingStrategy::Fill {
                value: "n/a".into()
            }
        );

        let policy = CleaningPolicy::default();
        let text = serde_json::to_string(&policy).unwrap();
        let parsed: CleaningPolicy = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, policy);
    }
}
