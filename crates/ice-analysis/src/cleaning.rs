//! Applying a [`CleaningPolicy`] to a normalized [`RawTable`].
//!
//! Cleaning runs in two passes. The first pass drops every row whose
//! [`MissingStrategy::DropRow`] column is missing; the second fills the
//! remaining missing cells and coerces every cell to its target type. A row
//! removed in the first pass is never coerced, so a drop column may hold
//! arbitrary missing markers.

use tracing::{debug, info};

use crate::{
    policy::{CleaningPolicy, MissingStrategy, PolicyError, TargetType},
    record::{GameRecord, GameTable, RegionalSales, Score},
    table::{Cell, Column, RawRow, RawTable},
};

/// Smallest and largest accepted release year.
const YEAR_RANGE: std::ops::RangeInclusive<f64> = 1000.0..=9999.0;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CleanError {
    #[display("invalid cleaning policy")]
    Policy(PolicyError),
    #[display("column '{column}' is not present in the table")]
    MissingColumn { column: Column },
    #[display("line {line}: column '{column}' has no value")]
    MissingValue { column: Column, line: u64 },
    #[display("line {line}: column '{column}' has unparseable value {value:?} ({reason})")]
    UnparseableValue {
        column: Column,
        line: u64,
        value: String,
        reason: String,
    },
}

/// Cleans `table` according to `policy`.
///
/// The table's column names must already be normalized (see
/// [`normalize_columns`](crate::normalize::normalize_columns)).
///
/// ```
/// use ice_analysis::{
///     cleaning::clean,
///     loader::{LoaderOptions, read_csv},
///     normalize::normalize_columns,
///     policy::CleaningPolicy,
///     record::Score,
/// };
///
/// let data = "Name,Platform,Year_of_Release,Genre,NA_sales,EU_sales,JP_sales,Other_sales,Critic_Score,User_Score,Rating\n\
///             Wii Sports,Wii,2006,Sports,41.36,28.96,3.77,8.45,76,8,E\n\
///             Madden NFL 2004,PS2,,Sports,4.26,0.26,0.01,0.71,94,8.5,E\n\
///             Just Dance 2,Wii,2010,Misc,3.09,1.49,0.0,0.45,,tbd,\n";
/// let raw = normalize_columns(read_csv(data.as_bytes(), &LoaderOptions::default()).unwrap());
/// let table = clean(raw, &CleaningPolicy::default()).unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.records[1].user_score, Score::NotEvaluated);
/// assert_eq!(table.records[1].rating, "unknown");
/// ```
pub fn clean(table: RawTable, policy: &CleaningPolicy) -> Result<GameTable, CleanError> {
    policy.validate().map_err(CleanError::Policy)?;
    let layout = Layout::resolve(&table)?;

    let input_rows = table.len();
    let kept = drop_incomplete_rows(table.rows, policy, &layout);
    let dropped = input_rows - kept.len();

    let records = kept
        .iter()
        .map(|row| {
            RowCleaner {
                row,
                layout: &layout,
                policy,
            }
            .record()
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(input_rows, dropped, rows = records.len(), "cleaned table");
    Ok(GameTable { records })
}

/// Position of every [`Column`] in the raw table.
#[derive(Debug)]
struct Layout {
    indices: [usize; Column::ALL.len()],
}

impl Layout {
    fn resolve(table: &RawTable) -> Result<Self, CleanError> {
        let mut indices = [0; Column::ALL.len()];
        for (slot, column) in indices.iter_mut().zip(Column::ALL) {
            *slot = table
                .column_index(column.name())
                .ok_or(CleanError::MissingColumn { column })?;
        }
        Ok(Self { indices })
    }

    fn cell<'a>(&self, row: &'a RawRow, column: Column) -> &'a Cell {
        let index = self.indices[column as usize];
        row.cells.get(index).unwrap_or(&Cell::Missing)
    }
}

fn drop_incomplete_rows(rows: Vec<RawRow>, policy: &CleaningPolicy, layout: &Layout) -> Vec<RawRow> {
    let drop_columns = policy.drop_columns().collect::<Vec<_>>();
    rows.into_iter()
        .filter(|row| {
            let missing = drop_columns
                .iter()
                .find(|column| layout.cell(row, **column).is_missing());
            if let Some(column) = missing {
                debug!(line = row.line, %column, "dropping row with missing value");
            }
            missing.is_none()
        })
        .collect()
}

struct RowCleaner<'a> {
    row: &'a RawRow,
    layout: &'a Layout,
    policy: &'a CleaningPolicy,
}

impl RowCleaner<'_> {
    fn record(&self) -> Result<GameRecord, CleanError> {
        Ok(GameRecord {
            name: self.text(Column::Name)?,
            platform: self.text(Column::Platform)?,
            year_of_release: self.year(Column::YearOfRelease)?,
            genre: self.text(Column::Genre)?,
            sales: RegionalSales {
                na: self.amount(Column::NaSales)?,
                eu: self.amount(Column::EuSales)?,
                jp: self.amount(Column::JpSales)?,
                other: self.amount(Column::OtherSales)?,
            },
            critic_score: self.score(Column::CriticScore)?,
            user_score: self.score(Column::UserScore)?,
            rating: self.text(Column::Rating)?,
        })
    }

    /// The cell of `column`, or what its missing-value strategy puts there.
    fn value(&self, column: Column) -> Result<Value<'_>, CleanError> {
        let cell = self.layout.cell(self.row, column);
        if !cell.is_missing() {
            return Ok(Value::Cell(cell));
        }
        match &self.policy.get(column).missing {
            MissingStrategy::Fill { value } => Ok(Value::Fill(value.clone())),
            MissingStrategy::NotEvaluated => Ok(Value::NotEvaluated),
            MissingStrategy::DropRow | MissingStrategy::Reject => Err(CleanError::MissingValue {
                column,
                line: self.row.line,
            }),
        }
    }

    /// The present cell of a column that has no fill.
    fn cell(&self, column: Column) -> Result<&Cell, CleanError> {
        match self.value(column)? {
            Value::Cell(cell) => Ok(cell),
            Value::Fill(_) | Value::NotEvaluated => Err(self.incompatible(column)),
        }
    }

    fn unparseable(&self, column: Column, cell: &Cell, reason: impl Into<String>) -> CleanError {
        CleanError::UnparseableValue {
            column,
            line: self.row.line,
            value: cell.to_string(),
            reason: reason.into(),
        }
    }

    fn incompatible(&self, column: Column) -> CleanError {
        CleanError::Policy(PolicyError::IncompatibleStrategy {
            column,
            strategy: self.policy.get(column).missing.clone(),
        })
    }

    fn text(&self, column: Column) -> Result<String, CleanError> {
        match self.value(column)? {
            Value::Cell(cell) => Ok(cell.to_string()),
            Value::Fill(value) => Ok(value),
            Value::NotEvaluated => Err(self.incompatible(column)),
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    fn year(&self, column: Column) -> Result<i32, CleanError> {
        let cell = self.cell(column)?;
        match cell {
            Cell::Number { value, .. } if value.fract() == 0.0 && YEAR_RANGE.contains(value) => {
                Ok(*value as i32)
            }
            Cell::Number { .. } => Err(self.unparseable(column, cell, "not a four-digit year")),
            _ => Err(self.unparseable(column, cell, "not a number")),
        }
    }

    fn amount(&self, column: Column) -> Result<f64, CleanError> {
        let cell = self.cell(column)?;
        match cell {
            Cell::Number { value, .. } if *value >= 0.0 => Ok(*value),
            Cell::Number { .. } => Err(self.unparseable(column, cell, "negative amount")),
            _ => Err(self.unparseable(column, cell, "not a number")),
        }
    }

    fn score(&self, column: Column) -> Result<Score, CleanError> {
        let policy = self.policy.get(column);
        let TargetType::Score { min, max } = policy.target else {
            return Err(self.incompatible(column));
        };
        let cell = match self.value(column)? {
            Value::Cell(cell) => cell,
            Value::NotEvaluated => return Ok(Score::NotEvaluated),
            Value::Fill(_) => return Err(self.incompatible(column)),
        };
        match cell {
            Cell::Number { value, .. } if (value - Score::SENTINEL).abs() < f64::EPSILON => {
                Ok(Score::NotEvaluated)
            }
            Cell::Number { value, .. } if (min..=max).contains(value) => Ok(Score::Rated(*value)),
            Cell::Number { .. } => {
                Err(self.unparseable(column, cell, format!("outside {min}..={max}")))
            }
            Cell::Text(text) if policy.is_placeholder(text) => Ok(Score::NotEvaluated),
            _ => Err(self.unparseable(column, cell, "not a number")),
        }
    }
}

enum Value<'a> {
    Cell(&'a Cell),
    Fill(String),
    NotEvaluated,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        loader::{LoaderOptions, read_csv},
        normalize::normalize_columns,
    };

    const HEADER: &str = "Name,Platform,Year_of_Release,Genre,NA_sales,EU_sales,JP_sales,Other_sales,Critic_Score,User_Score,Rating";

    fn raw(rows: &[&str]) -> RawTable {
        let data = format!("{HEADER}\n{}\n", rows.join("\n"));
        normalize_columns(read_csv(data.as_bytes(), &LoaderOptions::default()).unwrap())
    }

    fn clean_rows(rows: &[&str]) -> Result<GameTable, CleanError> {
        clean(raw(rows), &CleaningPolicy::default())
    }

    #[test]
    fn test_rows_without_year_are_dropped() {
        let table = clean_rows(&[
            "A,PS4,2015,Action,1,0,0,0,80,7.5,M",
            "B,PS4,,Action,1,0,0,0,80,7.5,M",
            "C,PS4,NaN,Action,1,0,0,0,80,7.5,M",
        ])
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].name, "A");
        assert_eq!(table.records[0].year_of_release, 2015);
    }

    #[test]
    fn test_missing_values_are_filled() {
        let table = clean_rows(&[",GB,1989,,1,0,0,0,,,"]).unwrap();
        let record = &table.records[0];
        assert_eq!(record.name, "unknown");
        assert_eq!(record.genre, "unknown");
        assert_eq!(record.rating, "unknown");
        assert_eq!(record.critic_score, Score::NotEvaluated);
        assert_eq!(record.user_score, Score::NotEvaluated);
    }

    #[test]
    fn test_placeholder_user_score_is_not_evaluated() {
        let table = clean_rows(&["A,DS,2008,Misc,1,0,0,0,70,tbd,E", "B,DS,2008,Misc,1,0,0,0,70,TBD,E"]).unwrap();
        assert!(table.records.iter().all(|r| r.user_score == Score::NotEvaluated));
        assert!(table.records.iter().all(|r| r.critic_score == Score::Rated(70.0)));
    }

    #[test]
    fn test_sentinel_is_read_as_not_evaluated() {
        let table = clean_rows(&["A,DS,2008,Misc,1,0,0,0,999,999,E"]).unwrap();
        assert_eq!(table.records[0].critic_score, Score::NotEvaluated);
        assert_eq!(table.records[0].user_score, Score::NotEvaluated);
    }

    #[test]
    fn test_numeric_text_columns_keep_authored_text() {
        let table = clean_rows(&["1942,2600,1984,Shooter,0.5,0.1,0,0.02,,,"]).unwrap();
        assert_eq!(table.records[0].name, "1942");
        assert_eq!(table.records[0].platform, "2600");
    }

    #[test]
    fn test_unparseable_values_are_fatal() {
        let err = clean_rows(&["A,PS4,2015,Action,1,0,0,0,80,great,M"]).unwrap_err();
        assert!(matches!(
            err,
            CleanError::UnparseableValue {
                column: Column::UserScore,
                line: 2,
                ..
            }
        ));

        let err = clean_rows(&["A,PS4,2015,Action,1,0,0,0,80,7.5,M", "B,PS4,2015,Action,1,0,0,0,120,7.5,M"]).unwrap_err();
        assert!(matches!(
            err,
            CleanError::UnparseableValue {
                column: Column::CriticScore,
                line: 3,
                ..
            }
        ));

        let err = clean_rows(&["A,PS4,soon,Action,1,0,0,0,80,7.5,M"]).unwrap_err();
        assert!(matches!(
            err,
            CleanError::UnparseableValue {
                column: Column::YearOfRelease,
                ..
            }
        ));

        let err = clean_rows(&["A,PS4,2015,Action,-1,0,0,0,80,7.5,M"]).unwrap_err();
        assert!(matches!(
            err,
            CleanError::UnparseableValue {
                column: Column::NaSales,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_sales_are_rejected() {
        let err = clean_rows(&["A,PS4,2015,Action,,0,0,0,80,7.5,M"]).unwrap_err();
        assert!(matches!(
            err,
            CleanError::MissingValue {
                column: Column::NaSales,
                line: 2
            }
        ));
    }

    #[test]
    fn test_unnormalized_table_is_missing_columns() {
        let data = format!("{HEADER}\nA,PS4,2015,Action,1,0,0,0,80,7.5,M\n");
        let table = read_csv(data.as_bytes(), &LoaderOptions::default()).unwrap();
        let err = clean(table, &CleaningPolicy::default()).unwrap_err();
        assert!(matches!(err, CleanError::MissingColumn { column: Column::Name }));
    }

    #[test]
    fn test_invalid_policy_is_rejected_before_cleaning() {
        let mut policy = CleaningPolicy::default();
        policy.columns.remove(&Column::Genre);
        let err = clean(raw(&["A,PS4,2015,Action,1,0,0,0,80,7.5,M"]), &policy).unwrap_err();
        assert!(matches!(err, CleanError::Policy(PolicyError::Uncovered { .. })));
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let once = clean_rows(&[
            "Wii Sports,Wii,2006,Sports,41.36,28.96,3.77,8.45,76,8,E",
            ",GB,1989,,23.2,2.26,4.22,0.58,,tbd,",
            "X,PS2,,Misc,0.1,0,0,0,,,",
        ])
        .unwrap();
        let twice = clean(once.to_raw_table(), &CleaningPolicy::default()).unwrap();
        assert_eq!(once, twice);
    }
}
