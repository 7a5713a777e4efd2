//! A first look at a raw table: how much is missing, and a few random rows.

use rand::{Rng, seq::IndexedRandom as _};
use serde::Serialize;

use crate::table::{RawRow, RawTable};

/// Missing values of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub column: String,
    pub missing: usize,
    /// `missing` as a fraction of all rows (zero for an empty table).
    pub missing_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawProfile {
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
}

impl RawProfile {
    /// Counts missing cells per column. Short rows count as missing.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(table: &RawTable) -> Self {
        let rows = table.len();
        let columns = table
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let missing = table
                    .rows
                    .iter()
                    .filter(|row| row.cells.get(index).is_none_or(|c| c.is_missing()))
                    .count();
                let missing_ratio = if rows == 0 {
                    0.0
                } else {
                    missing as f64 / rows as f64
                };
                ColumnProfile {
                    column: column.clone(),
                    missing,
                    missing_ratio,
                }
            })
            .collect();
        Self { rows, columns }
    }
}

/// Up to `count` distinct rows chosen at random, in source order.
pub fn sample_rows<'a, R>(table: &'a RawTable, count: usize, rng: &mut R) -> Vec<&'a RawRow>
where
    R: Rng + ?Sized,
{
    let mut rows = table.rows.choose_multiple(rng, count).collect::<Vec<_>>();
    rows.sort_by_key(|row| row.line);
    rows
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::loader::{LoaderOptions, read_csv};

    fn raw() -> RawTable {
        let data = "Name,Platform,Year_of_Release,Genre,NA_sales,EU_sales,JP_sales,Other_sales,Critic_Score,User_Score,Rating\n\
                    A,PS4,2015,Action,1,0,0,0,,tbd,\n\
                    B,PS4,,Action,1,0,0,0,80,7,M\n\
                    C,PS4,2016,Action,1,0,0,0,,,E\n\
                    D,PS4,2014,Action,1,0,0,0,70,6,T\n";
        read_csv(data.as_bytes(), &LoaderOptions::default()).unwrap()
    }

    #[test]
    fn test_missing_ratios() {
        let profile = RawProfile::new(&raw());
        assert_eq!(profile.rows, 4);
        let ratio = |name: &str| {
            profile
                .columns
                .iter()
                .find(|c| c.column == name)
                .unwrap()
                .missing_ratio
        };
        assert_eq!(ratio("Name"), 0.0);
        assert_eq!(ratio("Year_of_Release"), 0.25);
        assert_eq!(ratio("Critic_Score"), 0.5);
        // "tbd" is a value, not a missing cell
        assert_eq!(ratio("User_Score"), 0.25);
        assert_eq!(ratio("Rating"), 0.25);
    }

    #[test]
    fn test_empty_table_profile() {
        let profile = RawProfile::new(&RawTable {
            columns: vec!["name".into()],
            rows: vec![],
        });
        assert_eq!(profile.columns[0].missing_ratio, 0.0);
    }

    #[test]
    fn test_sample_is_seeded_and_ordered() {
        let table = raw();
        let first = sample_rows(&table, 2, &mut Pcg32::seed_from_u64(7));
        let second = sample_rows(&table, 2, &mut Pcg32::seed_from_u64(7));
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert!(first[0].line < first[1].line);
        assert_eq!(sample_rows(&table, 10, &mut Pcg32::seed_from_u64(1)).len(), 4);
    }
}
