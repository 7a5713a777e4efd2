//! Derived columns and the analytical table.

use std::ops::RangeInclusive;

use tracing::info;

use crate::record::{GameRecord, GameTable};

/// A cleaned record together with its derived columns.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRow {
    pub game: GameRecord,
    total_sales: f64,
}

impl AnalysisRow {
    #[must_use]
    pub fn new(game: GameRecord) -> Self {
        let total_sales = game.sales.total();
        Self { game, total_sales }
    }

    /// Sum of the four regional sales figures.
    #[must_use]
    pub fn total_sales(&self) -> f64 {
        self.total_sales
    }
}

/// The table every analysis reads from.
///
/// Once derived it is never modified; filtering produces a new table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisTable {
    rows: Vec<AnalysisRow>,
}

impl AnalysisTable {
    #[must_use]
    pub fn rows(&self) -> &[AnalysisRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A new table with the rows for which `predicate` holds.
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&AnalysisRow) -> bool,
    {
        let rows = self.rows.iter().filter(|row| predicate(row)).cloned().collect();
        Self { rows }
    }

    /// Rows whose critic and user scores are both evaluated.
    #[must_use]
    pub fn reviewed(&self) -> Self {
        self.filter(|row| row.game.is_reviewed())
    }

    /// First and last release year, if the table is not empty.
    #[must_use]
    pub fn year_range(&self) -> Option<RangeInclusive<i32>> {
        let years = self.rows.iter().map(|row| row.game.year_of_release);
        let min = years.clone().min()?;
        let max = years.max()?;
        Some(min..=max)
    }
}

impl FromIterator<AnalysisRow> for AnalysisTable {
    fn from_iter<I: IntoIterator<Item = AnalysisRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Adds `total_sales` to every record.
#[must_use]
pub fn derive_features(table: GameTable) -> AnalysisTable {
    let table = table
        .records
        .into_iter()
        .map(AnalysisRow::new)
        .collect::<AnalysisTable>();
    info!(rows = table.len(), "derived features");
    table
}
