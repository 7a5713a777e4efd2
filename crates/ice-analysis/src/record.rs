//! Typed game records produced by the cleaner.

use crate::table::{Cell, Column, RawRow, RawTable};

/// A review score.
///
/// Sources encode "not evaluated" with the out-of-domain literal
/// [`Score::SENTINEL`]. Inside the pipeline that case is its own variant; the
/// literal only reappears at numeric and export boundaries
/// ([`Score::encoded`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Rated(f64),
    NotEvaluated,
}

impl Score {
    /// Literal that marks a score as not evaluated in sources and exports.
    pub const SENTINEL: f64 = 999.0;

    /// The rated value, if any.
    #[must_use]
    pub fn rated(self) -> Option<f64> {
        match self {
            Score::Rated(value) => Some(value),
            Score::NotEvaluated => None,
        }
    }

    #[must_use]
    pub fn is_evaluated(self) -> bool {
        matches!(self, Score::Rated(_))
    }

    /// The score as a plain number, with [`Score::SENTINEL`] for "not evaluated".
    ///
    /// ```
    /// use ice_analysis::record::Score;
    ///
    /// assert_eq!(Score::Rated(7.5).encoded(), 7.5);
    /// assert_eq!(Score::NotEvaluated.encoded(), 999.0);
    /// ```
    #[must_use]
    pub fn encoded(self) -> f64 {
        self.rated().unwrap_or(Self::SENTINEL)
    }
}

/// Sales in millions of units, per region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegionalSales {
    pub na: f64,
    pub eu: f64,
    pub jp: f64,
    pub other: f64,
}

impl RegionalSales {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.na + self.eu + self.jp + self.other
    }
}

/// One released title on one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub name: String,
    pub platform: String,
    pub year_of_release: i32,
    pub genre: String,
    pub sales: RegionalSales,
    pub critic_score: Score,
    pub user_score: Score,
    pub rating: String,
}

impl GameRecord {
    /// Whether both the critic and the user score are evaluated.
    #[must_use]
    pub fn is_reviewed(&self) -> bool {
        self.critic_score.is_evaluated() && self.user_score.is_evaluated()
    }

    fn cell(&self, column: Column) -> Cell {
        match column {
            Column::Name => Cell::Text(self.name.clone()),
            Column::Platform => Cell::Text(self.platform.clone()),
            Column::YearOfRelease => Cell::number(f64::from(self.year_of_release)),
            Column::Genre => Cell::Text(self.genre.clone()),
            Column::NaSales => Cell::number(self.sales.na),
            Column::EuSales => Cell::number(self.sales.eu),
            Column::JpSales => Cell::number(self.sales.jp),
            Column::OtherSales => Cell::number(self.sales.other),
            Column::CriticScore => Cell::number(self.critic_score.encoded()),
            Column::UserScore => Cell::number(self.user_score.encoded()),
            Column::Rating => Cell::Text(self.rating.clone()),
        }
    }
}

/// The cleaned table: every row typed and valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameTable {
    pub records: Vec<GameRecord>,
}

impl GameTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Re-encodes the table in raw form, with canonical column names and the
    /// score sentinel, so it can be exported or cleaned again.
    #[must_use]
    pub fn to_raw_table(&self) -> RawTable {
        let columns = Column::ALL.iter().map(|c| c.name().to_owned()).collect();
        let rows = self
            .records
            .iter()
            .zip(2..)
            .map(|(record, line)| RawRow {
                line,
                cells: Column::ALL.iter().map(|c| record.cell(*c)).collect(),
            })
            .collect();
        RawTable { columns, rows }
    }
}
