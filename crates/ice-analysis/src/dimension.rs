//! Grouping dimensions and numeric measures over an [`AnalysisTable`].
//!
//! [`AnalysisTable`]: crate::features::AnalysisTable

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::features::AnalysisRow;

/// A categorical column rows can be grouped or filtered by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Name,
    Platform,
    Year,
    Genre,
    Rating,
}

impl Dimension {
    /// The group key of `row` along this dimension.
    #[must_use]
    pub fn key(self, row: &AnalysisRow) -> GroupKey {
        let game = &row.game;
        match self {
            Dimension::Name => GroupKey::Text(game.name.clone()),
            Dimension::Platform => GroupKey::Text(game.platform.clone()),
            Dimension::Year => GroupKey::Year(game.year_of_release),
            Dimension::Genre => GroupKey::Text(game.genre.clone()),
            Dimension::Rating => GroupKey::Text(game.rating.clone()),
        }
    }

    /// Whether `row`'s value along this dimension is `value`.
    ///
    /// Years are compared numerically, everything else as text.
    #[must_use]
    pub fn matches(self, row: &AnalysisRow, value: &str) -> bool {
        match self.key(row) {
            GroupKey::Year(year) => value.trim().parse::<i32>().is_ok_and(|v| v == year),
            GroupKey::Text(text) => text == value,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Name => "name",
            Dimension::Platform => "platform",
            Dimension::Year => "year",
            Dimension::Genre => "genre",
            Dimension::Rating => "rating",
        };
        f.write_str(name)
    }
}

/// A group key. Years sort numerically, text lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupKey {
    Year(i32),
    Text(String),
}

impl GroupKey {
    #[must_use]
    pub fn as_year(&self) -> Option<i32> {
        match self {
            GroupKey::Year(year) => Some(*year),
            GroupKey::Text(_) => None,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Year(year) => fmt::Display::fmt(year, f),
            GroupKey::Text(text) => fmt::Display::fmt(text, f),
        }
    }
}

impl From<&str> for GroupKey {
    fn from(text: &str) -> Self {
        GroupKey::Text(text.to_owned())
    }
}

impl From<i32> for GroupKey {
    fn from(year: i32) -> Self {
        GroupKey::Year(year)
    }
}

/// A numeric column that can be summarized.
///
/// Scores are read in their encoded form, so titles that were not evaluated
/// contribute [`Score::SENTINEL`](crate::record::Score::SENTINEL). Restrict
/// the table with [`AnalysisTable::reviewed`](crate::features::AnalysisTable::reviewed)
/// to summarize evaluated scores only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    NaSales,
    EuSales,
    JpSales,
    OtherSales,
    TotalSales,
    CriticScore,
    UserScore,
    Year,
}

impl Measure {
    pub const ALL: [Measure; 8] = [
        Measure::NaSales,
        Measure::EuSales,
        Measure::JpSales,
        Measure::OtherSales,
        Measure::TotalSales,
        Measure::CriticScore,
        Measure::UserScore,
        Measure::Year,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Measure::NaSales => "na_sales",
            Measure::EuSales => "eu_sales",
            Measure::JpSales => "jp_sales",
            Measure::OtherSales => "other_sales",
            Measure::TotalSales => "total_sales",
            Measure::CriticScore => "critic_score",
            Measure::UserScore => "user_score",
            Measure::Year => "year_of_release",
        }
    }

    #[must_use]
    pub fn value(self, row: &AnalysisRow) -> f64 {
        let game = &row.game;
        match self {
            Measure::NaSales => game.sales.na,
            Measure::EuSales => game.sales.eu,
            Measure::JpSales => game.sales.jp,
            Measure::OtherSales => game.sales.other,
            Measure::TotalSales => row.total_sales(),
            Measure::CriticScore => game.critic_score.encoded(),
            Measure::UserScore => game.user_score.encoded(),
            Measure::Year => f64::from(game.year_of_release),
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown measure {name:?}")]
pub struct ParseMeasureError {
    name: String,
}

impl FromStr for Measure {
    type Err = ParseMeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measure::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s) || (*m == Measure::Year && s == "year"))
            .ok_or_else(|| ParseMeasureError { name: s.to_owned() })
    }
}

/// A sales region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "na")]
    NorthAmerica,
    #[serde(rename = "eu")]
    Europe,
    #[serde(rename = "jp")]
    Japan,
    #[serde(rename = "other")]
    Other,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::NorthAmerica,
        Region::Europe,
        Region::Japan,
        Region::Other,
    ];

    /// The regions profiled individually.
    pub const MAJOR: [Region; 3] = [Region::NorthAmerica, Region::Europe, Region::Japan];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Region::NorthAmerica => "na",
            Region::Europe => "eu",
            Region::Japan => "jp",
            Region::Other => "other",
        }
    }

    /// The sales measure of this region.
    #[must_use]
    pub const fn measure(self) -> Measure {
        match self {
            Region::NorthAmerica => Measure::NaSales,
            Region::Europe => Measure::EuSales,
            Region::Japan => Measure::JpSales,
            Region::Other => Measure::OtherSales,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        features::tests::{game, table},
        record::Score,
    };

    #[test]
    fn test_parse_dimension_and_measure() {
        assert_eq!("platform".parse::<Dimension>().unwrap(), Dimension::Platform);
        assert_eq!("Genre".parse::<Dimension>().unwrap(), Dimension::Genre);
        assert!("region".parse::<Dimension>().is_err());

        assert_eq!("user_score".parse::<Measure>().unwrap(), Measure::UserScore);
        assert_eq!("year".parse::<Measure>().unwrap(), Measure::Year);
        assert!("sales".parse::<Measure>().is_err());
    }

    #[test]
    fn test_keys_and_matching() {
        let table = table(vec![game("A", "PS4", 2015, "Action", 1.0)]);
        let row = &table.rows()[0];
        assert_eq!(Dimension::Year.key(row), GroupKey::Year(2015));
        assert_eq!(Dimension::Platform.key(row), GroupKey::from("PS4"));
        assert!(Dimension::Year.matches(row, "2015"));
        assert!(!Dimension::Platform.matches(row, "ps4"));
    }

    #[test]
    fn test_score_measure_is_sentinel_encoded() {
        let mut record = game("A", "PS4", 2015, "Action", 1.0);
        record.user_score = Score::NotEvaluated;
        let table = table(vec![record]);
        let row = &table.rows()[0];
        assert!((Measure::UserScore.value(row) - Score::SENTINEL).abs() < f64::EPSILON);
        assert!((Measure::CriticScore.value(row) - 70.0).abs() < f64::EPSILON);
        assert!((Region::Japan.measure().value(row)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_group_key_order() {
        let mut keys = vec![GroupKey::Year(2016), GroupKey::Year(2001), GroupKey::Year(1999)];
        keys.sort();
        assert_eq!(keys, [GroupKey::Year(1999), GroupKey::Year(2001), GroupKey::Year(2016)]);
        assert!(GroupKey::from("DS") < GroupKey::from("PS4"));
    }
}
