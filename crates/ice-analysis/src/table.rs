//! Raw tabular data as read from a source.
//!
//! A [`RawTable`] keeps the header exactly as authored and every cell in its
//! most natural parsed form ([`Cell`]). Nothing is typed against the game
//! schema yet; that happens in [`cleaning`](crate::cleaning).

use std::fmt;

use serde::{Deserialize, Serialize};

/// The columns every data source must provide.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Name,
    Platform,
    YearOfRelease,
    Genre,
    NaSales,
    EuSales,
    JpSales,
    OtherSales,
    CriticScore,
    UserScore,
    Rating,
}

impl Column {
    /// All columns, in the canonical header order.
    pub const ALL: [Column; 11] = [
        Column::Name,
        Column::Platform,
        Column::YearOfRelease,
        Column::Genre,
        Column::NaSales,
        Column::EuSales,
        Column::JpSales,
        Column::OtherSales,
        Column::CriticScore,
        Column::UserScore,
        Column::Rating,
    ];

    /// Canonical (lower-case) header name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Platform => "platform",
            Column::YearOfRelease => "year_of_release",
            Column::Genre => "genre",
            Column::NaSales => "na_sales",
            Column::EuSales => "eu_sales",
            Column::JpSales => "jp_sales",
            Column::OtherSales => "other_sales",
            Column::CriticScore => "critic_score",
            Column::UserScore => "user_score",
            Column::Rating => "rating",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name(), f)
    }
}

/// A single untyped cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Empty field or a recognized missing-value marker.
    Missing,
    /// Anything that is not a finite number.
    Text(String),
    /// A finite number, along with the text it was parsed from.
    Number { value: f64, raw: String },
}

impl Cell {
    /// Parses an already-trimmed field.
    ///
    /// ```
    /// use ice_analysis::table::Cell;
    ///
    /// let markers = vec![String::new(), "NaN".to_owned()];
    /// assert_eq!(Cell::parse("", &markers), Cell::Missing);
    /// assert_eq!(Cell::parse("NaN", &markers), Cell::Missing);
    /// assert_eq!(Cell::parse("tbd", &markers), Cell::Text("tbd".to_owned()));
    /// assert!(matches!(Cell::parse("8.2", &markers), Cell::Number { value, .. } if value == 8.2));
    /// ```
    #[must_use]
    pub fn parse(field: &str, missing_markers: &[String]) -> Self {
        if field.is_empty() || missing_markers.iter().any(|m| m == field) {
            return Cell::Missing;
        }
        match field.parse::<f64>() {
            Ok(value) if value.is_finite() => Cell::Number {
                value,
                raw: field.to_owned(),
            },
            _ => Cell::Text(field.to_owned()),
        }
    }

    /// A number cell whose raw text is the shortest round-trip form of `value`.
    #[must_use]
    pub fn number(value: f64) -> Self {
        Cell::Number {
            value,
            raw: value.to_string(),
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// The authored text of a non-missing cell.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Missing => None,
            Cell::Text(text) | Cell::Number { raw: text, .. } => Some(text),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text().unwrap_or(""))
    }
}

/// One source record.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line in the source (the header is line 1).
    pub line: u64,
    pub cells: Vec<Cell>,
}

/// An untyped table with the header as authored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Position of the column named exactly `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
