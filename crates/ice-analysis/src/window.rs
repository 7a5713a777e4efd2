//! Platform lifetimes and the recent analysis window.
//!
//! The window length is a policy constant. The lifetime statistics are
//! reported next to it so the choice can be judged, but they do not move the
//! window.

use std::collections::{BTreeMap, BTreeSet};

use ice_stats::descriptive;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::features::AnalysisTable;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum WindowError {
    #[display("cannot select a window from an empty table")]
    EmptyTable,
}

/// Release span of a single platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformLifetime {
    pub platform: String,
    pub first_year: i32,
    pub last_year: i32,
}

impl PlatformLifetime {
    /// Years between the first and the last release.
    #[must_use]
    pub fn lifetime(&self) -> i32 {
        self.last_year - self.first_year
    }
}

/// Lifetimes of every platform and their central tendency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifetimeSummary {
    pub platforms: Vec<PlatformLifetime>,
    pub mean: f64,
    pub median: f64,
}

/// An inclusive range of release years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearWindow {
    pub start: i32,
    pub end: i32,
}

impl YearWindow {
    #[must_use]
    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

/// How the window is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowPolicy {
    /// Number of most recent distinct release years to keep.
    pub recent_years: usize,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self { recent_years: 5 }
    }
}

/// The outcome of [`WindowPolicy::apply`].
#[derive(Debug, Clone)]
pub struct WindowSelection {
    pub lifetimes: LifetimeSummary,
    pub window: YearWindow,
    /// Rows released inside the window.
    pub table: AnalysisTable,
}

/// Lifetime of every platform, ordered by platform name.
///
/// Returns `None` for an empty table.
#[must_use]
pub fn platform_lifetimes(table: &AnalysisTable) -> Option<LifetimeSummary> {
    let mut spans = BTreeMap::<&str, (i32, i32)>::new();
    for row in table.rows() {
        let year = row.game.year_of_release;
        spans
            .entry(&row.game.platform)
            .and_modify(|(first, last)| {
                *first = (*first).min(year);
                *last = (*last).max(year);
            })
            .or_insert((year, year));
    }

    let platforms = spans
        .into_iter()
        .map(|(platform, (first_year, last_year))| PlatformLifetime {
            platform: platform.to_owned(),
            first_year,
            last_year,
        })
        .collect::<Vec<_>>();
    let lifetimes = platforms
        .iter()
        .map(|p| f64::from(p.lifetime()))
        .collect::<Vec<_>>();
    Some(LifetimeSummary {
        mean: descriptive::mean(&lifetimes)?,
        median: descriptive::median(&lifetimes)?,
        platforms,
    })
}

impl WindowPolicy {
    /// The most recent `recent_years` distinct release years present in
    /// `table`. Years missing from the data do not count.
    ///
    /// ```
    /// use ice_analysis::window::{WindowPolicy, YearWindow};
    /// # use ice_analysis::{features::derive_features, record::*};
    /// # let game = |year| GameRecord {
    /// #     name: "x".into(), platform: "PS4".into(), year_of_release: year,
    /// #     genre: "Action".into(), sales: RegionalSales::default(),
    /// #     critic_score: Score::NotEvaluated, user_score: Score::NotEvaluated,
    /// #     rating: "E".into(),
    /// # };
    /// # let table = derive_features(GameTable {
    /// #     records: [2001, 2010, 2012, 2013, 2014, 2016].into_iter().map(game).collect(),
    /// # });
    /// let window = WindowPolicy::default().select_window(&table).unwrap();
    /// assert_eq!(window, YearWindow { start: 2010, end: 2016 });
    /// ```
    pub fn select_window(&self, table: &AnalysisTable) -> Result<YearWindow, WindowError> {
        let years = table
            .rows()
            .iter()
            .map(|row| row.game.year_of_release)
            .collect::<BTreeSet<_>>();
        let end = *years.last().ok_or(WindowError::EmptyTable)?;
        let start = *years
            .iter()
            .rev()
            .take(self.recent_years.max(1))
            .last()
            .ok_or(WindowError::EmptyTable)?;
        Ok(YearWindow { start, end })
    }

    /// Computes lifetimes, selects the window and keeps only rows inside it.
    pub fn apply(&self, table: &AnalysisTable) -> Result<WindowSelection, WindowError> {
        let lifetimes = platform_lifetimes(table).ok_or(WindowError::EmptyTable)?;
        let window = self.select_window(table)?;
        debug!(
            mean_lifetime = lifetimes.mean,
            median_lifetime = lifetimes.median,
            "platform lifetimes"
        );

        let windowed = table.filter(|row| window.contains(row.game.year_of_release));
        info!(
            start = window.start,
            end = window.end,
            rows = windowed.len(),
            "selected analysis window"
        );
        Ok(WindowSelection {
            lifetimes,
            window,
            table: windowed,
        })
    }
}
