//! The full market analysis handed to presentation.
//!
//! [`MarketReport::build`] runs every aggregate and comparison of a study on
//! a prepared table. A hypothesis test that cannot run does not stop the
//! others: it is reported as [`TestOutcome::Skipped`] with its reason.

use chrono::{DateTime, Utc};
use ice_stats::correlation::pearson;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    aggregate::{self, Aggregate, GroupDistribution},
    comparison::{self, ComparisonResult, ComparisonSpec},
    config::{AnalysisConfig, CorrelationTarget, LegacyCutoff, Scope},
    dimension::{Dimension, GroupKey, Measure, Region},
    features::AnalysisTable,
    window::{LifetimeSummary, WindowError, YearWindow},
};

#[derive(Debug, Clone, Serialize)]
pub struct MarketReport {
    pub generated_at: DateTime<Utc>,
    /// Rows of the prepared table.
    pub rows: usize,
    /// Number of titles released per year, by year.
    pub releases_per_year: Aggregate<GroupKey>,
    /// Platforms with the largest total sales over all years.
    pub top_platforms: Aggregate<GroupKey>,
    /// Total sales of the top platforms per year, by year.
    pub top_platform_yearly_sales: Aggregate<GroupKey>,
    pub legacy_low_sellers: Aggregate<GroupKey>,
    pub lifetimes: LifetimeSummary,
    pub window: YearWindow,
    pub window_rows: usize,
    /// Platforms with the largest total sales inside the window.
    pub window_leaders: Aggregate<GroupKey>,
    pub trend: PlatformTrend,
    /// Total sales per title, per platform, inside the window.
    pub sales_distribution: Vec<GroupDistribution>,
    pub correlations: Vec<ScoreCorrelation>,
    /// Total sales per genre inside the window, largest first.
    pub genre_sales: Aggregate<GroupKey>,
    pub genre_share: Aggregate<GroupKey>,
    pub regions: Vec<RegionalProfile>,
    pub comparisons: Vec<TestOutcome>,
}

/// Direction of each platform's mean sales inside the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformTrend {
    /// Mean total sales per title, by platform name.
    pub mean_sales: Aggregate<GroupKey>,
    /// Relative change of the mean against the preceding platform.
    pub change: Aggregate<GroupKey>,
    pub growing: Vec<GroupKey>,
    pub declining: Vec<GroupKey>,
    /// Platforms selling inside the window that are also growing, largest
    /// sales first.
    pub profitable: Vec<GroupKey>,
}

/// How review scores relate to sales on one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCorrelation {
    pub platform: String,
    pub scope: Scope,
    /// Reviewed titles the correlation is computed over.
    pub titles: usize,
    /// `None` when there are too few titles or no variation.
    pub user_score: Option<f64>,
    pub critic_score: Option<f64>,
}

/// Sales profile of one region inside the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalProfile {
    pub region: Region,
    pub top_platforms: Aggregate<GroupKey>,
    /// Among titles that sold in the region.
    pub top_genres: Aggregate<GroupKey>,
    /// Regional sales per content rating, largest first.
    pub rating_sales: Aggregate<GroupKey>,
}

/// The outcome of one configured comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    Completed {
        label: String,
        spec: ComparisonSpec,
        result: ComparisonResult,
    },
    Skipped {
        label: String,
        reason: String,
    },
}

impl TestOutcome {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            TestOutcome::Completed { label, .. } | TestOutcome::Skipped { label, .. } => label,
        }
    }
}

impl MarketReport {
    /// Runs the whole study on `table`.
    ///
    /// # Errors
    ///
    /// Fails only when no window can be selected, i.e. the table is empty.
    pub fn build(table: &AnalysisTable, config: &AnalysisConfig) -> Result<Self, WindowError> {
        let selection = config.window.apply(table)?;
        let recent = &selection.table;
        let n = config.top_n;

        let top_platforms =
            aggregate::group_sum(table, Dimension::Platform, Measure::TotalSales).top_n(n);
        let window_platforms =
            aggregate::group_sum(recent, Dimension::Platform, Measure::TotalSales).sorted_by_value();
        let genre_sales =
            aggregate::group_sum(recent, Dimension::Genre, Measure::TotalSales).sorted_by_value();

        let report = Self {
            generated_at: Utc::now(),
            rows: table.len(),
            releases_per_year: aggregate::group_count(table, Dimension::Year).sorted_by_key(),
            top_platform_yearly_sales: yearly_sales_of(table, &top_platforms),
            top_platforms,
            legacy_low_sellers: legacy_low_sellers(table, &config.legacy),
            lifetimes: selection.lifetimes,
            window: selection.window,
            window_rows: recent.len(),
            trend: platform_trend(recent, &window_platforms, config.trend_threshold),
            window_leaders: window_platforms.top_n(n),
            sales_distribution: aggregate::group_distribution(
                recent,
                Dimension::Platform,
                Measure::TotalSales,
            ),
            correlations: config
                .correlations
                .iter()
                .map(|target| {
                    let scope_table = match target.scope {
                        Scope::Window => recent,
                        Scope::Full => table,
                    };
                    score_correlation(scope_table, target)
                })
                .collect(),
            genre_share: genre_sales.percentage_share(),
            genre_sales,
            regions: Region::MAJOR
                .into_iter()
                .map(|region| regional_profile(recent, region, n))
                .collect(),
            comparisons: run_comparisons(recent, &config.comparisons),
        };

        let completed = report
            .comparisons
            .iter()
            .filter(|c| matches!(c, TestOutcome::Completed { .. }))
            .count();
        info!(
            rows = report.rows,
            window_rows = report.window_rows,
            completed_tests = completed,
            skipped_tests = report.comparisons.len() - completed,
            "built market report"
        );
        Ok(report)
    }
}

/// Total sales per year of the platforms in `platforms`, by year.
fn yearly_sales_of(table: &AnalysisTable, platforms: &Aggregate<GroupKey>) -> Aggregate<GroupKey> {
    let selected = table.filter(|row| {
        let key = Dimension::Platform.key(row);
        platforms.keys().any(|k| *k == key)
    });
    aggregate::group_sum(&selected, Dimension::Year, Measure::TotalSales).sorted_by_key()
}

/// Platforms that released titles before the cut-off year but sold less
/// than the threshold in that period.
#[must_use]
pub fn legacy_low_sellers(table: &AnalysisTable, cutoff: &LegacyCutoff) -> Aggregate<GroupKey> {
    let early = table.filter(|row| row.game.year_of_release < cutoff.before_year);
    aggregate::group_sum(&early, Dimension::Platform, Measure::TotalSales)
        .sorted_by_key()
        .filter(|entry| entry.value < cutoff.max_total_sales)
}

/// Classifies platforms by the change of their mean sales.
///
/// Means are ordered by platform name and each is compared with the
/// preceding platform's mean. Growing platforms found in `sellers` are
/// reported as profitable, in the order of `sellers`.
#[must_use]
pub fn platform_trend(
    table: &AnalysisTable,
    sellers: &Aggregate<GroupKey>,
    threshold: f64,
) -> PlatformTrend {
    let mean_sales =
        aggregate::group_mean(table, Dimension::Platform, Measure::TotalSales).sorted_by_key();
    let change = mean_sales.pct_change();
    let keys_where = |keep: &dyn Fn(f64) -> bool| {
        change
            .entries()
            .iter()
            .filter(|e| keep(e.value))
            .map(|e| e.key.clone())
            .collect::<Vec<_>>()
    };
    let growing = keys_where(&|v| v > threshold);
    let declining = keys_where(&|v| v < -threshold);
    let profitable = sellers
        .keys()
        .filter(|k| growing.contains(k))
        .cloned()
        .collect();
    PlatformTrend {
        mean_sales,
        change,
        growing,
        declining,
        profitable,
    }
}

/// Pearson correlation of both scores with total sales on the target
/// platform, over reviewed titles.
#[must_use]
pub fn score_correlation(table: &AnalysisTable, target: &CorrelationTarget) -> ScoreCorrelation {
    let reviewed = table
        .filter(|row| row.game.platform == target.platform)
        .reviewed();
    let column = |measure: Measure| {
        reviewed
            .rows()
            .iter()
            .map(|row| measure.value(row))
            .collect::<Vec<_>>()
    };
    let sales = column(Measure::TotalSales);
    ScoreCorrelation {
        platform: target.platform.clone(),
        scope: target.scope,
        titles: reviewed.len(),
        user_score: pearson(&column(Measure::UserScore), &sales),
        critic_score: pearson(&column(Measure::CriticScore), &sales),
    }
}

/// Top platforms, top genres and sales per rating of one region.
#[must_use]
pub fn regional_profile(table: &AnalysisTable, region: Region, n: usize) -> RegionalProfile {
    let measure = region.measure();
    let sold = table.filter(|row| measure.value(row) > 0.0);
    RegionalProfile {
        region,
        top_platforms: aggregate::group_sum(table, Dimension::Platform, measure).top_n(n),
        top_genres: aggregate::group_sum(&sold, Dimension::Genre, measure).top_n(n),
        rating_sales: aggregate::group_sum(table, Dimension::Rating, measure).sorted_by_value(),
    }
}

/// Runs every comparison; failures become labeled skips.
#[must_use]
pub fn run_comparisons(table: &AnalysisTable, specs: &[ComparisonSpec]) -> Vec<TestOutcome> {
    specs
        .iter()
        .map(|spec| {
            let label = spec.label();
            match comparison::compare(table, spec) {
                Ok(result) => TestOutcome::Completed {
                    label,
                    spec: spec.clone(),
                    result,
                },
                Err(err) => {
                    warn!(%label, %err, "skipping comparison");
                    TestOutcome::Skipped {
                        label,
                        reason: err.to_string(),
                    }
                }
            }
        })
        .collect()
}
