//! Text table display
//!
//! Every command prints its results through these functions so that tables
//! share one layout: a title line, a header, a separator and right-aligned
//! numbers.

use std::fmt::Display;

use ice_analysis::{
    aggregate::{Aggregate, GroupDistribution},
    comparison::{ComparisonResult, ComparisonSpec},
    dimension::GroupKey,
    profile::RawProfile,
    report::{PlatformTrend, RegionalProfile, ScoreCorrelation, TestOutcome},
    table::RawRow,
    window::LifetimeSummary,
};
use ice_stats::descriptive::DescriptiveStats;

fn format_optional(value: Option<f64>, precision: usize) -> String {
    value.map_or("N/A".to_string(), |v| format!("{v:.precision$}"))
}

fn join_keys(keys: &[GroupKey]) -> String {
    if keys.is_empty() {
        return "(none)".to_string();
    }
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn print_profile(profile: &RawProfile) {
    println!("Missing Values ({} rows):", profile.rows);
    println!("  {:<20} {:>8} {:>10}", "Column", "Missing", "Missing%");
    println!("  {}", "-".repeat(40));
    for column in &profile.columns {
        println!(
            "  {:<20} {:>8} {:>9.1}%",
            column.column,
            column.missing,
            100.0 * column.missing_ratio,
        );
    }
}

pub(crate) fn print_raw_rows(columns: &[String], rows: &[&RawRow]) {
    println!("  {:>6}  {}", "Line", columns.join(" | "));
    println!("  {}", "-".repeat(80));
    for row in rows {
        let cells = row
            .cells
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        println!("  {:>6}  {}", row.line, cells.join(" | "));
    }
}

/// Print an aggregate as a two-column table
///
/// # Arguments
/// * `title` - Table title
/// * `label_col` - Name of the key column
/// * `value_col` - Name of the value column
/// * `precision` - Decimal places of the values
pub(crate) fn print_aggregate<K>(
    title: &str,
    label_col: &str,
    value_col: &str,
    aggregate: &Aggregate<K>,
    precision: usize,
) where
    K: Display,
{
    println!("{title}:");
    if aggregate.is_empty() {
        println!("  (none)");
        return;
    }
    println!("  {label_col:<20} {value_col:>12}");
    println!("  {}", "-".repeat(33));
    for entry in aggregate.entries() {
        println!(
            "  {:<20} {:>12.precision$}",
            entry.key.to_string(),
            entry.value
        );
    }
}

pub(crate) fn print_shares(
    title: &str,
    label_col: &str,
    values: &Aggregate<GroupKey>,
    shares: &Aggregate<GroupKey>,
) {
    println!("{title}:");
    println!("  {:<20} {:>12} {:>8}", label_col, "Sales", "Share");
    println!("  {}", "-".repeat(42));
    for entry in values.entries() {
        let share = shares.get(&entry.key).unwrap_or(0.0);
        println!(
            "  {:<20} {:>12.2} {:>7.1}%",
            entry.key.to_string(),
            entry.value,
            100.0 * share
        );
    }
}

pub(crate) fn print_lifetimes(summary: &LifetimeSummary) {
    println!("Platform Lifetimes:");
    println!("  {:<20} {:>6} {:>6} {:>9}", "Platform", "First", "Last", "Lifetime");
    println!("  {}", "-".repeat(44));
    for platform in &summary.platforms {
        println!(
            "  {:<20} {:>6} {:>6} {:>9}",
            platform.platform,
            platform.first_year,
            platform.last_year,
            platform.lifetime()
        );
    }
    println!(
        "  Mean lifetime: {:.2} years, median lifetime: {:.1} years",
        summary.mean, summary.median
    );
}

pub(crate) fn print_trend(trend: &PlatformTrend, threshold: f64) {
    println!("Platform Trend (mean sales per title):");
    println!("  {:<20} {:>10} {:>10}", "Platform", "Mean", "Change");
    println!("  {}", "-".repeat(42));
    for entry in trend.mean_sales.entries() {
        let change = trend.change.get(&entry.key).map(|c| 100.0 * c);
        println!(
            "  {:<20} {:>10.3} {:>9}%",
            entry.key.to_string(),
            entry.value,
            format_optional(change, 1)
        );
    }
    let threshold = 100.0 * threshold;
    println!("  Growing (> +{threshold:.0}%)   : {}", join_keys(&trend.growing));
    println!("  Declining (< -{threshold:.0}%) : {}", join_keys(&trend.declining));
    println!("  Potentially profitable : {}", join_keys(&trend.profitable));
}

fn print_stats_row(label: &str, stats: &DescriptiveStats) {
    println!(
        "  {:<20} {:>6} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
        label, stats.count, stats.min, stats.q1, stats.median, stats.q3, stats.max, stats.mean,
    );
}

pub(crate) fn print_distributions(title: &str, distributions: &[GroupDistribution]) {
    println!("{title}:");
    println!(
        "  {:<20} {:>6} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Group", "Count", "Min", "Q1", "Median", "Q3", "Max", "Mean"
    );
    println!("  {}", "-".repeat(83));
    for distribution in distributions {
        print_stats_row(&distribution.key.to_string(), &distribution.stats);
    }
}

pub(crate) fn print_correlations(correlations: &[ScoreCorrelation]) {
    println!("Score/Sales Correlation (reviewed titles):");
    println!(
        "  {:<12} {:>8} {:>8} {:>12} {:>12}",
        "Platform", "Scope", "Titles", "User Score", "Critic Score"
    );
    println!("  {}", "-".repeat(56));
    for correlation in correlations {
        let scope = match correlation.scope {
            ice_analysis::config::Scope::Window => "window",
            ice_analysis::config::Scope::Full => "full",
        };
        println!(
            "  {:<12} {:>8} {:>8} {:>12} {:>12}",
            correlation.platform,
            scope,
            correlation.titles,
            format_optional(correlation.user_score, 3),
            format_optional(correlation.critic_score, 3),
        );
    }
}

pub(crate) fn print_regional_profile(profile: &RegionalProfile) {
    let region = profile.region.code().to_uppercase();
    print_aggregate(
        &format!("{region} Top Platforms"),
        "Platform",
        "Sales",
        &profile.top_platforms,
        2,
    );
    print_aggregate(
        &format!("{region} Top Genres"),
        "Genre",
        "Sales",
        &profile.top_genres,
        2,
    );
    print_aggregate(
        &format!("{region} Sales by Rating"),
        "Rating",
        "Sales",
        &profile.rating_sales,
        2,
    );
}

pub(crate) fn print_outcome(outcome: &TestOutcome) {
    match outcome {
        TestOutcome::Completed { spec, result, .. } => print_comparison(spec, result),
        TestOutcome::Skipped { label, reason } => {
            println!("  {label}");
            println!("    SKIPPED: {reason}");
        }
    }
}

pub(crate) fn print_comparison(spec: &ComparisonSpec, result: &ComparisonResult) {
    let variances = if result.equal_variance {
        "equal"
    } else {
        "different"
    };
    let decision = if result.reject_null {
        "reject the null hypothesis (means differ)"
    } else {
        "fail to reject the null hypothesis"
    };
    println!("  {}", spec.label());
    println!(
        "    {:<10} n={:<6} mean={:.3}",
        spec.group_a, result.size_a, result.mean_a
    );
    println!(
        "    {:<10} n={:<6} mean={:.3}",
        spec.group_b, result.size_b, result.mean_b
    );
    println!(
        "    Bartlett: statistic={:.4}, p-value={:.4} -> variances {variances}",
        result.bartlett.statistic, result.bartlett.p_value
    );
    println!(
        "    Welch:    t={:.4}, df={:.1}, p-value={:.4} (alpha={})",
        result.statistic, result.df, result.p_value, spec.alpha
    );
    println!("    Decision: {decision}");
}
