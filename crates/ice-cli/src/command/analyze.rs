//! Full market analysis command
//!
//! Prints every aggregate of the market report as a table, and optionally
//! saves the whole report as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use ice_analysis::{pipeline, report::MarketReport};

use crate::{command::SourceArg, util, util::Output, view};

#[derive(Debug, Clone, Args)]
pub(crate) struct AnalyzeArg {
    #[clap(flatten)]
    pub source: SourceArg,

    /// Save the report as JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let config = util::load_config(arg.source.config.as_deref())?;
    let table = pipeline::load_and_prepare(&arg.source.data, &config)
        .with_context(|| format!("Failed to prepare {}", arg.source.data.display()))?;
    let report = MarketReport::build(&table, &config).context("Failed to build report")?;

    println!("Market Analysis Report ({} titles)", report.rows);
    println!("==========================================\n");

    view::print_aggregate("Releases per Year", "Year", "Titles", &report.releases_per_year, 0);
    println!();
    view::print_aggregate(
        "Top Platforms (total sales, all years)",
        "Platform",
        "Sales",
        &report.top_platforms,
        2,
    );
    println!();
    view::print_aggregate(
        "Yearly Sales of Top Platforms",
        "Year",
        "Sales",
        &report.top_platform_yearly_sales,
        2,
    );
    println!();
    view::print_aggregate(
        &format!(
            "Legacy Platforms (before {}, under {:.1}M)",
            config.legacy.before_year, config.legacy.max_total_sales
        ),
        "Platform",
        "Sales",
        &report.legacy_low_sellers,
        2,
    );
    println!();

    view::print_lifetimes(&report.lifetimes);
    println!();
    println!(
        "Analysis Window: {}-{} ({} titles)",
        report.window.start, report.window.end, report.window_rows
    );
    println!();

    view::print_aggregate(
        "Window Leaders (total sales)",
        "Platform",
        "Sales",
        &report.window_leaders,
        2,
    );
    println!();
    view::print_trend(&report.trend, config.trend_threshold);
    println!();
    view::print_distributions("Sales per Title by Platform", &report.sales_distribution);
    println!();
    view::print_correlations(&report.correlations);
    println!();
    view::print_shares("Sales by Genre", "Genre", &report.genre_sales, &report.genre_share);
    println!();

    for profile in &report.regions {
        view::print_regional_profile(profile);
        println!();
    }

    println!("Hypothesis Tests:");
    for outcome in &report.comparisons {
        view::print_outcome(outcome);
    }

    if let Some(path) = &arg.output {
        Output::save_json(&report, Some(path.clone()))?;
        println!("\nReport saved to: {}", path.display());
    }

    Ok(())
}
