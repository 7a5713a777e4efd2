//! Single hypothesis test command

use anyhow::Context;
use clap::Args;
use ice_analysis::{
    comparison::{self, ComparisonSpec},
    dimension::{Dimension, Measure},
    pipeline,
};

use crate::{command::SourceArg, util, view};

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareArg {
    #[clap(flatten)]
    pub source: SourceArg,

    /// Dimension that defines the two groups (name, platform, year, genre, rating)
    #[arg(long)]
    pub by: Dimension,

    /// Value of the first group
    pub group_a: String,

    /// Value of the second group
    pub group_b: String,

    /// Measure to compare
    #[arg(long, default_value = "user_score")]
    pub measure: Measure,

    /// Only use titles whose critic and user scores are both evaluated
    #[arg(long)]
    pub reviewed_only: bool,

    /// Significance level (0.05 when omitted)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Use every year instead of the recent analysis window
    #[arg(long)]
    pub full_range: bool,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let config = util::load_config(arg.source.config.as_deref())?;
    let table = pipeline::load_and_prepare(&arg.source.data, &config)
        .with_context(|| format!("Failed to prepare {}", arg.source.data.display()))?;

    let table = if arg.full_range {
        table
    } else {
        let selection = config
            .window
            .apply(&table)
            .context("Failed to select analysis window")?;
        println!(
            "Analysis Window: {}-{} ({} titles)",
            selection.window.start,
            selection.window.end,
            selection.table.len()
        );
        selection.table
    };

    let mut spec = ComparisonSpec::new(arg.by, &arg.group_a, &arg.group_b);
    spec.measure = arg.measure;
    spec.reviewed_only = arg.reviewed_only;
    if let Some(alpha) = arg.alpha {
        anyhow::ensure!(
            alpha > 0.0 && alpha < 1.0,
            "Significance level must be in (0, 1), got {alpha}"
        );
        spec.alpha = alpha;
    }

    let result = comparison::compare(&table, &spec)
        .with_context(|| format!("Comparison failed: {}", spec.label()))?;
    view::print_comparison(&spec, &result);
    Ok(())
}
