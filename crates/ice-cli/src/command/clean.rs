//! Cleaning command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use ice_analysis::pipeline;
use tracing::info;

use crate::{command::SourceArg, util, util::Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct CleanArg {
    #[clap(flatten)]
    pub source: SourceArg,

    /// Where to write the cleaned table (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CleanArg) -> anyhow::Result<()> {
    let config = util::load_config(arg.source.config.as_deref())?;
    let table = pipeline::load_and_prepare(&arg.source.data, &config)
        .with_context(|| format!("Failed to prepare {}", arg.source.data.display()))?;

    let destination = arg
        .output
        .as_ref()
        .map_or_else(|| "stdout".to_owned(), |p| p.display().to_string());
    Output::save_csv(&table, arg.output.clone())?;
    info!(rows = table.len(), %destination, "wrote cleaned table");
    Ok(())
}
