//! Raw data profile command

use anyhow::Context;
use clap::Args;
use ice_analysis::{
    loader,
    profile::{self, RawProfile},
};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::{command::SourceArg, util, view};

#[derive(Debug, Clone, Args)]
pub(crate) struct InspectArg {
    #[clap(flatten)]
    pub source: SourceArg,

    /// Number of random rows to show
    #[arg(long, default_value_t = 5)]
    pub sample: usize,

    /// Seed for the row sample (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let config = util::load_config(arg.source.config.as_deref())?;
    let raw = loader::load_csv(&arg.source.data, &config.loader)
        .with_context(|| format!("Failed to load {}", arg.source.data.display()))?;

    println!("Raw Data Profile: {}", arg.source.data.display());
    println!("==========================================\n");

    let profile = RawProfile::new(&raw);
    view::print_profile(&profile);
    println!();

    let mut rng = match arg.seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_os_rng(),
    };
    let rows = profile::sample_rows(&raw, arg.sample, &mut rng);
    println!("Sample Rows ({} of {}):", rows.len(), raw.len());
    view::print_raw_rows(&raw.columns, &rows);

    Ok(())
}
