use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use self::{analyze::AnalyzeArg, clean::CleanArg, compare::CompareArg, inspect::InspectArg};

mod analyze;
mod clean;
mod compare;
mod inspect;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Profile the raw data: missing values and a random sample of rows
    Inspect(#[clap(flatten)] InspectArg),
    /// Clean the data and write the analytical table as CSV
    Clean(#[clap(flatten)] CleanArg),
    /// Run the full market analysis
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Compare a measure between two groups with Bartlett's and Welch's tests
    Compare(#[clap(flatten)] CompareArg),
}

/// Options shared by every command that reads a data source
#[derive(Debug, Clone, Args)]
pub(crate) struct SourceArg {
    /// Path to the games CSV file
    pub data: PathBuf,

    /// Analysis configuration JSON file (defaults are used when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Inspect(arg) => inspect::run(&arg)?,
        Mode::Clean(arg) => clean::run(&arg)?,
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::Compare(arg) => compare::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;
    use ice_analysis::dimension::Dimension;

    use super::*;

    fn parse(args: &[&str]) -> Mode {
        CommandArgs::try_parse_from(std::iter::once("ice").chain(args.iter().copied()))
            .unwrap()
            .mode
    }

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_compare() {
        let Mode::Compare(arg) = parse(&[
            "compare",
            "games.csv",
            "--by",
            "genre",
            "Action",
            "Sports",
            "--reviewed-only",
            "--alpha",
            "0.01",
        ]) else {
            panic!("expected compare");
        };
        assert_eq!(arg.by, Dimension::Genre);
        assert_eq!((arg.group_a.as_str(), arg.group_b.as_str()), ("Action", "Sports"));
        assert!(arg.reviewed_only);
        assert!(!arg.full_range);
        assert_eq!(arg.alpha, Some(0.01));
        assert_eq!(arg.source.data, PathBuf::from("games.csv"));
    }

    #[test]
    fn test_parse_inspect_and_analyze() {
        let Mode::Inspect(arg) = parse(&["inspect", "games.csv", "--sample", "3", "--seed", "42"])
        else {
            panic!("expected inspect");
        };
        assert_eq!((arg.sample, arg.seed), (3, Some(42)));

        let Mode::Analyze(arg) = parse(&["analyze", "games.csv", "--config", "cfg.json"]) else {
            panic!("expected analyze");
        };
        assert_eq!(arg.source.config, Some(PathBuf::from("cfg.json")));
        assert_eq!(arg.output, None);
    }

    #[test]
    fn test_unknown_dimension_is_rejected() {
        let result = CommandArgs::try_parse_from(["ice", "compare", "games.csv", "--by", "region", "a", "b"]);
        assert!(result.is_err());
    }
}
