//! Loader to Feature Deriver, run in order.
//!
//! Each stage takes ownership of the previous stage's table and hands a new
//! one to the next; nothing downstream of [`derive_features`] modifies the
//! resulting [`AnalysisTable`].

use std::path::Path;

use crate::{
    cleaning::{self, CleanError},
    config::AnalysisConfig,
    features::{AnalysisTable, derive_features},
    loader::{self, LoadError},
    normalize::normalize_columns,
    policy::CleaningPolicy,
    table::RawTable,
};

/// A failure that aborts the whole run.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PipelineError {
    #[display("failed to load data source")]
    Load(LoadError),
    #[display("failed to clean data")]
    Clean(CleanError),
}

/// Normalizes, cleans and derives features from an already loaded table.
pub fn prepare(raw: RawTable, policy: &CleaningPolicy) -> Result<AnalysisTable, CleanError> {
    let normalized = normalize_columns(raw);
    let cleaned = cleaning::clean(normalized, policy)?;
    Ok(derive_features(cleaned))
}

/// Loads the source at `path` and prepares it for analysis.
pub fn load_and_prepare<P>(path: P, config: &AnalysisConfig) -> Result<AnalysisTable, PipelineError>
where
    P: AsRef<Path>,
{
    let raw = loader::load_csv(path, &config.loader)?;
    Ok(prepare(raw, &config.cleaning)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;
    use crate::table::Column;

    #[test]
    fn test_load_and_prepare() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Name,Platform,Year_of_Release,Genre,NA_sales,EU_sales,JP_sales,Other_sales,Critic_Score,User_Score,Rating"
        )
        .unwrap();
        writeln!(file, "Wii Sports,Wii,2006,Sports,41.36,28.96,3.77,8.45,76,8,E").unwrap();
        writeln!(file, "Super Mario Bros.,NES,1985,Platform,29.08,3.58,6.81,0.77,,,").unwrap();
        writeln!(file, "Madden NFL 2004,PS2,,Sports,4.26,0.26,0.01,0.71,94,8.5,E").unwrap();

        let table = load_and_prepare(file.path(), &AnalysisConfig::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert!((table.rows()[0].total_sales() - 82.54).abs() < 1e-9);
        assert!(table.rows().iter().all(|row| row.game.year_of_release > 0));
    }

    #[test]
    fn test_errors_carry_their_stage() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_and_prepare(dir.path().join("missing.csv"), &AnalysisConfig::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Load(LoadError::SourceUnavailable { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "name,platform,year_of_release,genre,na_sales,eu_sales,jp_sales,other_sales,critic_score,user_score,rating"
        )
        .unwrap();
        writeln!(file, "A,PS4,2015,Action,1,0,0,0,80,seven,M").unwrap();
        let err = load_and_prepare(file.path(), &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Clean(CleanError::UnparseableValue {
                column: Column::UserScore,
                line: 2,
                ..
            })
        ));
    }
}
