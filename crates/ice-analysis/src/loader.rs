//! Reading delimited sources into a [`RawTable`].

use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::table::{Cell, Column, RawRow, RawTable};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("cannot open data source {}", path.display())]
    SourceUnavailable { path: PathBuf, source: io::Error },
    #[display("data source header is missing column(s): {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
    #[display("malformed record at line {line}")]
    MalformedRecord { line: u64, source: csv::Error },
    #[display("delimiter {delimiter:?} is not a single-byte character")]
    InvalidDelimiter { delimiter: char },
}

/// How a delimited source is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Field delimiter.
    pub delimiter: char,
    /// Field values that mean "no value" (compared after trimming).
    pub missing_markers: Vec<String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            missing_markers: ["", "NA", "N/A", "NaN", "nan", "null"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Opens `path` and reads it with [`read_csv`].
pub fn load_csv<P>(path: P, options: &LoaderOptions) -> Result<RawTable, LoadError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::SourceUnavailable {
        path: path.to_owned(),
        source,
    })?;
    let table = read_csv(BufReader::new(file), options)?;
    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns.len(),
        "loaded data source"
    );
    Ok(table)
}

/// Reads a delimited source with a header line.
///
/// The header must contain every [`Column`] (compared case-insensitively);
/// extra columns are kept. Column names are stored as authored.
///
/// ```
/// use ice_analysis::loader::{LoaderOptions, read_csv};
///
/// let data = "Name,Platform,Year_of_Release,Genre,NA_sales,EU_sales,JP_sales,Other_sales,Critic_Score,User_Score,Rating\n\
///             Wii Sports,Wii,2006,Sports,41.36,28.96,3.77,8.45,76,8,E\n";
/// let table = read_csv(data.as_bytes(), &LoaderOptions::default()).unwrap();
/// assert_eq!(table.columns[0], "Name");
/// assert_eq!(table.len(), 1);
/// ```
pub fn read_csv<R>(reader: R, options: &LoaderOptions) -> Result<RawTable, LoadError>
where
    R: io::Read,
{
    let delimiter = u8::try_from(options.delimiter).map_err(|_| LoadError::InvalidDelimiter {
        delimiter: options.delimiter,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = reader
        .headers()
        .map_err(|source| LoadError::MalformedRecord { line: 1, source })?
        .iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();
    check_schema(&columns)?;

    let mut rows = vec![];
    for record in reader.records() {
        let record = record.map_err(|source| LoadError::MalformedRecord {
            line: source.position().map_or(0, csv::Position::line),
            source,
        })?;
        let line = record.position().map_or(0, csv::Position::line);
        let cells = record
            .iter()
            .map(|field| Cell::parse(field, &options.missing_markers))
            .collect();
        rows.push(RawRow { line, cells });
    }

    Ok(RawTable { columns, rows })
}

fn check_schema(columns: &[String]) -> Result<(), LoadError> {
    let missing = Column::ALL
        .iter()
        .map(|c| c.name())
        .filter(|expected| !columns.iter().any(|c| c.eq_ignore_ascii_case(expected)))
        .map(str::to_owned)
        .collect::<Vec<_>>();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::SchemaMismatch { missing })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    const HEADER: &str = "Name,Platform,Year_of_Release,Genre,NA_sales,EU_sales,JP_sales,Other_sales,Critic_Score,User_Score,Rating";

    #[test]
    fn test_cells_keep_natural_types() {
        let data = format!("{HEADER}\nTetris,GB,,Puzzle,23.2,2.26,4.22,0.58,,tbd,\n");
        let table = read_csv(data.as_bytes(), &LoaderOptions::default()).unwrap();
        let row = &table.rows[0];
        assert_eq!(row.line, 2);
        assert_eq!(row.cells[0], Cell::Text("Tetris".into()));
        assert_eq!(row.cells[2], Cell::Missing);
        assert!(matches!(row.cells[4], Cell::Number { value, .. } if (value - 23.2).abs() < 1e-12));
        assert_eq!(row.cells[9], Cell::Text("tbd".into()));
        assert_eq!(row.cells[10], Cell::Missing);
    }

    #[test]
    fn test_missing_markers_and_custom_delimiter() {
        let data = format!("{}\nA;PS4;2015;Action;1;0;0;0;N/A;NaN;M\n", HEADER.replace(',', ";"));
        let options = LoaderOptions {
            delimiter: ';',
            ..LoaderOptions::default()
        };
        let table = read_csv(data.as_bytes(), &options).unwrap();
        assert!(table.rows[0].cells[8].is_missing());
        assert!(table.rows[0].cells[9].is_missing());
    }

    #[test]
    fn test_schema_mismatch_lists_missing_columns() {
        let data = "name,platform,genre\nA,PS4,Action\n";
        let err = read_csv(data.as_bytes(), &LoaderOptions::default()).unwrap_err();
        let LoadError::SchemaMismatch { missing } = err else {
            panic!("expected schema mismatch");
        };
        assert!(missing.contains(&"year_of_release".to_owned()));
        assert!(missing.contains(&"user_score".to_owned()));
        assert!(!missing.contains(&"name".to_owned()));
    }

    #[test]
    fn test_ragged_record_is_malformed() {
        let data = format!("{HEADER}\nA,PS4,2015\n");
        let err = read_csv(data.as_bytes(), &LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv(dir.path().join("games.csv"), &LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "Pong,2600,1977,Sports,1,0.5,0,0.1,,,").unwrap();
        let table = load_csv(file.path(), &LoaderOptions::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.columns.len(), 11);
    }
}
