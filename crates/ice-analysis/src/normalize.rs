//! Column identifier normalization.

use crate::table::RawTable;

/// Rewrites every column identifier to lower case.
///
/// Cell values are left untouched. Applying it twice yields the same schema.
///
/// ```
/// use ice_analysis::{normalize::normalize_columns, table::RawTable};
///
/// let table = RawTable {
///     columns: vec!["Name".into(), "Year_of_Release".into()],
///     rows: vec![],
/// };
/// let table = normalize_columns(table);
/// assert_eq!(table.columns, ["name", "year_of_release"]);
/// ```
#[must_use]
pub fn normalize_columns(mut table: RawTable) -> RawTable {
    for column in &mut table.columns {
        *column = column.to_lowercase();
    }
    table
}
