//! Writing the analytical table back out as CSV.
//!
//! Unevaluated scores are written as [`Score::SENTINEL`], so the output can
//! be loaded and cleaned again.
//!
//! [`Score::SENTINEL`]: crate::record::Score::SENTINEL

use std::io;

use serde::Serialize;

use crate::features::AnalysisTable;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    name: &'a str,
    platform: &'a str,
    year_of_release: i32,
    genre: &'a str,
    na_sales: f64,
    eu_sales: f64,
    jp_sales: f64,
    other_sales: f64,
    critic_score: f64,
    user_score: f64,
    rating: &'a str,
    total_sales: f64,
}

/// Writes `table` with a header line and a trailing `total_sales` column.
pub fn write_csv<W>(table: &AnalysisTable, writer: W) -> Result<(), csv::Error>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    for row in table.rows() {
        let game = &row.game;
        writer.serialize(ExportRow {
            name: &game.name,
            platform: &game.platform,
            year_of_release: game.year_of_release,
            genre: &game.genre,
            na_sales: game.sales.na,
            eu_sales: game.sales.eu,
            jp_sales: game.sales.jp,
            other_sales: game.sales.other,
            critic_score: game.critic_score.encoded(),
            user_score: game.user_score.encoded(),
            rating: &game.rating,
            total_sales: row.total_sales(),
        })?;
    }
    writer.flush()?;
    Ok(())
}
