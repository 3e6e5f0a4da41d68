// src/normalize/mod.rs
//
// Per-source cleanup of scraped tables into canonical record sets.

pub mod standings;

use tracing::trace;

use crate::error::{Result, ScrapeError};
use crate::fetch::RawSeason;
use crate::source::Source;
use crate::table::{RawTable, Table, Value};

pub use standings::normalize_standings;

/// Text the site repeats in the rank column of its mid-table header rows.
pub const HEADER_MARKER: &str = "Rk";
/// Trailing marker the site appends to Hall-of-Fame players (and playoff teams).
pub const STAR_MARKER: char = '*';

const ADVANCED_SPACERS: [&str; 2] = ["Unnamed: 19", "Unnamed: 24"];

const ROOKIE_PER_GAME: [(&str, &str); 4] = [
    ("MP.1", "MP/G"),
    ("PTS.1", "PTS/G"),
    ("TRB.1", "TRB/G"),
    ("AST.1", "AST/G"),
];

/// Apply the normalization rule for `source` to a fetched season.
pub fn normalize(source: Source, raw: RawSeason) -> Result<Table> {
    match (source, raw) {
        (Source::Roy, RawSeason::Table(t)) => Ok(normalize_roy(t)),
        (Source::AdvancedStats, RawSeason::Table(t)) => normalize_advanced(t),
        (Source::Rookies, RawSeason::Table(t)) => normalize_rookies(t),
        (Source::Standings, RawSeason::Standings(page)) => normalize_standings(page),
        (source, _) => Err(ScrapeError::schema(
            source.name(),
            "fetched page does not match the source layout",
        )),
    }
}

/// ROY voting is already clean once the right header row is chosen.
pub fn normalize_roy(raw: RawTable) -> Table {
    Table::from_raw(raw)
}

pub fn normalize_advanced(raw: RawTable) -> Result<Table> {
    let mut t = Table::from_raw(raw);
    for spacer in ADVANCED_SPACERS {
        require(&t, "advanced_stats", spacer)?;
    }
    t.drop_columns(&ADVANCED_SPACERS);

    drop_header_rows(&mut t, "advanced_stats")?;

    let player = require(&t, "advanced_stats", "Player")?;
    t.map_column(player, strip_star);
    Ok(t)
}

pub fn normalize_rookies(raw: RawTable) -> Result<Table> {
    let mut t = Table::from_raw(raw);
    let renamed = t.rename_columns(&ROOKIE_PER_GAME);
    trace!(renamed, "rookie per-game columns");

    let rk = require(&t, "rookies", "Rk")?;
    t.retain_rows(|r| !r[rk].is_null());
    drop_header_rows(&mut t, "rookies")?;
    Ok(t)
}

pub(crate) fn require(t: &Table, table: &str, column: &str) -> Result<usize> {
    t.column_index(column)
        .ok_or_else(|| ScrapeError::missing_column(table, column))
}

/// Discard the header rows the site repeats inside the table body. Null ranks
/// are kept, so an all-null rank column filters nothing.
fn drop_header_rows(t: &mut Table, table: &str) -> Result<()> {
    let rk = require(t, table, "Rk")?;
    let before = t.len();
    t.retain_rows(|r| {
        !r[rk]
            .as_text()
            .is_some_and(|s| s.contains(HEADER_MARKER))
    });
    trace!(table, dropped = before - t.len(), "repeated header rows");
    Ok(())
}

/// Remove the trailing Hall-of-Fame marker from a name cell.
pub(crate) fn strip_star(v: Value) -> Value {
    match v {
        Value::Text(s) if s.ends_with(STAR_MARKER) => {
            Value::Text(s.trim_end_matches(STAR_MARKER).trim_end().to_string())
        }
        other => other,
    }
}
