// src/master.rs
//
// Join engine: ROY votes ⟕ advanced stats ⟕ standings, then the fixed
// drop list and the null-fill policy.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::history::YEAR;
use crate::normalize::standings::TEAM_ABBREVIATION;
use crate::table::{left_join, JoinKey, Table, Value};

pub const PLAYER: &str = "Player";
pub const TEAM: &str = "Tm";

/// Columns that are redundant with retained ones or outside the master schema.
pub const DROPPED_COLUMNS: [&str; 12] = [
    "Age",
    "First",
    "Pts Won",
    "Pts Max",
    "Rk",
    "TEAM_NAME",
    "Conference",
    "TEAM_ABBREVIATION",
    "GB",
    "PS/G",
    "PA/G",
    "SRS",
];

/// How a column's nulls are replaced after the join.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    /// Column mean rounded to the nearest integer, ties to even.
    RoundedMean,
    Mean,
    Constant(f64),
}

pub const FILL_POLICY: [(&str, Fill); 5] = [
    ("W", Fill::RoundedMean),
    ("L", Fill::RoundedMean),
    ("W/L%", Fill::Mean),
    // no attempts, not missing data
    ("3P%", Fill::Constant(0.0)),
    ("3PAr", Fill::Constant(0.0)),
];

/// Keep the first anchor row per (Player, year, Tm); drop rows missing a key part.
fn unique_anchor_rows(roy: &Table) -> Result<Table> {
    let keys = [PLAYER, YEAR, TEAM]
        .iter()
        .map(|k| crate::normalize::require(roy, "roy", k))
        .collect::<Result<Vec<usize>>>()?;

    let mut seen = HashSet::new();
    let mut out = Table::new(roy.headers().to_vec());
    let (mut keyless, mut repeated) = (0usize, 0usize);
    for row in roy.rows() {
        let key: Option<Vec<String>> = keys.iter().map(|&i| row[i].key()).collect();
        match key {
            None => keyless += 1,
            Some(k) => {
                if seen.insert(k) {
                    out.push_row(row.clone());
                } else {
                    repeated += 1;
                }
            }
        }
    }
    if keyless > 0 || repeated > 0 {
        warn!(keyless, repeated, "anchor rows dropped");
    }
    Ok(out)
}

/// Join the three historical tables into the master table (before drop/fill).
pub fn join_sources(roy: &Table, advanced: &Table, standings: &Table) -> Result<Table> {
    let anchor = unique_anchor_rows(roy)?;
    let with_stats = left_join(
        &anchor,
        advanced,
        &[
            JoinKey::same(PLAYER),
            JoinKey::same(YEAR),
            JoinKey::same(TEAM),
        ],
    )?;
    left_join(
        &with_stats,
        standings,
        &[JoinKey::pair(TEAM, TEAM_ABBREVIATION), JoinKey::same(YEAR)],
    )
}

/// Replace nulls per [`FILL_POLICY`]. Every policy column is present afterwards;
/// a column with nothing to average is filled with 0.
pub fn fill_nulls(table: &mut Table) {
    for (column, fill) in FILL_POLICY {
        table.ensure_column(column);
        let value = match fill {
            Fill::RoundedMean => {
                Value::Int(table.mean(column).map_or(0.0, f64::round_ties_even) as i64)
            }
            Fill::Mean => Value::Float(table.mean(column).unwrap_or(0.0)),
            Fill::Constant(c) => Value::Float(c),
        };
        let filled = table.fill_null(column, &value);
        debug!(column, filled, fill = %value, "null fill");
    }
}

/// The full join stage: join, drop the fixed column set, fill nulls.
/// A ROY table without columns (no season yielded rows) gives an empty master table.
pub fn build_master(roy: &Table, advanced: &Table, standings: &Table) -> Result<Table> {
    if roy.headers().is_empty() {
        warn!("no ROY columns; master table is empty");
        return Ok(Table::default());
    }
    let mut master = join_sources(roy, advanced, standings)?;
    master.drop_columns(&DROPPED_COLUMNS);
    fill_nulls(&mut master);
    info!(
        rows = master.len(),
        columns = master.headers().len(),
        "master table built"
    );
    Ok(master)
}
