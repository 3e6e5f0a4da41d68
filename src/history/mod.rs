// src/history/mod.rs
//
// Season-range aggregation: fetch and normalize one source per season, tag each
// row with its season, and stack the seasons in order.

use std::{thread, time::Duration};

use tracing::{error, info, instrument, warn};

use crate::error::Result;
use crate::fetch::{PageSource, TableFetcher};
use crate::normalize::normalize;
use crate::source::Source;
use crate::table::{Table, Value};

pub const YEAR: &str = "year";

/// What happened to one season of one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonStatus {
    Fetched,
    /// The page had no such table; the season contributes nothing.
    Absent,
    /// Transport or schema failure, with the diagnostic.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonOutcome {
    pub year: i32,
    pub rows: usize,
    pub status: SeasonStatus,
}

/// One source's seasons stacked in ascending order.
#[derive(Debug, Clone)]
pub struct HistoricalTable {
    pub source: Source,
    pub table: Table,
    pub seasons: Vec<SeasonOutcome>,
}

impl HistoricalTable {
    pub fn failed_seasons(&self) -> impl Iterator<Item = &SeasonOutcome> {
        self.seasons
            .iter()
            .filter(|s| matches!(s.status, SeasonStatus::Failed(_)))
    }
}

/// Sequential season walker with a fixed pause after every fetch.
pub struct Aggregator<P> {
    fetcher: TableFetcher<P>,
    pacing: Duration,
}

impl<P: PageSource> Aggregator<P> {
    pub fn new(fetcher: TableFetcher<P>, pacing: Duration) -> Self {
        Self { fetcher, pacing }
    }

    /// Fetch and normalize one season, tagging every row with `year`.
    /// `Ok(None)` when the season has no table.
    pub fn season(&self, source: Source, year: i32) -> Result<Option<Table>> {
        let fetched = self.fetcher.fetch(source, year);
        if !self.pacing.is_zero() {
            thread::sleep(self.pacing);
        }
        let Some(raw) = fetched? else {
            return Ok(None);
        };
        let mut table = normalize(source, raw)?;
        table.set_column(YEAR, Value::Int(i64::from(year)));
        Ok(Some(table))
    }

    /// Build the historical table for `source` over `[start, end)`.
    ///
    /// Absent and failed seasons are replaced by an empty table and recorded in
    /// [`HistoricalTable::seasons`]; only local errors (I/O, bad selectors) abort.
    #[instrument(level = "info", skip(self))]
    pub fn aggregate(&self, source: Source, start: i32, end: i32) -> Result<HistoricalTable> {
        let mut tables = Vec::new();
        let mut seasons = Vec::new();

        for year in start..end {
            info!(%source, year, "extracting season");
            let (rows, status) = match self.season(source, year) {
                Ok(Some(table)) => {
                    let rows = table.len();
                    tables.push(table);
                    (rows, SeasonStatus::Fetched)
                }
                Ok(None) => {
                    warn!(%source, year, "no table on page; substituting an empty season");
                    (0, SeasonStatus::Absent)
                }
                Err(e) if e.is_season_local() => {
                    error!(%source, year, error = %e, "season skipped");
                    (0, SeasonStatus::Failed(e.to_string()))
                }
                Err(e) => return Err(e),
            };
            seasons.push(SeasonOutcome { year, rows, status });
        }

        let table = Table::concat(tables);
        info!(
            %source,
            rows = table.len(),
            seasons = seasons.len(),
            "historical table built"
        );
        Ok(HistoricalTable {
            source,
            table,
            seasons,
        })
    }
}
