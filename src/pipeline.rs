// src/pipeline.rs
//
// End-to-end run: build each historical table, persist it, reload the persisted
// tables and join them into the master table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::config::{Config, CsvFormat};
use crate::fetch::{PageSource, TableFetcher};
use crate::history::{Aggregator, HistoricalTable, SeasonOutcome, SeasonStatus};
use crate::master::build_master;
use crate::sink::{read_csv_or_empty, write_csv};
use crate::source::Source;
use crate::table::Table;

pub const MASTER_FILE: &str = "master_table.csv";

/// Per-source season outcomes plus the size of the master table.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seasons: Vec<(Source, Vec<SeasonOutcome>)>,
    pub master_rows: usize,
}

impl RunSummary {
    pub fn failed_seasons(&self) -> usize {
        self.seasons
            .iter()
            .flat_map(|(_, s)| s)
            .filter(|s| matches!(s.status, SeasonStatus::Failed(_)))
            .count()
    }
}

pub struct Pipeline<P> {
    aggregator: Aggregator<P>,
    data_dir: PathBuf,
    csv: CsvFormat,
}

impl<P: PageSource> Pipeline<P> {
    pub fn new(aggregator: Aggregator<P>, data_dir: impl Into<PathBuf>, csv: CsvFormat) -> Self {
        Self {
            aggregator,
            data_dir: data_dir.into(),
            csv,
        }
    }

    pub fn from_config(pages: P, cfg: &Config) -> Self {
        let fetcher = TableFetcher::new(pages, cfg.base_url.clone());
        Self::new(
            Aggregator::new(fetcher, cfg.pacing),
            cfg.data_dir.clone(),
            cfg.csv,
        )
    }

    pub fn history_path(&self, source: Source) -> PathBuf {
        self.data_dir.join(source.csv_file())
    }

    pub fn master_path(&self) -> PathBuf {
        self.data_dir.join(MASTER_FILE)
    }

    /// Aggregate `source` over `[start, end)` and persist it to its history file.
    #[instrument(level = "info", skip(self))]
    pub fn build_history(&self, source: Source, start: i32, end: i32) -> Result<HistoricalTable> {
        let hist = self
            .aggregator
            .aggregate(source, start, end)
            .with_context(|| format!("aggregating {} seasons {}..{}", source, start, end))?;

        let path = self.history_path(source);
        write_csv(&path, &hist.table, self.csv)
            .with_context(|| format!("writing {}", path.display()))?;

        let failed = hist.failed_seasons().count();
        if failed > 0 {
            warn!(%source, failed, "some seasons failed and were skipped");
        }
        Ok(hist)
    }

    /// Reload the three joined history files and persist their master table.
    /// A history file that does not exist counts as an empty table.
    pub fn build_master(&self) -> Result<Table> {
        let [roy, advanced, standings] = Source::JOINED.map(|source| {
            let path = self.history_path(source);
            read_csv_or_empty(&path, self.csv).with_context(|| format!("reading {}", path.display()))
        });
        let master = build_master(&roy?, &advanced?, &standings?).context("joining master table")?;

        let path = self.master_path();
        write_csv(&path, &master, self.csv)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(master)
    }

    /// Every joined source over `[start, end)`, then the master table.
    #[instrument(level = "info", skip(self))]
    pub fn run(&self, start: i32, end: i32) -> Result<RunSummary> {
        let mut seasons = Vec::new();
        for source in Source::JOINED {
            let hist = self.build_history(source, start, end)?;
            seasons.push((source, hist.seasons));
        }
        let master = self.build_master()?;

        let summary = RunSummary {
            seasons,
            master_rows: master.len(),
        };
        info!(
            start,
            end,
            master_rows = summary.master_rows,
            failed_seasons = summary.failed_seasons(),
            "pipeline finished"
        );
        Ok(summary)
    }
}
