// src/fetch/mod.rs

pub mod html;

#[cfg(test)]
pub(crate) mod fixtures;

use reqwest::blocking::Client;
use tracing::{debug, instrument};
use url::Url;

pub use html::{Anchor, Page};

use crate::config::Config;
use crate::error::{Result, ScrapeError};
use crate::source::{
    Source, TableSpec, ADVANCED_TABLE, EAST_STANDINGS_TABLE, ROOKIES_TABLE, ROY_TABLE,
    WEST_STANDINGS_TABLE,
};
use crate::table::RawTable;

/// Anything that can turn a URL into page HTML.
pub trait PageSource {
    fn get(&self, url: &Url) -> Result<String>;
}

impl<P: PageSource + ?Sized> PageSource for &P {
    fn get(&self, url: &Url) -> Result<String> {
        (**self).get(url)
    }
}

/// Blocking HTTP page source. One GET per call, no retries.
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }
}

fn transport(url: &Url, err: reqwest::Error) -> ScrapeError {
    ScrapeError::Transport {
        url: url.to_string(),
        source: Box::new(err),
    }
}

impl PageSource for HttpPageSource {
    fn get(&self, url: &Url) -> Result<String> {
        debug!(%url, "GET");
        self.client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| transport(url, e))
    }
}

/// Both conference tables of a standings page plus the team links used to map
/// display names to abbreviations.
#[derive(Debug, Clone, PartialEq)]
pub struct StandingsPage {
    pub east: RawTable,
    pub west: RawTable,
    pub anchors: Vec<Anchor>,
}

/// What one season page yields before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSeason {
    Table(RawTable),
    Standings(StandingsPage),
}

/// Fetches season pages from the stats site and extracts the raw tables.
pub struct TableFetcher<P> {
    pages: P,
    base_url: Url,
}

impl<P: PageSource> TableFetcher<P> {
    pub fn new(pages: P, base_url: Url) -> Self {
        Self { pages, base_url }
    }

    pub fn page_url(&self, source: Source, season: i32) -> Result<Url> {
        let path = source.page_path(season);
        self.base_url
            .join(&path)
            .map_err(|e| ScrapeError::Config(format!("joining {} onto {}: {}", path, self.base_url, e)))
    }

    fn page(&self, source: Source, season: i32) -> Result<Page> {
        let url = self.page_url(source, season)?;
        let body = self.pages.get(&url)?;
        Ok(Page::parse(&body))
    }

    /// Fetch one named table of a season page. `Ok(None)` when the page exists
    /// but does not contain the table.
    #[instrument(level = "debug", skip(self), fields(table = spec.id))]
    pub fn fetch_table(&self, source: Source, season: i32, spec: &TableSpec) -> Result<Option<RawTable>> {
        self.page(source, season)?.table(spec)
    }

    /// Fetch a standings page. Absent unless both conference tables are present.
    pub fn fetch_standings(&self, season: i32) -> Result<Option<StandingsPage>> {
        let page = self.page(Source::Standings, season)?;
        let east = page.table(&EAST_STANDINGS_TABLE)?;
        let west = page.table(&WEST_STANDINGS_TABLE)?;
        Ok(match (east, west) {
            (Some(east), Some(west)) => Some(StandingsPage {
                east,
                west,
                anchors: page.stats_table_anchors(),
            }),
            _ => None,
        })
    }

    /// Fetch whatever `source` needs for one season.
    pub fn fetch(&self, source: Source, season: i32) -> Result<Option<RawSeason>> {
        let spec = match source {
            Source::Roy => ROY_TABLE,
            Source::AdvancedStats => ADVANCED_TABLE,
            Source::Rookies => ROOKIES_TABLE,
            Source::Standings => {
                return Ok(self.fetch_standings(season)?.map(RawSeason::Standings));
            }
        };
        Ok(self
            .fetch_table(source, season, &spec)?
            .map(RawSeason::Table))
    }
}
