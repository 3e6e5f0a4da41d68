// src/config.rs

use std::{env, path::PathBuf, time::Duration};

use url::Url;

use crate::error::{Result, ScrapeError};

pub const DEFAULT_BASE_URL: &str = "https://www.basketball-reference.com";

/// Browser-like agent; the site is quick to block obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.93 Safari/537.36";

pub const DEFAULT_PACING: Duration = Duration::from_secs(3);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Formatting handed to the CSV sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFormat {
    pub delimiter: u8,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub user_agent: String,
    pub timeout: Duration,
    /// Sleep after every page fetch.
    pub pacing: Duration,
    pub data_dir: PathBuf,
    pub csv: CsvFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL should parse"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            pacing: DEFAULT_PACING,
            data_dir: PathBuf::from("data"),
            csv: CsvFormat::default(),
        }
    }
}

impl Config {
    /// Defaults, overridden by `BREF_BASE_URL`, `BREF_PACING_SECS`,
    /// `BREF_TIMEOUT_SECS` and `BREF_DATA_DIR` when set.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Ok(raw) = env::var("BREF_BASE_URL") {
            cfg.base_url = Url::parse(&raw)
                .map_err(|e| ScrapeError::Config(format!("BREF_BASE_URL={raw:?}: {e}")))?;
        }
        if let Ok(raw) = env::var("BREF_PACING_SECS") {
            cfg.pacing = parse_secs("BREF_PACING_SECS", &raw)?;
        }
        if let Ok(raw) = env::var("BREF_TIMEOUT_SECS") {
            cfg.timeout = parse_secs("BREF_TIMEOUT_SECS", &raw)?;
        }
        if let Ok(raw) = env::var("BREF_DATA_DIR") {
            cfg.data_dir = PathBuf::from(raw);
        }
        Ok(cfg)
    }
}

fn parse_secs(var: &str, raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(|s| Duration::try_from_secs_f64(s).ok())
        .ok_or_else(|| ScrapeError::Config(format!("{var}={raw:?} is not a number of seconds")))
}
