use thiserror::Error;

/// Errors raised while fetching, normalizing, joining or persisting tables.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The request failed: DNS, timeout, connection reset or a non-2xx status.
    #[error("transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A table did not have the shape a normalization or join rule relies on.
    #[error("schema mismatch in {table}: {detail}")]
    SchemaMismatch { table: String, detail: String },

    #[error("invalid CSS selector {0:?}")]
    Selector(String),

    #[error("building HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("persisting {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: tempfile::PersistError,
    },
}

impl ScrapeError {
    pub fn schema(table: impl Into<String>, detail: impl Into<String>) -> Self {
        ScrapeError::SchemaMismatch {
            table: table.into(),
            detail: detail.into(),
        }
    }

    pub fn missing_column(table: impl Into<String>, column: &str) -> Self {
        Self::schema(table, format!("missing column {:?}", column))
    }

    /// Errors that only cost the current season; everything else aborts the run.
    pub fn is_season_local(&self) -> bool {
        matches!(
            self,
            ScrapeError::Transport { .. } | ScrapeError::SchemaMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
