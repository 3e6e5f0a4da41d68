use anyhow::{bail, Context, Result};
use clap::Parser;
use royscraper::{
    config::Config, fetch::HttpPageSource, history::SeasonStatus, pipeline::Pipeline,
    source::Source,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Build and persist the historical table of a single source.
#[derive(Parser)]
#[command(author, version, about = "Scrape one source's seasons into its history CSV")]
struct Args {
    #[arg(value_enum)]
    source: Source,
    /// First season (inclusive).
    start_year: i32,
    /// Last season (exclusive).
    end_year: i32,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    if args.end_year < args.start_year {
        bail!(
            "end year {} is before start year {}",
            args.end_year,
            args.start_year
        );
    }

    let cfg = Config::from_env().context("loading configuration")?;
    let pages = HttpPageSource::new(&cfg).context("building HTTP client")?;
    let pipeline = Pipeline::from_config(pages, &cfg);
    let hist = pipeline.build_history(args.source, args.start_year, args.end_year)?;

    for season in &hist.seasons {
        match &season.status {
            SeasonStatus::Fetched => info!(year = season.year, rows = season.rows, "fetched"),
            SeasonStatus::Absent => info!(year = season.year, "no table"),
            SeasonStatus::Failed(e) => info!(year = season.year, error = %e, "failed"),
        }
    }
    info!(
        source = %args.source,
        rows = hist.table.len(),
        path = %pipeline.history_path(args.source).display(),
        "history written"
    );
    Ok(())
}
