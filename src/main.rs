use anyhow::{bail, Context, Result};
use chrono::{Datelike, Utc};
use clap::Parser;
use royscraper::{config::Config, fetch::HttpPageSource, pipeline::Pipeline};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// First season with ROY voting on the site in the shape we parse.
const FIRST_SEASON: i32 = 1979;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Scrape ROY voting, advanced stats and standings into a master CSV"
)]
struct Args {
    /// First season (inclusive).
    #[arg(default_value_t = FIRST_SEASON)]
    start_year: i32,
    /// Last season (exclusive). Defaults to next year.
    end_year: Option<i32>,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let end = args.end_year.unwrap_or_else(|| Utc::now().year() + 1);
    if end < args.start_year {
        bail!("end year {} is before start year {}", end, args.start_year);
    }

    let cfg = Config::from_env().context("loading configuration")?;
    info!(
        start = args.start_year,
        end,
        base_url = %cfg.base_url,
        data_dir = %cfg.data_dir.display(),
        "startup"
    );

    let pages = HttpPageSource::new(&cfg).context("building HTTP client")?;
    let summary = Pipeline::from_config(pages, &cfg).run(args.start_year, end)?;

    let failed = summary.failed_seasons();
    if failed > 0 {
        warn!(failed, "finished with skipped seasons");
    }
    info!(rows = summary.master_rows, "master table written");
    Ok(())
}
