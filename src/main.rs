mod archiver;
mod config;
mod error;
mod fetcher;
mod models;
mod normalize;
mod parser;
mod progress;
mod scrape;

use anyhow::{Context, Result};
use clap::Parser;

use config::{Args, Config};
use fetcher::Fetcher;
use progress::{ConsoleProgress, NullProgress};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_args(Args::parse());
    let fetcher = Fetcher::new(config.timeout).context("Failed to create HTTP client")?;

    if config.quiet {
        scrape::scrape_to_csv(&fetcher, &config, &mut NullProgress)
    } else {
        scrape::scrape_to_csv(&fetcher, &config, &mut ConsoleProgress::stderr())
    }
}
