use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;

mod cli;
mod config;
mod error;
mod fetch;
mod filename;
mod logging;
mod prompt;
mod session;
#[cfg(test)]
mod testing;
mod utils;

use cli::Cli;
use fetch::Fetcher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // one attempt at a time; the next URL is read only after the previous one finished
    logging::init_logging();
    let cli = Cli::parse();

    let fetcher = Fetcher::new(cli.fetch_config()).context("Failed to build HTTP client")?;
    tracing::debug!(config = ?fetcher.config(), "starting");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let session = if cli.urls.is_empty() {
        let stdin = BufReader::new(tokio::io::stdin());
        prompt::run_interactive(&fetcher, stdin, &mut out).await?
    } else {
        prompt::run_batch(&fetcher, &cli.urls, &mut out).await?
    };

    tracing::info!(saved = session.len(), "session finished");
    Ok(())
}
