//! The operator-facing loop: reads URLs, runs fetch attempts, prints status.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::FetchError;
use crate::fetch::{Fetcher, Outcome};
use crate::session::SessionRecord;

/// Input that ends the loop, compared case-insensitively.
pub const SENTINEL: &str = "done";
const PROMPT: &str = "Please enter an image URL (or type 'done' to finish): ";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Done,
    Blank,
    Url(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        Input::Blank
    } else if line.eq_ignore_ascii_case(SENTINEL) {
        Input::Done
    } else {
        Input::Url(line)
    }
}

fn write_banner<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Welcome to the Ubuntu Image Fetcher")?;
    writeln!(out, "A tool for mindfully collecting images from the web")?;
    writeln!(out)
}

/// Prompts on `out` and reads lines from `input` until the sentinel or end
/// of input, then prints the summary. Returns the session record.
pub async fn run_interactive<R, W>(fetcher: &Fetcher, input: R, out: &mut W) -> Result<SessionRecord>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = SessionRecord::new();
    write_banner(out)?;

    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let Some(line) = lines
            .next_line()
            .await
            .context("failed to read operator input")?
        else {
            writeln!(out)?;
            break;
        };
        if !step(fetcher, &line, &mut session, out).await? {
            break;
        }
    }

    session.write_summary(out)?;
    Ok(session)
}

/// Processes URLs given up front, with the same rules as interactive input.
pub async fn run_batch<W: Write>(fetcher: &Fetcher, urls: &[String], out: &mut W) -> Result<SessionRecord> {
    let mut session = SessionRecord::new();
    write_banner(out)?;
    for url in urls {
        if !step(fetcher, url, &mut session, out).await? {
            break;
        }
    }
    session.write_summary(out)?;
    Ok(session)
}

/// Handles one line. Returns false when the loop should end.
async fn step<W: Write>(
    fetcher: &Fetcher,
    line: &str,
    session: &mut SessionRecord,
    out: &mut W,
) -> Result<bool> {
    let url = match classify(line) {
        Input::Done => return Ok(false),
        Input::Blank => return Ok(true),
        Input::Url(url) => url,
    };

    tracing::debug!(url, "fetch attempt");
    let result = fetcher.fetch(url, session).await;
    if let Err(e) = &result {
        tracing::warn!(url, error = %e, "fetch attempt failed");
    }
    report(out, url, &result).context("failed to write status")?;
    Ok(true)
}

fn report<W: Write>(
    out: &mut W,
    url: &str,
    result: &std::result::Result<Outcome, FetchError>,
) -> std::io::Result<()> {
    match result {
        Ok(Outcome::Saved {
            filename,
            path,
            bytes,
            mbps,
        }) => {
            writeln!(out, "✓ Successfully fetched: {filename}")?;
            writeln!(out, "✓ Image saved to {}", path.display())?;
            writeln!(out, "  {bytes} bytes at {mbps:.2} MB/s")?;
            writeln!(out)?;
            writeln!(out, "Connection strengthened. Community enriched.")
        }
        Ok(Outcome::SkippedOnDisk { filename }) => writeln!(
            out,
            "✓ Skipping {url}: A file named '{filename}' already exists. \
             Our community values shared resources and avoids unnecessary duplicates."
        ),
        Ok(Outcome::SkippedInSession { filename }) => writeln!(
            out,
            "✓ Skipping {url}: '{filename}' was already downloaded in this session. \
             Let's work together and avoid redundancy."
        ),
        Ok(Outcome::NotImage { content_type }) => writeln!(
            out,
            "✗ Failed to fetch {url}: The URL does not point to an image. (Content-Type: {content_type})"
        ),
        Ok(Outcome::TooLarge { size, limit }) => writeln!(
            out,
            "✗ Failed to fetch {url}: File size ({size} bytes) exceeds the maximum limit ({limit} bytes)."
        ),
        Err(e) if e.is_connection() => writeln!(out, "✗ Connection error for {url}: {e}"),
        Err(e) => writeln!(out, "✗ An unexpected error occurred for {url}: {e}"),
    }
}
