//! One fetch attempt: request, validate headers, guard against duplicates,
//! stream the body to disk.

use std::io::ErrorKind;
use std::path::PathBuf;

use reqwest::header::{HeaderName, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Response};
use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio::time::timeout;

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::filename::derive_filename;
use crate::session::SessionRecord;
use crate::utils::{stream_to_file, Transfer};

/// Terminal outcome of an attempt that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Saved {
        filename: String,
        path: PathBuf,
        bytes: u64,
        mbps: f64,
    },
    SkippedOnDisk {
        filename: String,
    },
    SkippedInSession {
        filename: String,
    },
    NotImage {
        content_type: String,
    },
    /// `size` is the declared length, or the bytes seen when a body without
    /// a usable declaration ran past the ceiling.
    TooLarge {
        size: u64,
        limit: u64,
    },
}

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder().connect_timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Runs one attempt for `url`. A successful save is appended to `session`;
    /// every other outcome leaves it untouched.
    pub async fn fetch(&self, url: &str, session: &mut SessionRecord) -> Result<Outcome> {
        let cfg = &self.config;
        tokio::fs::create_dir_all(&cfg.output_dir).await?;

        let response = timeout(cfg.timeout, self.client.get(url).send())
            .await
            .map_err(|_| FetchError::Timeout(cfg.timeout))??
            .error_for_status()?;
        tracing::debug!(url, status = %response.status(), "response headers received");

        let content_type = header_text(&response, CONTENT_TYPE);
        if !is_image(&content_type) {
            return Ok(Outcome::NotImage { content_type });
        }

        let declared = declared_length(&response)?;
        if declared > cfg.max_bytes {
            return Ok(Outcome::TooLarge {
                size: declared,
                limit: cfg.max_bytes,
            });
        }

        let filename = derive_filename(url);
        if session.contains(&filename) {
            return Ok(Outcome::SkippedInSession { filename });
        }
        let path = cfg.output_dir.join(&filename);
        if tokio::fs::try_exists(&path).await? {
            return Ok(Outcome::SkippedOnDisk { filename });
        }

        // Created exclusively under a random name, so it never clobbers an existing file.
        let staging = tempfile::Builder::new()
            .prefix(&format!(".{filename}."))
            .suffix(".part")
            .tempfile_in(&cfg.output_dir)?;
        let file = File::from_std(staging.as_file().try_clone()?);
        let transfer =
            stream_to_file(response, file, cfg.max_bytes, cfg.chunk_size, cfg.timeout).await;
        let (bytes, mbps) = match transfer {
            Ok(Transfer::Complete { bytes, mbps }) => (bytes, mbps),
            Ok(Transfer::Exceeded { bytes }) => {
                discard(staging);
                return Ok(Outcome::TooLarge {
                    size: bytes,
                    limit: cfg.max_bytes,
                });
            }
            Err(e) => {
                discard(staging);
                return Err(e);
            }
        };

        // A link fails on an existing target where a rename would replace it.
        let linked = tokio::fs::hard_link(staging.path(), &path).await;
        discard(staging);
        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Ok(Outcome::SkippedOnDisk { filename });
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(url, filename = %filename, bytes, "image saved");
        session.record(filename.clone());
        Ok(Outcome::Saved {
            filename,
            path,
            bytes,
            mbps,
        })
    }
}

fn header_text(response: &Response, name: HeaderName) -> String {
    response
        .headers()
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

fn is_image(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Declared body length; 0 when the header is absent.
fn declared_length(response: &Response) -> Result<u64> {
    if response.headers().get(CONTENT_LENGTH).is_none() {
        return Ok(0);
    }
    let text = header_text(response, CONTENT_LENGTH);
    text.trim()
        .parse()
        .map_err(|_| FetchError::InvalidContentLength(text))
}

fn discard(staging: NamedTempFile) {
    let path = staging.path().to_path_buf();
    if let Err(e) = staging.close() {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove partial file");
    }
}
