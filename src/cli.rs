use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{FetchConfig, CHUNK_SIZE, DEFAULT_OUTPUT_DIR, MAX_FILE_SIZE, WAIT_LIMIT};

/// Fetch images from the web into a local directory, one URL at a time.
#[derive(Debug, Parser)]
#[command(name = "imgfetch", version)]
#[command(about = "Mindfully collect images from the web", long_about = None)]
pub struct Cli {
    /// Image URLs to fetch without prompting.
    pub urls: Vec<String>,

    /// Directory images are saved into.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Largest image accepted, in bytes.
    #[arg(long, default_value_t = MAX_FILE_SIZE)]
    pub max_size: u64,

    /// Network timeout in seconds.
    #[arg(long, default_value_t = WAIT_LIMIT, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,
}

impl Cli {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            output_dir: self.output_dir.clone(),
            max_bytes: self.max_size,
            timeout: Duration::from_secs(self.timeout),
            chunk_size: CHUNK_SIZE,
        }
    }
}
