use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OUTPUT_DIR: &str = "Fetched_Images";
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10 MiB
pub const WAIT_LIMIT: u64 = 10; // seconds
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Settings shared by every fetch attempt of a run.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Directory images are saved into; created on first attempt.
    pub output_dir: PathBuf,
    /// Largest body accepted, declared or streamed.
    pub max_bytes: u64,
    /// Applies to connecting, to the response headers, and to each body chunk.
    pub timeout: Duration,
    /// Write buffer size for the target file.
    pub chunk_size: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_bytes: MAX_FILE_SIZE,
            timeout: Duration::from_secs(WAIT_LIMIT),
            chunk_size: CHUNK_SIZE,
        }
    }
}
