use std::time::Duration;

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Response;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::time::{timeout, Instant};

use crate::error::{FetchError, Result};

/// How a body transfer ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transfer {
    Complete { bytes: u64, mbps: f64 },
    /// The body grew past the ceiling; `bytes` is the count seen when it was cut off.
    Exceeded { bytes: u64 },
}

/// Average throughput in MiB/s; 0 when no time has elapsed.
fn throughput_mbps(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs == 0.0 {
        return 0.0;
    }
    bytes as f64 / (1024.0 * 1024.0) / secs
}

fn progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(len) => {
            let pb = ProgressBar::new(len);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:50.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            pb.set_style(style);
            pb
        }
        None => ProgressBar::new_spinner(),
    }
}

/// Streams `response` into `file`.
///
/// Writes go through a buffer of `chunk_size` bytes. Every wait for the next
/// body chunk is bounded by `wait`. The transfer stops as soon as more than
/// `max_bytes` have arrived, whatever the server declared.
pub async fn stream_to_file(
    response: Response,
    file: File,
    max_bytes: u64,
    chunk_size: usize,
    wait: Duration,
) -> Result<Transfer> {
    let pb = progress_bar(response.content_length());
    let mut writer = BufWriter::with_capacity(chunk_size, file);

    let start = Instant::now();
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    loop {
        let next = timeout(wait, stream.next())
            .await
            .map_err(|_| FetchError::Timeout(wait))?;
        let Some(chunk) = next else { break };
        let chunk = chunk?;
        downloaded += chunk.len() as u64;
        if downloaded > max_bytes {
            pb.abandon();
            return Ok(Transfer::Exceeded { bytes: downloaded });
        }
        writer.write_all(&chunk).await?;
        pb.set_position(downloaded);
    }

    writer.flush().await?;
    writer.get_ref().sync_all().await?;
    pb.finish_and_clear();

    Ok(Transfer::Complete {
        bytes: downloaded,
        mbps: throughput_mbps(downloaded, start.elapsed()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::path::Path;

    #[test]
    fn throughput_over_elapsed_time() {
        assert_eq!(throughput_mbps(3 * 1024 * 1024, Duration::from_secs(2)), 1.5);
        assert_eq!(throughput_mbps(512, Duration::ZERO), 0.0);
    }

    async fn get(server: &mockito::ServerGuard, path: &str) -> Response {
        reqwest::get(format!("{}{}", server.url(), path))
            .await
            .unwrap()
    }

    async fn create(path: &Path) -> File {
        File::create(path).await.unwrap()
    }

    #[tokio::test]
    async fn writes_whole_body() {
        let mut server = mockito::Server::new_async().await;
        let body: Vec<u8> = (0u8..=255).cycle().take(20_000).collect();
        server
            .mock("GET", "/big.png")
            .with_header("content-type", "image/png")
            .with_body(body.clone())
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png.part");

        let response = get(&server, "/big.png").await;
        let file = create(&path).await;
        let transfer = stream_to_file(response, file, 1 << 20, 8192, Duration::from_secs(5))
            .await
            .unwrap();

        match transfer {
            Transfer::Complete { bytes, mbps } => {
                assert_eq!(bytes, 20_000);
                assert!(mbps.is_finite() && mbps >= 0.0);
            }
            other => panic!("expected Complete, got {other:?}"),
        }
        assert_eq!(std::fs::read(&path).unwrap(), body);
    }

    #[tokio::test]
    async fn stops_past_the_ceiling() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/endless.png")
            .with_header("content-type", "image/png")
            .with_chunked_body(|w| w.write_all(&[1u8; 4096]))
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("endless.png.part");

        let response = get(&server, "/endless.png").await;
        let file = create(&path).await;
        let transfer = stream_to_file(response, file, 1000, 8192, Duration::from_secs(5))
            .await
            .unwrap();

        match transfer {
            Transfer::Exceeded { bytes } => assert!(bytes > 1000),
            other => panic!("expected Exceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stalled_body_times_out() {
        let url = crate::testing::stalling_server(
            b"HTTP/1.1 200 OK\r\ncontent-type: image/png\r\ncontent-length: 100\r\n\r\n0123456789",
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slow.png.part");

        let response = reqwest::get(format!("{url}/slow.png")).await.unwrap();
        let file = create(&path).await;
        let err = stream_to_file(response, file, 1 << 20, 8192, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Timeout(_)), "got {err:?}");
    }
}
