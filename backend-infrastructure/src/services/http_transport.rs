use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use backend_domain::ports::LogTransport;
use backend_domain::LogStream;

use crate::config::StreamLocation;

struct DownloadTarget {
    stream: LogStream,
    url: String,
    path: PathBuf,
}

/// Mirrors remote stream files into their local paths before each cycle.
pub struct HttpLogTransport {
    client: Client,
    targets: Vec<DownloadTarget>,
}

impl HttpLogTransport {
    /// `None` when no stream has a URL configured.
    pub fn from_locations(locations: &[StreamLocation], timeout_seconds: u64) -> Result<Option<Self>> {
        let targets: Vec<DownloadTarget> = locations
            .iter()
            .filter_map(|location| {
                location.url.as_ref().map(|url| DownloadTarget {
                    stream: location.stream,
                    url: url.clone(),
                    path: location.path.clone(),
                })
            })
            .collect();
        if targets.is_empty() {
            return Ok(None);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.max(3)))
            .build()?;
        Ok(Some(Self { client, targets }))
    }

    async fn download(&self, target: &DownloadTarget) -> Result<u64> {
        if let Some(parent) = target.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let partial = partial_path(&target.path);
        let response = self
            .client
            .get(&target.url)
            .send()
            .await?
            .error_for_status()?;

        let mut file = fs::File::create(&partial)
            .await
            .with_context(|| format!("failed to create {}", partial.display()))?;
        let mut written = 0u64;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);

        fs::rename(&partial, &target.path)
            .await
            .with_context(|| format!("failed to move download into {}", target.path.display()))?;
        Ok(written)
    }
}

#[async_trait]
impl LogTransport for HttpLogTransport {
    async fn refresh(&self) -> Result<()> {
        for target in &self.targets {
            debug!(stream = %target.stream, url = %target.url, "downloading stream");
            let bytes = self
                .download(target)
                .await
                .with_context(|| format!("download of {} from {} failed", target.stream, target.url))?;
            info!(stream = %target.stream, bytes, "stream refreshed");
        }
        Ok(())
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_path_sits_next_to_target() {
        assert_eq!(
            partial_path(Path::new("/srv/logs/games_mp.log")),
            PathBuf::from("/srv/logs/games_mp.log.part")
        );
    }

    #[test]
    fn no_urls_means_no_transport() {
        let locations = [StreamLocation {
            stream: LogStream::Enterleave,
            path: PathBuf::from("enterleave.log"),
            url: None,
        }];
        assert!(HttpLogTransport::from_locations(&locations, 10)
            .expect("build")
            .is_none());

        let locations = [StreamLocation {
            stream: LogStream::Enterleave,
            path: PathBuf::from("enterleave.log"),
            url: Some("http://127.0.0.1:4180/enterleave.log".to_string()),
        }];
        let transport = HttpLogTransport::from_locations(&locations, 10)
            .expect("build")
            .expect("transport");
        assert_eq!(transport.targets.len(), 1);
    }
}
