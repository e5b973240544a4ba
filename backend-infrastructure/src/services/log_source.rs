use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::fs;

use backend_domain::ports::LogSource;
use backend_domain::LogStream;

use crate::config::StreamLocation;

/// Reads the local copy of each stream in full every cycle.
pub struct FileLogSource {
    paths: HashMap<LogStream, PathBuf>,
}

impl FileLogSource {
    pub fn new(locations: &[StreamLocation]) -> Self {
        Self {
            paths: locations
                .iter()
                .map(|location| (location.stream, location.path.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl LogSource for FileLogSource {
    async fn read_lines(&self, stream: LogStream) -> Result<Vec<String>> {
        let path = self
            .paths
            .get(&stream)
            .ok_or_else(|| anyhow!("no path configured for {}", stream))?;
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        // Game logs are not guaranteed to be valid UTF-8.
        Ok(String::from_utf8_lossy(&bytes)
            .lines()
            .map(ToString::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_lines_lossily() {
        let dir = std::env::temp_dir().join(format!("trials-log-source-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).await.expect("create dir");
        let path = dir.join("games_mp.log");
        fs::write(&path, b"first\r\nsec\xffond\nthird").await.expect("write");

        let source = FileLogSource::new(&[StreamLocation {
            stream: LogStream::GameplayEvents,
            path,
            url: None,
        }]);
        let lines = source
            .read_lines(LogStream::GameplayEvents)
            .await
            .expect("lines");
        assert_eq!(lines, vec!["first", "sec\u{fffd}ond", "third"]);
        assert!(source.read_lines(LogStream::Enterleave).await.is_err());

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let source = FileLogSource::new(&[StreamLocation {
            stream: LogStream::ServerState,
            path: std::env::temp_dir().join("trials-does-not-exist.log"),
            url: None,
        }]);
        assert!(source.read_lines(LogStream::ServerState).await.is_err());
    }
}
