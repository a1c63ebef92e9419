use crate::domain::Coordinate;
use crate::position::PositionSource;
use async_trait::async_trait;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{self, Receiver};
use tokio::task::JoinHandle;
use tokio::{fs, time};
use tracing::{info, instrument};

/// Position source that replays a JSON array of coordinates from a file at
/// the configured interval. Stands in for GPS hardware.
pub struct ReplaySource {
    path: PathBuf,
    rx: Option<Receiver<Coordinate>>,
    replay_task: Option<JoinHandle<()>>,
}

impl ReplaySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ReplaySource {
            path: path.into(),
            rx: None,
            replay_task: None,
        }
    }
}

#[async_trait]
impl PositionSource for ReplaySource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn start_updates(&mut self, interval: Duration) -> Result<(), Box<dyn Error + Send + Sync>> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| ReplayError::Io {
            source: e,
            path: self.path.clone(),
        })?;
        let coordinates = serde_json::from_str::<Vec<Coordinate>>(&content).map_err(ReplayError::Parse)?;
        info!("🛰️ Replaying {} positions from '{}'...", coordinates.len(), self.path.display());

        let (tx, rx) = mpsc::channel(1);
        self.replay_task = Some(tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            for coordinate in coordinates {
                ticker.tick().await;
                if tx.send(coordinate).await.is_err() {
                    break;
                }
            }
        }));
        self.rx = Some(rx);

        Ok(())
    }

    async fn stop_updates(&mut self) {
        if let Some(task) = self.replay_task.take() {
            task.abort();
        }
        self.rx = None;
    }

    async fn recv(&mut self) -> Option<Coordinate> {
        match self.rx.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("could not read replay file '{path}': {source}")]
    Io { source: std::io::Error, path: PathBuf },
    #[error("could not parse replay file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn replays_all_coordinates_in_order_then_ends() -> Result<(), Box<dyn Error + Send + Sync>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("positions.json");
        std::fs::write(
            &path,
            r#"[{"latitude": 10.0, "longitude": 20.0}, {"latitude": 10.5, "longitude": 20.5}]"#,
        )?;

        let mut source = ReplaySource::new(&path);
        source.start_updates(Duration::from_millis(1)).await?;

        assert_eq!(source.recv().await, Some(Coordinate::new(10.0, 20.0)));
        assert_eq!(source.recv().await, Some(Coordinate::new(10.5, 20.5)));
        assert_eq!(source.recv().await, None);

        Ok(())
    }

    #[tokio::test]
    async fn recv_returns_none_after_stop() -> Result<(), Box<dyn Error + Send + Sync>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("positions.json");
        std::fs::write(&path, r#"[{"latitude": 1.0, "longitude": 2.0}]"#)?;

        let mut source = ReplaySource::new(&path);
        source.start_updates(Duration::from_millis(1)).await?;
        source.stop_updates().await;

        assert_eq!(source.recv().await, None);

        Ok(())
    }

    #[tokio::test]
    async fn missing_replay_file_fails_to_start() {
        let mut source = ReplaySource::new("/nonexistent/positions.json");

        let result = source.start_updates(Duration::from_millis(1)).await;

        assert!(result.is_err());
    }
}
