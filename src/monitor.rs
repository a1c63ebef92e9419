use crate::cache::ImageCache;
use crate::domain::{Coordinate, Notification};
use crate::fetcher::ImageFetcher;
use crate::geo::haversine_distance;
use crate::position::PositionSource;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tracing::{debug, info, instrument, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Monitoring,
}

/// Per-session movement state. The last coordinate updates if and only if a
/// sample moved at least the minimum distance from it; rejected samples leave
/// it unchanged.
#[derive(Debug)]
struct Session {
    last_coordinate: Coordinate,
    min_distance_m: f64,
}

impl Session {
    fn new(min_distance_m: f64) -> Self {
        Session {
            last_coordinate: Coordinate::default(),
            min_distance_m,
        }
    }

    fn accept(&mut self, coordinate: Coordinate) -> bool {
        if haversine_distance(self.last_coordinate, coordinate) < self.min_distance_m {
            return false;
        }

        self.last_coordinate = coordinate;
        true
    }
}

/// Watches a position source and keeps the consumer supplied with a nearby
/// street-level image: samples that pass the distance gate are answered from
/// the cache when possible and fetched otherwise.
///
/// Fetches run as spawned tasks; any number may be in flight if gated samples
/// keep arriving faster than fetches complete, and a stale fetch may still
/// complete after a newer sample was processed. Stopping the monitor does not
/// abort dispatched fetches.
pub struct PositionMonitor<S, F> {
    source: S,
    fetcher: Arc<F>,
    cache: Arc<ImageCache>,
    notifier_tx: Sender<Notification>,
    session: Session,
    update_interval: Duration,
    state: MonitorState,
}

impl<S, F> PositionMonitor<S, F>
where
    S: PositionSource,
    F: ImageFetcher + 'static,
{
    pub fn new(
        source: S,
        fetcher: Arc<F>,
        cache: Arc<ImageCache>,
        notifier_tx: Sender<Notification>,
        min_distance_m: f64,
        update_interval: Duration,
    ) -> Self {
        PositionMonitor {
            source,
            fetcher,
            cache,
            notifier_tx,
            session: Session::new(min_distance_m),
            update_interval,
            state: MonitorState::Idle,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn last_coordinate(&self) -> Coordinate {
        self.session.last_coordinate
    }

    /// Subscribes to the position source. A no-op when already monitoring.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.state == MonitorState::Monitoring {
            warn!("⚠️ Position monitor is already running");
            return Ok(());
        }

        self.source.start_updates(self.update_interval).await?;
        self.state = MonitorState::Monitoring;
        info!("📡 Position updates started, one every {:?}", self.update_interval);

        Ok(())
    }

    /// Ends the subscription. In-flight fetches are not aborted.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) {
        if self.state == MonitorState::Idle {
            return;
        }

        self.source.stop_updates().await;
        self.state = MonitorState::Idle;
        info!("📡 Position updates stopped");
    }

    /// Processes samples until the source ends or `stop` is called.
    #[instrument(skip_all)]
    pub async fn listen(&mut self) {
        while self.state == MonitorState::Monitoring {
            let Some(coordinate) = self.source.recv().await else {
                break;
            };
            self.handle_position(coordinate).await;
        }
    }

    async fn handle_position(&mut self, coordinate: Coordinate) {
        debug!("🛰️ Position update: latitude = {:.6}, longitude = {:.6}", coordinate.latitude, coordinate.longitude);

        if !self.session.accept(coordinate) {
            debug!("🛰️ Moved less than {} m, skipping sample", self.session.min_distance_m);
            return;
        }

        if self.cache.exists(coordinate) {
            if let Some(image) = self.cache.read(coordinate) {
                info!("🖼️ Using cached image for ({:.6}, {:.6})", coordinate.latitude, coordinate.longitude);
                self.notify(Notification::ImageReady(image)).await;
                return;
            }
            warn!("⚠️ Cache entry for ({:.6}, {:.6}) was unreadable, refetching", coordinate.latitude, coordinate.longitude);
        }

        self.notify(Notification::LoadingStarted).await;

        let fetcher = self.fetcher.clone();
        let cache = self.cache.clone();
        let notifier_tx = self.notifier_tx.clone();
        tokio::spawn(async move {
            match fetcher.fetch(coordinate).await {
                Ok(image) => {
                    if let Err(e) = cache.write(coordinate, &image) {
                        warn!("⚠️ Could not cache image for ({:.6}, {:.6}): {}", coordinate.latitude, coordinate.longitude, e);
                    }
                    info!("🖼️ Downloaded and cached image for ({:.6}, {:.6})", coordinate.latitude, coordinate.longitude);
                    notifier_tx.send(Notification::ImageReady(image)).await.unwrap_or_default();
                }
                Err(e) => {
                    notifier_tx.send(Notification::LoadingFailed(e.to_string())).await.unwrap_or_default();
                }
            }
        });
    }

    async fn notify(&self, notification: Notification) {
        self.notifier_tx.send(notification).await.unwrap_or_default();
    }
}
