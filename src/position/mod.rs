mod replay;

pub use replay::{ReplayError, ReplaySource};

use crate::domain::Coordinate;
use async_trait::async_trait;
use std::error::Error;
use std::time::Duration;

/// A stream of periodic position samples with start/stop subscription
/// controls. Implementations wrap whatever actually reports positions (GPS
/// hardware, a replay file, a test fixture).
#[async_trait]
pub trait PositionSource: Send {
    /// Begins delivering samples at the given interval.
    async fn start_updates(&mut self, interval: Duration) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Ends the subscription. Samples are not queued while stopped.
    async fn stop_updates(&mut self);

    /// The next sample, or `None` once updates have ended.
    async fn recv(&mut self) -> Option<Coordinate>;
}
