use crate::domain::Notification;
use tokio::sync::mpsc::Receiver;
use tracing::{info, instrument, warn};

/// Consumes notifications and logs them. Stands in for a UI layer; a real
/// consumer would swap this task for its own receiver.
#[instrument(skip_all)]
pub async fn notification_listener(mut rx: Receiver<Notification>) {
    while let Some(notification) = rx.recv().await {
        match notification {
            Notification::LoadingStarted => info!("🖼️ Loading street-level image..."),
            Notification::ImageReady(image) => {
                info!("🖼️ Street-level image ready ({}x{})", image.width(), image.height())
            }
            Notification::LoadingFailed(message) => warn!("⚠️ Loading street-level image failed: {}", message),
        }
    }
}
