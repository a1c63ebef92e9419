use crate::app_config::AppConfig;
use crate::cache::ImageCache;
use crate::domain::Notification;
use crate::fetcher::KartaViewFetcher;
use crate::monitor::PositionMonitor;
use crate::notification_listener::notification_listener;
use crate::position::ReplaySource;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task;
use tracing::info;

mod app_config;
mod cache;
mod domain;
mod fetcher;
mod geo;
mod monitor;
mod notification_listener;
mod position;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load();
    info!("✅  Loaded configuration");

    let cache = Arc::new(ImageCache::new(config.cache().directory())?);
    info!("✅  Initialized image cache at '{}'", config.cache().directory());

    let fetcher = Arc::new(KartaViewFetcher::new(
        Client::new(),
        config.kartaview().url(),
        config.kartaview().zoom_level(),
    ));

    let (tx, rx) = mpsc::channel::<Notification>(config.core().notifier_buffer_size());
    task::spawn(async move {
        notification_listener(rx).await;
    });
    info!("✅  Initialized notification listener");

    let source = ReplaySource::new(config.position().replay_file());
    let mut monitor = PositionMonitor::new(
        source,
        fetcher,
        cache,
        tx,
        config.monitor().min_distance_m(),
        config.monitor().update_interval(),
    );

    monitor.start().await?;
    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    monitor.listen().await;
    monitor.stop().await;

    Ok(())
}
