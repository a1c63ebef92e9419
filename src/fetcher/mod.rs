mod kartaview;

pub use kartaview::KartaViewFetcher;

use crate::domain::Coordinate;
use async_trait::async_trait;
use image::DynamicImage;
use thiserror::Error;

/// Retrieves a street-level image near a coordinate. Injected into the
/// position monitor so tests can substitute a fake.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, coordinate: Coordinate) -> Result<DynamicImage, FetchError>;
}

/// Terminal failure modes of a single fetch attempt. None are retried; each
/// surfaces to the consumer as one `LoadingFailed` notification carrying the
/// `Display` text.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{0}")]
    MetadataRequest(#[source] reqwest::Error),
    #[error("No nearby OpenStreetCam image found.")]
    NoNearbyPhotos,
    #[error("No valid OpenStreetCam image URL found.")]
    MissingThumbnailUrl,
    #[error("{0}")]
    ThumbnailRequest(#[source] reqwest::Error),
    #[error("Failed to load OpenStreetCam image.")]
    UndecodableImage(#[source] image::ImageError),
}
