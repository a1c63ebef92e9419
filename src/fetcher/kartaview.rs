use crate::domain::Coordinate;
use crate::fetcher::{FetchError, ImageFetcher};
use async_trait::async_trait;
use image::DynamicImage;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Fetches street-level photos from the KartaView (OpenStreetCam) API in two
/// stages: a metadata search around the coordinate, then a download of the
/// first candidate's thumbnail.
pub struct KartaViewFetcher {
    client: Client,
    base_url: String,
    zoom_level: u8,
}

#[derive(Debug, Deserialize)]
struct PhotoSearchResponse {
    #[serde(default)]
    photos: Vec<PhotoGet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhotoGet {
    #[serde(default)]
    thumbnail_url: Option<String>,
}

impl KartaViewFetcher {
    pub fn new(client: Client, base_url: impl Into<String>, zoom_level: u8) -> Self {
        KartaViewFetcher {
            client,
            base_url: base_url.into(),
            zoom_level,
        }
    }

    fn search_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/2.0/photo/?lat={:.6}&lng={:.6}&zoomLevel={}",
            self.base_url, coordinate.latitude, coordinate.longitude, self.zoom_level
        )
    }
}

#[async_trait]
impl ImageFetcher for KartaViewFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, coordinate: Coordinate) -> Result<DynamicImage, FetchError> {
        debug!("📷 Searching for photos near ({:.6}, {:.6})...", coordinate.latitude, coordinate.longitude);
        let search = self
            .client
            .get(self.search_url(coordinate))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(FetchError::MetadataRequest)?
            .json::<PhotoSearchResponse>()
            .await
            .map_err(FetchError::MetadataRequest)?;

        let photo = search.photos.first().ok_or(FetchError::NoNearbyPhotos)?;
        let thumbnail_url = photo
            .thumbnail_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(FetchError::MissingThumbnailUrl)?;

        debug!("📷 Downloading thumbnail '{}'...", thumbnail_url);
        let bytes = self
            .client
            .get(thumbnail_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(FetchError::ThumbnailRequest)?
            .bytes()
            .await
            .map_err(FetchError::ThumbnailRequest)?;

        image::load_from_memory(&bytes).map_err(FetchError::UndecodableImage)
    }
}
