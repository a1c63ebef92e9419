use crate::domain::Coordinate;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Mutex;
use std::{fs, io};
use thiserror::Error;
use tracing::warn;

const JPEG_QUALITY: u8 = 75;

/// Derives the on-disk key for a coordinate. Formatting to six decimal places
/// buckets coordinates that differ only beyond the sixth decimal into the
/// same entry.
pub fn cache_key(coordinate: Coordinate) -> String {
    format!("{:.6}_{:.6}", coordinate.latitude, coordinate.longitude)
}

/// Flat on-disk cache of street-level images, one JPEG per coordinate key.
///
/// Entries are created on first successful fetch and never expire. Writes are
/// create-or-replace and serialized by a lock so completions of overlapping
/// fetches do not interleave file writes; reads are unguarded.
pub struct ImageCache {
    directory: PathBuf,
    write_lock: Mutex<()>,
}

impl ImageCache {
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;

        Ok(ImageCache {
            directory,
            write_lock: Mutex::new(()),
        })
    }

    /// Changes the cache root, creating it if absent. Existing entries are
    /// left behind in the old directory.
    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) -> Result<(), CacheError> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        self.directory = directory;

        Ok(())
    }

    pub fn exists(&self, coordinate: Coordinate) -> bool {
        self.entry_path(coordinate).is_file()
    }

    /// Loads and decodes the entry for a coordinate. Returns `None` when the
    /// entry is missing or undecodable; corrupt entries are logged and
    /// treated as misses.
    pub fn read(&self, coordinate: Coordinate) -> Option<DynamicImage> {
        let path = self.entry_path(coordinate);
        match image::open(&path) {
            Ok(image) => Some(image),
            Err(image::ImageError::IoError(_)) => None,
            Err(e) => {
                warn!("⚠️ Unreadable cache entry '{}': {}", path.display(), e);
                None
            }
        }
    }

    /// Re-encodes the image as JPEG at fixed quality and writes it to the
    /// coordinate's entry path, replacing any existing entry.
    pub fn write(&self, coordinate: Coordinate, image: &DynamicImage) -> Result<(), CacheError> {
        let path = self.entry_path(coordinate);
        let _guard = self.write_lock.lock().unwrap();

        let file = fs::File::create(&path)?;
        let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
        image.to_rgb8().write_with_encoder(encoder)?;

        Ok(())
    }

    fn entry_path(&self, coordinate: Coordinate) -> PathBuf {
        self.directory.join(format!("{}.jpg", cache_key(coordinate)))
    }
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("could not encode cache entry: {0}")]
    Encode(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn test_image() -> DynamicImage {
        let buffer = RgbImage::from_fn(64, 64, |x, y| Rgb([x as u8 * 4, y as u8 * 4, 128]));
        DynamicImage::ImageRgb8(buffer)
    }

    #[test]
    fn coordinates_differing_beyond_the_sixth_decimal_share_a_key() {
        let a = cache_key(Coordinate::new(1.0000001, 2.0000002));
        let b = cache_key(Coordinate::new(1.0000004, 2.0000003));

        assert_eq!(a, b);
        assert_eq!(a, "1.000000_2.000000");
    }

    #[test]
    fn write_then_read_yields_a_decodable_image() -> Result<(), CacheError> {
        let dir = TempDir::new()?;
        let cache = ImageCache::new(dir.path())?;
        let coordinate = Coordinate::new(10.0, 20.0);

        cache.write(coordinate, &test_image())?;

        assert!(cache.exists(coordinate));
        let image = cache.read(coordinate).expect("entry should decode");
        assert_eq!(image.width(), 64);
        assert_eq!(image.height(), 64);

        Ok(())
    }

    #[test]
    fn missing_entry_reads_as_none() -> Result<(), CacheError> {
        let dir = TempDir::new()?;
        let cache = ImageCache::new(dir.path())?;

        assert!(!cache.exists(Coordinate::new(1.0, 2.0)));
        assert!(cache.read(Coordinate::new(1.0, 2.0)).is_none());

        Ok(())
    }

    #[test]
    fn corrupt_entry_reads_as_none() -> Result<(), CacheError> {
        let dir = TempDir::new()?;
        let cache = ImageCache::new(dir.path())?;
        let coordinate = Coordinate::new(3.0, 4.0);

        fs::write(dir.path().join(format!("{}.jpg", cache_key(coordinate))), b"not a jpeg")?;

        assert!(cache.exists(coordinate));
        assert!(cache.read(coordinate).is_none());

        Ok(())
    }

    #[test]
    fn set_directory_creates_the_new_root() -> Result<(), CacheError> {
        let dir = TempDir::new()?;
        let mut cache = ImageCache::new(dir.path().join("first"))?;

        let second = dir.path().join("second");
        cache.set_directory(&second)?;

        assert!(second.is_dir());

        Ok(())
    }
}
