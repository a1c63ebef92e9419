use image::DynamicImage;
use std::fmt::{self, Debug, Formatter};

pub enum Notification {
    LoadingStarted,
    ImageReady(DynamicImage),
    LoadingFailed(String),
}

// Manual Debug: DynamicImage would print the whole pixel buffer.
impl Debug for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Notification::LoadingStarted => write!(f, "LoadingStarted"),
            Notification::ImageReady(image) => write!(f, "ImageReady({}x{})", image.width(), image.height()),
            Notification::LoadingFailed(message) => write!(f, "LoadingFailed({:?})", message),
        }
    }
}
