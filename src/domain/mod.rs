mod coordinate;
mod notification;

pub use coordinate::Coordinate;
pub use notification::Notification;
