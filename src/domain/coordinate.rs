use serde::Deserialize;

/// A position in floating-point degrees. Values are taken as reported by the
/// position source; out-of-range coordinates propagate silently.
#[derive(Clone, Copy, Default, Debug, PartialEq, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate { latitude, longitude }
    }
}
