use geo::{GeodesicDistance, Point};

// metres
pub const DEFAULT_THRESHOLD: f64 = 50.0;

/// Geocoding jitters between calls, so two coordinates count as the same
/// place when they are within `threshold` metres of each other.
#[derive(Debug, Clone, Copy)]
pub struct Comparator {
    threshold: f64,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl Comparator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Geodesic (WGS84) distance in metres.
    pub fn distance(&self, a: &Point, b: &Point) -> f64 {
        a.geodesic_distance(b)
    }

    pub fn is_same(&self, a: &Point, b: &Point) -> bool {
        self.distance(a, b) <= self.threshold
    }
}

/// Build a point from provider lat/lng order.
pub fn coordinate(lat: f64, lng: f64) -> Point {
    Point::new(lng, lat)
}
