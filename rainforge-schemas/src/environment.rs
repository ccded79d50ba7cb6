use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement<T> {
    pub value: T,
    pub unit: String,
}

impl<T> Measurement<T> {
    pub fn new(value: T, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_string(),
        }
    }
}

impl Measurement<f64> {
    pub fn meters(value: f64) -> Self {
        Self::new(value, "m")
    }

    pub fn cubic_meters(value: f64) -> Self {
        Self::new(value, "m3")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar distance in degrees. Good enough for nearest-centroid matching
    /// over a sub-continental table.
    pub fn distance_deg(&self, other: &Coordinates) -> f64 {
        let dlat = self.lat - other.lat;
        let dlng = self.lng - other.lng;
        (dlat * dlat + dlng * dlng).sqrt()
    }
}

/// Axis-aligned lat/lng rectangle, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBox {
    pub fn contains(&self, point: &Coordinates) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }

    pub fn is_well_formed(&self) -> bool {
        self.min_lat <= self.max_lat && self.min_lng <= self.max_lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geobox_bounds_are_inclusive() {
        let b = GeoBox {
            min_lat: 20.0,
            max_lat: 30.0,
            min_lng: 74.0,
            max_lng: 78.0,
        };
        assert!(b.contains(&Coordinates::new(20.0, 78.0)));
        assert!(b.contains(&Coordinates::new(28.6139, 77.2090)));
        assert!(!b.contains(&Coordinates::new(30.01, 77.0)));
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinates::new(28.0, 77.0);
        let b = Coordinates::new(31.0, 81.0);
        assert!((a.distance_deg(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance_deg(&b), b.distance_deg(&a));
    }
}
