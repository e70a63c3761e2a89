//! Captured clip records as delivered by the photo library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::{AffineTransform, Size};

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Arithmetic mean of the given coordinates, `None` when there are none.
    ///
    /// The result is clamped to the range of the inputs so rounding in the
    /// sum never places it outside them.
    pub fn mean<I>(coordinates: I) -> Option<Coordinate>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut count = 0usize;
        let (mut lat_sum, mut lon_sum) = (0.0, 0.0);
        let (mut lat_min, mut lat_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut lon_min, mut lon_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for c in coordinates {
            count += 1;
            lat_sum += c.latitude;
            lon_sum += c.longitude;
            lat_min = lat_min.min(c.latitude);
            lat_max = lat_max.max(c.latitude);
            lon_min = lon_min.min(c.longitude);
            lon_max = lon_max.max(c.longitude);
        }

        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Coordinate::new(
            (lat_sum / n).max(lat_min).min(lat_max),
            (lon_sum / n).max(lon_min).min(lon_max),
        ))
    }
}

/// Geotag attached to a clip at capture time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of uncertainty in meters. Negative means the fix is invalid.
    #[serde(default)]
    pub horizontal_accuracy: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, horizontal_accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            horizontal_accuracy,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
            && self.horizontal_accuracy >= 0.0
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Stable library identifier
    pub id: String,
    /// Capture instant; `None` when the library has no creation date
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub duration_seconds: f64,
    /// Encoded pixel size before orientation is applied
    pub natural_size: Size,
    /// Rotation/flip needed to display the clip upright
    #[serde(default)]
    pub preferred_transform: AffineTransform,
    #[serde(default)]
    pub location: Option<Location>,
}

impl MediaRecord {
    /// Create a record with identity orientation and no geotag
    pub fn new(
        id: impl Into<String>,
        created_at: Option<DateTime<Utc>>,
        duration_seconds: f64,
        natural_size: Size,
    ) -> Self {
        Self {
            id: id.into(),
            created_at,
            duration_seconds,
            natural_size,
            preferred_transform: AffineTransform::IDENTITY,
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_transform(mut self, transform: AffineTransform) -> Self {
        self.preferred_transform = transform;
        self
    }

    /// Coordinate of a usable geotag, if any
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.location
            .filter(Location::is_valid)
            .map(|loc| loc.coordinate())
    }

    pub fn is_geotagged(&self) -> bool {
        self.coordinate().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_nothing_is_undefined() {
        assert_eq!(Coordinate::mean(Vec::new()), None);
    }

    #[test]
    fn test_mean_is_unweighted() {
        let mean = Coordinate::mean(vec![
            Coordinate::new(10.0, 20.0),
            Coordinate::new(20.0, 40.0),
        ])
        .unwrap();
        assert_eq!(mean, Coordinate::new(15.0, 30.0));
    }

    #[test]
    fn test_mean_of_identical_points_is_exact() {
        let mean = Coordinate::mean(vec![Coordinate::new(0.1, 0.1); 3]).unwrap();
        assert_eq!(mean, Coordinate::new(0.1, 0.1));
    }

    #[test]
    fn test_invalid_fix_is_not_geotagged() {
        let record = MediaRecord::new("a", None, 1.0, Size::new(1920.0, 1080.0))
            .with_location(Location::new(35.0, 139.0, -1.0));
        assert!(!record.is_geotagged());

        let record = record.with_location(Location::new(35.0, 139.0, 5.0));
        assert_eq!(record.coordinate(), Some(Coordinate::new(35.0, 139.0)));
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let json = r#"{
            "id": "clip-1",
            "duration_seconds": 3.0,
            "natural_size": { "width": 1920, "height": 1080 }
        }"#;
        let record: MediaRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, "clip-1");
        assert_eq!(record.created_at, None);
        assert_eq!(record.preferred_transform, AffineTransform::IDENTITY);
        assert!(record.location.is_none());
    }
}
