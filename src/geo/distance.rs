//! Great-circle distance between two coordinates.

use std::fmt;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Haversine distance in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Coarse grading of a distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceClass {
    /// Up to 1 km.
    Near,
    /// Up to 2 km.
    Moderate,
    Far,
}

impl DistanceClass {
    pub fn from_km(km: f64) -> Self {
        if km <= 1.0 {
            DistanceClass::Near
        } else if km <= 2.0 {
            DistanceClass::Moderate
        } else {
            DistanceClass::Far
        }
    }
}

impl fmt::Display for DistanceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceClass::Near => f.write_str("near"),
            DistanceClass::Moderate => f.write_str("moderate"),
            DistanceClass::Far => f.write_str("far"),
        }
    }
}
