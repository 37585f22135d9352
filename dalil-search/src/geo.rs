//! Great-circle distance and travel-mode categories
//!
//! Spherical Earth model; the usual haversine approximation error is accepted.

use dalil_common::Coordinate;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distances below this are walkable
pub const WALKING_LIMIT_KM: f64 = 1.0;

/// Distances below this (and not walkable) suit a bicycle
pub const BICYCLE_LIMIT_KM: f64 = 5.0;

/// Haversine distance between two points given in degrees
///
/// Always non-negative.
pub fn distance_km(origin_lat: f64, origin_lng: f64, target_lat: f64, target_lng: f64) -> f64 {
    let phi1 = origin_lat.to_radians();
    let phi2 = target_lat.to_radians();
    let d_phi = (target_lat - origin_lat).to_radians();
    let d_lambda = (target_lng - origin_lng).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` just outside [0, 1]
    let a = a.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// [`distance_km`] for two coordinates
pub fn distance_between(origin: Coordinate, target: Coordinate) -> f64 {
    distance_km(
        origin.latitude,
        origin.longitude,
        target.latitude,
        target.longitude,
    )
}

/// Coarse travel mode for a distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceCategory {
    Walking,
    Bicycle,
    Car,
}

impl std::fmt::Display for DistanceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceCategory::Walking => write!(f, "walking"),
            DistanceCategory::Bicycle => write!(f, "bicycle"),
            DistanceCategory::Car => write!(f, "car"),
        }
    }
}

/// Travel mode for `distance_km`
///
/// Thresholds are strict: exactly 1.0 is `Bicycle`, exactly 5.0 is `Car`.
pub fn category_of(distance_km: f64) -> DistanceCategory {
    if distance_km < WALKING_LIMIT_KM {
        DistanceCategory::Walking
    } else if distance_km < BICYCLE_LIMIT_KM {
        DistanceCategory::Bicycle
    } else {
        DistanceCategory::Car
    }
}

/// Arabic display form: meters below 1 km, otherwise kilometers to one decimal
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < WALKING_LIMIT_KM {
        let meters = (distance_km * 1000.0).round() as i64;
        format!("{} م", meters)
    } else {
        format!("{:.1} كم", distance_km)
    }
}
