//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// A point on the geoscape in polar coordinates.
///
/// `lon` runs from -180 to 180 degrees, `lat` from -90 (south pole)
/// to 90 (north pole).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarCoord {
    pub lon: f32,
    pub lat: f32,
}

impl PolarCoord {
    pub fn new(lon: f32, lat: f32) -> Self {
        Self { lon, lat }
    }

    /// Axis-wise proximity test used for arrival checks: both coordinate
    /// deltas must be below `dist` degrees.
    pub fn within_box(&self, other: &Self, dist: f32) -> bool {
        (self.lon - other.lon).abs() < dist && (self.lat - other.lat).abs() < dist
    }

    /// Unit vector on the sphere for this coordinate.
    pub fn to_cartesian(&self) -> [f32; 3] {
        let lon = self.lon.to_radians();
        let lat = self.lat.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }

    /// Coordinate for a unit vector on the sphere.
    pub fn from_cartesian(v: [f32; 3]) -> Self {
        let lat = v[2].clamp(-1.0, 1.0).asin().to_degrees();
        let lon = v[1].atan2(v[0]).to_degrees();
        Self { lon, lat }
    }

    /// Great-circle angle to another coordinate, in degrees.
    pub fn arc_to(&self, other: &Self) -> f32 {
        let a = self.to_cartesian();
        let b = other.to_cartesian();
        let dot = (a[0] * b[0] + a[1] * b[1] + a[2] * b[2]).clamp(-1.0, 1.0);
        dot.acos().to_degrees()
    }
}

/// Index of a base in the campaign's base arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseId(pub usize);

/// Index of an item in the item catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub usize);

/// Location of an aircraft: which base owns it and which hangar slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftRef {
    pub base: BaseId,
    pub slot: usize,
}
