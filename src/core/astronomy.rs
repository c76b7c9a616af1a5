//! Solar position test for the geoscape
//!
//! Determines whether a coordinate is on the night side of the planet at
//! a given campaign instant. Used to pick day or night variants of
//! mission maps. The model is a circular orbit with a fixed axial tilt;
//! precision is display-grade, not astronomical.

use std::f64::consts::PI;

use crate::core::date::Date;
use crate::core::types::PolarCoord;

/// Axial tilt of the planet, radians
const AXIAL_TILT: f64 = 23.44 * PI / 180.0;

/// True if `pos` is in darkness at `date`.
///
/// Computes the sun direction from the day-of-year (orbital angle) and
/// the seconds-of-day (rotation angle), then signs the dot product
/// against the surface normal at `pos`.
pub fn is_night(pos: PolarCoord, date: Date) -> bool {
    let day_frac = date.sec as f64 / (3600.0 * 24.0);
    let q = (date.day as f64 + day_frac) * 2.0 * PI / 365.25 - PI;
    let p = (0.5 + pos.lon as f64 / 360.0 - day_frac) * 2.0 * PI - q;
    let a = (pos.lat as f64 * PI / 180.0).sin();
    let root = (1.0 - a * a).sqrt();
    let x = p.sin() * root * q.sin()
        - (a * AXIAL_TILT.sin() + p.cos() * root * AXIAL_TILT.cos()) * q.cos();
    x > 0.0
}
