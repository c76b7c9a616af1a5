//! Great-circle routes for aircraft
//!
//! A route is a polyline sampled along the great circle between two
//! geoscape coordinates. Consecutive points are a uniform arc apart, so
//! motion code can turn a covered distance directly into a segment
//! index plus an interpolation fraction.

use serde::{Deserialize, Serialize};

use crate::core::config::{ROUTE_MAX_SEGMENTS, ROUTE_STEP_DEGREES};
use crate::core::types::PolarCoord;

/// A precomputed flight path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Waypoints from departure to destination, at least two entries
    /// for any non-degenerate route
    pub points: Vec<PolarCoord>,
    /// Arc length between consecutive points, degrees
    pub dist: f32,
}

impl Route {
    /// Sample the great circle from `from` to `to`.
    ///
    /// The segment count grows with the arc up to [`ROUTE_MAX_SEGMENTS`];
    /// a degenerate zero-length arc still produces two points so callers
    /// can treat every route uniformly.
    pub fn calculate(from: PolarCoord, to: PolarCoord) -> Self {
        let angle = from.arc_to(&to);
        let segments = ((angle / ROUTE_STEP_DEGREES).ceil() as usize).clamp(1, ROUTE_MAX_SEGMENTS);

        let a = from.to_cartesian();
        let b = to.to_cartesian();
        let theta = (angle as f64).to_radians();
        let sin_theta = theta.sin();

        let mut points = Vec::with_capacity(segments + 1);
        for i in 0..=segments {
            let t = i as f64 / segments as f64;
            let (wa, wb) = if sin_theta.abs() < 1e-6 {
                // endpoints (nearly) coincide, interpolate linearly
                (1.0 - t, t)
            } else {
                (
                    ((1.0 - t) * theta).sin() / sin_theta,
                    (t * theta).sin() / sin_theta,
                )
            };
            let v = [
                (wa * a[0] as f64 + wb * b[0] as f64) as f32,
                (wa * a[1] as f64 + wb * b[1] as f64) as f32,
                (wa * a[2] as f64 + wb * b[2] as f64) as f32,
            ];
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            let v = if len > 1e-6 {
                [v[0] / len, v[1] / len, v[2] / len]
            } else {
                a
            };
            points.push(PolarCoord::from_cartesian(v));
        }
        // pin the exact endpoints against rounding
        points[0] = from;
        if let Some(last) = points.last_mut() {
            *last = to;
        }

        Self {
            points,
            dist: angle / segments as f32,
        }
    }

    /// Total arc length of the route, degrees
    pub fn length(&self) -> f32 {
        self.dist * (self.points.len().saturating_sub(1)) as f32
    }

    /// Final waypoint
    pub fn end(&self) -> PolarCoord {
        self.points.last().copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }
}
