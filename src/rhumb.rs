//! Rhumb lines (loxodromes): paths of constant compass bearing, computed on
//! a sphere with the WGS-84 equatorial radius.

use crate::coord::Coordinate;
use crate::geodesic::WGS84_SEMI_MAJOR_AXIS;
use std::f64::consts::{FRAC_PI_4, PI};
use tracing::debug;

/// Below this magnitude the difference in projected latitude is treated as
/// zero, and the line is considered to run due east or west.
pub const RHUMB_EPSILON: f64 = 1e-12;

/// Return the constant bearing in degrees of the rhumb line from `from` to
/// `to`, taking the shorter way around across the 180° meridian.
pub fn rhumb_bearing(from: &Coordinate, to: &Coordinate) -> f64 {
    let mut delta_lon = (to.longitude() - from.longitude()).to_radians();
    let delta_psi = projected_latitude_difference(from, to);
    if delta_lon.abs() > PI {
        delta_lon = if delta_lon > 0.0 {
            -(2.0 * PI - delta_lon)
        } else {
            2.0 * PI + delta_lon
        };
    }
    delta_lon.atan2(delta_psi).to_degrees()
}

/// Return the distance in meters along the rhumb line from `from` to `to`.
/// # Example
/// ```rust
/// use geoloc::{rhumb_distance, Coordinate, TimeZone};
///
/// let tz = TimeZone::utc();
/// let a = Coordinate::new("a", 0.0, 0.0, 0.0, tz).unwrap();
/// let b = Coordinate::new("b", 10.0, 0.0, 0.0, tz).unwrap();
/// assert!((rhumb_distance(&a, &b) - 1_113_194.908).abs() < 1e-3);
/// ```
pub fn rhumb_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1 = from.latitude().to_radians();
    let delta_lat = to.latitude().to_radians() - lat1;
    let mut delta_lon =
        (to.longitude().to_radians() - from.longitude().to_radians()).abs();
    let delta_psi = projected_latitude_difference(from, to);

    let q = if delta_psi.abs() < RHUMB_EPSILON {
        debug!(from = %from.name(), to = %to.name(), "east-west rhumb line");
        lat1.cos()
    } else {
        let q = delta_lat / delta_psi;
        if q.is_finite() {
            q
        } else {
            lat1.cos()
        }
    };

    // Over 180° take the shorter rhumb line across the 180° meridian.
    if delta_lon > PI {
        delta_lon = 2.0 * PI - delta_lon;
    }

    WGS84_SEMI_MAJOR_AXIS * (delta_lat * delta_lat + q * q * delta_lon * delta_lon).sqrt()
}

/// Difference in Mercator projected latitude between the two points.
fn projected_latitude_difference(from: &Coordinate, to: &Coordinate) -> f64 {
    ((to.latitude().to_radians() / 2.0 + FRAC_PI_4).tan()
        / (from.latitude().to_radians() / 2.0 + FRAC_PI_4).tan())
    .ln()
}
