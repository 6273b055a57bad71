//! # Overview
//! This crate models named geographic locations on the WGS-84 ellipsoid and
//! computes the relationships between them:
//!
//! * geodesic distance, initial bearing and final bearing, using Vincenty's
//!   inverse formula,
//! * rhumb line (constant bearing) distance and bearing,
//! * the local mean time offset of a location relative to its time zone,
//!   and whether its civil date is displaced by the antimeridian.
//!
//! Vincenty's formula does not converge for some nearly antipodal points.
//! The geodesic functions return NaN in that case, so callers should check
//! the result with `f64::is_nan`, or use `Vincenty::inverse`, which returns
//! an `Option`.
//!
//! # Usage
//! ```rust
//! use geoloc::{Coordinate, TimeZone};
//!
//! let jerusalem = Coordinate::new(
//!     "Jerusalem",
//!     31.778,
//!     35.2354,
//!     754.0,
//!     TimeZone::parse("Asia/Jerusalem").unwrap(),
//! )
//! .unwrap();
//! let lakewood = Coordinate::new(
//!     "Lakewood, NJ",
//!     40.0828,
//!     -74.2094,
//!     20.0,
//!     TimeZone::parse("New_York").unwrap(),
//! )
//! .unwrap();
//!
//! let meters = jerusalem.geodesic_distance(&lakewood);
//! let bearing = jerusalem.geodesic_initial_bearing(&lakewood);
//! assert!(meters < jerusalem.rhumb_distance(&lakewood));
//! assert!(bearing < 0.0);
//!
//! // Print a description of the location:
//! println!("{}", jerusalem.report().to_xml().unwrap());
//! ```

mod coord;
mod err;
mod geodesic;
mod offset;
mod report;
mod rhumb;
mod tz;

pub use coord::Coordinate;
pub use err::{DomainError, ReportError};
pub use geodesic::{
    geodesic_distance, geodesic_final_bearing, geodesic_initial_bearing,
    GeodesicQuantity, GeodesicSolution, Vincenty, WGS84_FLATTENING,
    WGS84_SEMI_MAJOR_AXIS, WGS84_SEMI_MINOR_AXIS,
};
pub use offset::{
    antimeridian_adjustment_days, antimeridian_adjustment_days_at,
    antimeridian_adjustment_days_for, local_mean_time_offset_millis,
    local_mean_time_offset_millis_at, local_mean_time_offset_millis_for,
};
pub use report::Report;
pub use rhumb::{rhumb_bearing, rhumb_distance, RHUMB_EPSILON};
pub use tz::TimeZone;
