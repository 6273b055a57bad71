//! Corrections between civil time and local mean solar time.
//!
//! Each degree of longitude is worth four minutes of solar time. Comparing
//! that with the standard offset of a location's time zone gives the local
//! mean time offset, and an offset of 20 hours or more means the civil date
//! at the location is a full day away from its solar date.

use crate::coord::Coordinate;
use chrono::{DateTime, Utc};

const MINUTE_MILLIS: f64 = 60.0 * 1000.0;
const HOUR_MILLIS: f64 = MINUTE_MILLIS * 60.0;
const ANTIMERIDIAN_THRESHOLD_HOURS: f64 = 20.0;

/// Return the local mean time offset in milliseconds for a longitude and a
/// standard (non-DST) time zone offset. Fractions of a millisecond are
/// truncated.
pub fn local_mean_time_offset_millis_for(
    longitude: f64,
    raw_offset_millis: i64,
) -> i64 {
    (longitude * 4.0 * MINUTE_MILLIS - raw_offset_millis as f64) as i64
}

/// Return the number of days, -1, 0 or 1, by which the civil date must be
/// moved for a location with the given local mean time offset.
pub fn antimeridian_adjustment_days_for(offset_millis: i64) -> i32 {
    let hours = offset_millis as f64 / HOUR_MILLIS;
    if hours >= ANTIMERIDIAN_THRESHOLD_HOURS {
        1
    } else if hours <= -ANTIMERIDIAN_THRESHOLD_HOURS {
        -1
    } else {
        0
    }
}

/// Return the difference in milliseconds between the local mean time at
/// `coordinate` and the standard time of its time zone. Daylight saving
/// time is ignored.
/// # Example
/// ```rust
/// use geoloc::{local_mean_time_offset_millis, Coordinate};
///
/// let jerusalem = Coordinate::with_raw_offset("Jerusalem", 31.778, 35.2354, 754.0, 7_200_000).unwrap();
/// assert_eq!(local_mean_time_offset_millis(&jerusalem), 1_256_496);
/// ```
pub fn local_mean_time_offset_millis(coordinate: &Coordinate) -> i64 {
    local_mean_time_offset_millis_for(
        coordinate.longitude(),
        coordinate.raw_offset_millis(),
    )
}

/// Like [`local_mean_time_offset_millis`], using the standard offset which
/// the time zone had at `instant`.
pub fn local_mean_time_offset_millis_at(
    coordinate: &Coordinate,
    instant: DateTime<Utc>,
) -> i64 {
    local_mean_time_offset_millis_for(
        coordinate.longitude(),
        coordinate.time_zone().raw_offset_millis_at(instant),
    )
}

/// Return the number of days, -1, 0 or 1, by which a date at `coordinate`
/// is displaced because its time zone is on the other side of the
/// antimeridian. Almost everywhere this is 0.
///
/// A zone kept east of the antimeridian by a location lying west of it,
/// such as Samoa at -171.75° on +14:00, gives -1.
pub fn antimeridian_adjustment_days(coordinate: &Coordinate) -> i32 {
    antimeridian_adjustment_days_for(local_mean_time_offset_millis(coordinate))
}

/// Like [`antimeridian_adjustment_days`], using the standard offset which
/// the time zone had at `instant`.
pub fn antimeridian_adjustment_days_at(
    coordinate: &Coordinate,
    instant: DateTime<Utc>,
) -> i32 {
    antimeridian_adjustment_days_for(local_mean_time_offset_millis_at(
        coordinate, instant,
    ))
}
