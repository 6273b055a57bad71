use crate::err::{DomainError, Result};
use crate::geodesic::{GeodesicQuantity, Vincenty};
use crate::offset;
use crate::report::Report;
use crate::rhumb;
use crate::tz::TimeZone;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::hash::{Hash, Hasher};
use tracing::debug;

const HOUR_MILLIS: f64 = 60.0 * 60.0 * 1000.0;

/// A named location on the WGS-84 ellipsoid, together with the time zone
/// observed there.
///
/// Latitude and longitude are always kept within their valid ranges: a
/// setter given an out of range value returns a `DomainError` and leaves
/// the `Coordinate` as it was.
#[derive(Clone, Debug)]
pub struct Coordinate {
    name: String,
    latitude: f64,
    longitude: f64,
    elevation: f64,
    time_zone: TimeZone,
}

impl Coordinate {
    /// Create a new `Coordinate`.
    /// # Example
    /// ```rust
    /// use geoloc::{Coordinate, TimeZone};
    ///
    /// let tz = TimeZone::parse("America/New_York").unwrap();
    /// let lakewood = Coordinate::new("Lakewood, NJ", 40.0828, -74.2094, 20.0, tz).unwrap();
    /// assert_eq!(lakewood.latitude(), 40.0828);
    /// ```
    pub fn new<N>(
        name: N,
        latitude: f64,
        longitude: f64,
        elevation: f64,
        time_zone: TimeZone,
    ) -> Result<Self>
    where
        N: Into<String>,
    {
        Ok(Self {
            name: name.into(),
            latitude: checked_latitude(latitude)?,
            longitude: checked_longitude(longitude)?,
            elevation: checked_elevation(elevation)?,
            time_zone,
        })
    }

    /// Create a new `Coordinate` whose time zone is a fixed offset from UTC,
    /// given in milliseconds.
    ///
    /// The offset must be a whole number of seconds strictly within 24
    /// hours of UTC, otherwise `DomainError::TimeZoneOffset` is returned.
    /// Use [`local_mean_time_offset_millis_for`](crate::local_mean_time_offset_millis_for)
    /// for offsets with a fractional second.
    pub fn with_raw_offset<N>(
        name: N,
        latitude: f64,
        longitude: f64,
        elevation: f64,
        offset_millis: i64,
    ) -> Result<Self>
    where
        N: Into<String>,
    {
        let time_zone = TimeZone::from_raw_offset_millis(offset_millis)?;
        Self::new(name, latitude, longitude, elevation, time_zone)
    }

    /// Return the display name of this location.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name<N>(&mut self, name: N)
    where
        N: Into<String>,
    {
        self.name = name.into();
    }

    /// Return the latitude in degrees. Positive values are north of the
    /// equator.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Set the latitude in degrees, which must be between -90 and 90.
    pub fn set_latitude(&mut self, latitude: f64) -> Result<()> {
        self.latitude = checked_latitude(latitude).map_err(rejected)?;
        Ok(())
    }

    /// Set the latitude from degrees, minutes and seconds. The hemisphere
    /// must be `"N"` or `"S"`, and the combined value must not exceed 90
    /// degrees.
    /// # Example
    /// ```rust
    /// use geoloc::Coordinate;
    ///
    /// let mut location = Coordinate::default();
    /// location.set_latitude_dms(40, 5, 45.48, "N").unwrap();
    /// assert!((location.latitude() - 40.095967).abs() < 1e-6);
    /// ```
    pub fn set_latitude_dms(
        &mut self,
        degrees: u32,
        minutes: u32,
        seconds: f64,
        hemisphere: &str,
    ) -> Result<()> {
        let magnitude = dms_to_decimal(degrees, minutes, seconds)?;
        let latitude = match hemisphere {
            "N" => magnitude,
            "S" => -magnitude,
            _ => {
                return Err(rejected(DomainError::Hemisphere {
                    token: hemisphere.to_owned(),
                    expected: "N or S",
                }))
            }
        };
        self.set_latitude(latitude)
    }

    /// Return the longitude in degrees. Positive values are east of the
    /// Prime Meridian.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Set the longitude in degrees, which must be between -180 and 180.
    pub fn set_longitude(&mut self, longitude: f64) -> Result<()> {
        self.longitude = checked_longitude(longitude).map_err(rejected)?;
        Ok(())
    }

    /// Set the longitude from degrees, minutes and seconds. The hemisphere
    /// must be `"E"` or `"W"`, and the combined value must not exceed 180
    /// degrees.
    pub fn set_longitude_dms(
        &mut self,
        degrees: u32,
        minutes: u32,
        seconds: f64,
        hemisphere: &str,
    ) -> Result<()> {
        let magnitude = dms_to_decimal(degrees, minutes, seconds)?;
        let longitude = match hemisphere {
            "E" => magnitude,
            "W" => -magnitude,
            _ => {
                return Err(rejected(DomainError::Hemisphere {
                    token: hemisphere.to_owned(),
                    expected: "E or W",
                }))
            }
        };
        self.set_longitude(longitude)
    }

    /// Return the elevation above sea level in meters.
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    /// Set the elevation in meters, which must be finite and not negative.
    pub fn set_elevation(&mut self, elevation: f64) -> Result<()> {
        self.elevation = checked_elevation(elevation).map_err(rejected)?;
        Ok(())
    }

    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    pub fn set_time_zone(&mut self, time_zone: TimeZone) {
        self.time_zone = time_zone;
    }

    /// Return the standard offset from UTC, in milliseconds, of this
    /// location's time zone.
    pub fn raw_offset_millis(&self) -> i64 {
        self.time_zone.raw_offset_millis()
    }

    /// Return the distance in meters along the geodesic to `other`,
    /// or NaN if the calculation did not converge.
    pub fn geodesic_distance(&self, other: &Coordinate) -> f64 {
        Vincenty::default().solve(self, other, GeodesicQuantity::Distance)
    }

    /// Return the initial bearing in degrees of the geodesic to `other`,
    /// or NaN if the calculation did not converge.
    pub fn geodesic_initial_bearing(&self, other: &Coordinate) -> f64 {
        Vincenty::default().solve(self, other, GeodesicQuantity::InitialBearing)
    }

    /// Return the bearing in degrees at which the geodesic to `other`
    /// arrives, or NaN if the calculation did not converge.
    pub fn geodesic_final_bearing(&self, other: &Coordinate) -> f64 {
        Vincenty::default().solve(self, other, GeodesicQuantity::FinalBearing)
    }

    /// Return the distance in meters along the rhumb line to `other`.
    pub fn rhumb_distance(&self, other: &Coordinate) -> f64 {
        rhumb::rhumb_distance(self, other)
    }

    /// Return the constant bearing in degrees of the rhumb line to `other`.
    pub fn rhumb_bearing(&self, other: &Coordinate) -> f64 {
        rhumb::rhumb_bearing(self, other)
    }

    /// See [`local_mean_time_offset_millis`](crate::local_mean_time_offset_millis).
    pub fn local_mean_time_offset_millis(&self) -> i64 {
        offset::local_mean_time_offset_millis(self)
    }

    /// See [`antimeridian_adjustment_days`](crate::antimeridian_adjustment_days).
    pub fn antimeridian_adjustment_days(&self) -> i32 {
        offset::antimeridian_adjustment_days(self)
    }

    /// Describe this location as a `Report`, using the time zone offsets
    /// in effect right now.
    pub fn report(&self) -> Report {
        self.report_at(Utc::now())
    }

    /// Describe this location as a `Report`, using the time zone offsets
    /// in effect at the given instant.
    pub fn report_at(&self, instant: DateTime<Utc>) -> Report {
        let gmt_offset =
            self.time_zone.raw_offset_millis_at(instant) as f64 / HOUR_MILLIS;
        let dst_offset =
            self.time_zone.dst_savings_millis_at(instant) as f64 / HOUR_MILLIS;

        Report::new("GeoLocation")
            .field("LocationName", json!(self.name))
            .field("Latitude", json!(self.latitude))
            .field("Longitude", json!(self.longitude))
            .field("Elevation", json!(self.elevation))
            .field("TimezoneName", json!(self.time_zone.name()))
            .field("TimezoneGMTOffset", json!(gmt_offset))
            .field("TimezoneDSTOffset", json!(dst_offset))
    }
}

impl Default for Coordinate {
    /// Greenwich, England, on the Prime Meridian.
    fn default() -> Self {
        Self {
            name: "Greenwich, England".to_owned(),
            latitude: 51.4772,
            longitude: 0.0,
            elevation: 0.0,
            time_zone: TimeZone::Named(chrono_tz::Tz::GMT),
        }
    }
}

/// Floating point fields are compared bit for bit, so a `Coordinate` is
/// always equal to itself and `Eq` and `Hash` agree.
impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
            && self.elevation.to_bits() == other.elevation.to_bits()
            && self.name == other.name
            && self.time_zone == other.time_zone
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
        self.elevation.to_bits().hash(state);
        self.name.hash(state);
        self.time_zone.hash(state);
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.report())
    }
}

fn checked_latitude(latitude: f64) -> Result<f64> {
    if (-90.0..=90.0).contains(&latitude) {
        Ok(latitude)
    } else {
        Err(DomainError::Latitude(latitude))
    }
}

fn checked_longitude(longitude: f64) -> Result<f64> {
    if (-180.0..=180.0).contains(&longitude) {
        Ok(longitude)
    } else {
        Err(DomainError::Longitude(longitude))
    }
}

fn checked_elevation(elevation: f64) -> Result<f64> {
    if elevation.is_finite() && elevation >= 0.0 {
        Ok(elevation)
    } else {
        Err(DomainError::Elevation(elevation))
    }
}

fn dms_to_decimal(degrees: u32, minutes: u32, seconds: f64) -> Result<f64> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(rejected(DomainError::DmsSeconds(seconds)));
    }
    Ok(f64::from(degrees) + (f64::from(minutes) + seconds / 60.0) / 60.0)
}

fn rejected(err: DomainError) -> DomainError {
    debug!(%err, "rejected coordinate update");
    err
}
