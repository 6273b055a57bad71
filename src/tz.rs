use crate::err::{DomainError, Result};
use chrono::{DateTime, FixedOffset, TimeZone as _, Utc};
use chrono_tz::{OffsetComponents, Tz, TZ_VARIANTS};
use std::hash::{Hash, Hasher};

const MAX_OFFSET_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// The time zone associated with a `Coordinate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeZone {
    /// A time zone from the IANA database, which may observe daylight
    /// saving time.
    Named(Tz),
    /// A fixed offset from UTC, which never observes daylight saving time.
    Fixed(FixedOffset),
}

impl TimeZone {
    /// Find a named time zone, either by its full name
    /// (`"Australia/Sydney"`) or by the part of the name after the region
    /// (`"Sydney"`).
    /// # Example
    /// ```rust
    /// use geoloc::TimeZone;
    ///
    /// let tz = TimeZone::parse("Jerusalem").unwrap();
    /// assert_eq!(tz.name(), "Asia/Jerusalem");
    /// ```
    pub fn parse<T>(s: T) -> Result<Self>
    where
        T: AsRef<str>,
    {
        tz_string_to_tz(s.as_ref())
            .map(TimeZone::Named)
            .ok_or_else(|| DomainError::UnknownTimeZone(s.as_ref().to_owned()))
    }

    /// Create a fixed time zone from an offset from UTC, in milliseconds.
    /// The offset must be a whole number of seconds strictly within 24
    /// hours of UTC.
    pub fn from_raw_offset_millis(offset_millis: i64) -> Result<Self> {
        if offset_millis % 1000 != 0
            || offset_millis <= -MAX_OFFSET_MILLIS
            || offset_millis >= MAX_OFFSET_MILLIS
        {
            return Err(DomainError::TimeZoneOffset(offset_millis));
        }
        FixedOffset::east_opt((offset_millis / 1000) as i32)
            .map(TimeZone::Fixed)
            .ok_or(DomainError::TimeZoneOffset(offset_millis))
    }

    /// The UTC time zone.
    pub fn utc() -> Self {
        TimeZone::Named(Tz::UTC)
    }

    /// Return the identifier of this time zone. Fixed time zones are named
    /// after their offset, for example `"UTC+14:00"`.
    pub fn name(&self) -> String {
        match self {
            TimeZone::Named(tz) => tz.name().to_owned(),
            TimeZone::Fixed(offset) => format!("UTC{}", offset),
        }
    }

    /// Return the standard offset from UTC in milliseconds, ignoring any
    /// daylight saving time, as it is right now.
    pub fn raw_offset_millis(&self) -> i64 {
        self.raw_offset_millis_at(Utc::now())
    }

    /// Return the standard offset from UTC in milliseconds, ignoring any
    /// daylight saving time, as it was at the given instant. Named zones
    /// occasionally change their standard offset, so the instant matters.
    pub fn raw_offset_millis_at(&self, instant: DateTime<Utc>) -> i64 {
        match self {
            TimeZone::Named(tz) => tz
                .offset_from_utc_datetime(&instant.naive_utc())
                .base_utc_offset()
                .num_milliseconds(),
            TimeZone::Fixed(offset) => {
                i64::from(offset.local_minus_utc()) * 1000
            }
        }
    }

    /// Return the daylight saving time adjustment in milliseconds which is
    /// in effect at the given instant. This is zero for fixed time zones.
    pub fn dst_savings_millis_at(&self, instant: DateTime<Utc>) -> i64 {
        match self {
            TimeZone::Named(tz) => tz
                .offset_from_utc_datetime(&instant.naive_utc())
                .dst_offset()
                .num_milliseconds(),
            TimeZone::Fixed(_) => 0,
        }
    }
}

impl Default for TimeZone {
    fn default() -> Self {
        TimeZone::utc()
    }
}

impl Hash for TimeZone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            TimeZone::Named(tz) => {
                0u8.hash(state);
                tz.name().hash(state);
            }
            TimeZone::Fixed(offset) => {
                1u8.hash(state);
                offset.local_minus_utc().hash(state);
            }
        }
    }
}

impl From<Tz> for TimeZone {
    fn from(tz: Tz) -> Self {
        TimeZone::Named(tz)
    }
}

impl From<FixedOffset> for TimeZone {
    fn from(offset: FixedOffset) -> Self {
        TimeZone::Fixed(offset)
    }
}

impl std::fmt::Display for TimeZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Converts a time zone name into the matching `Tz` variant from the
/// chrono_tz crate.
fn tz_string_to_tz(s: &str) -> Option<Tz> {
    TZ_VARIANTS
        .iter()
        .find(|tz| {
            let full_name = tz.name();
            if full_name == s {
                true
            } else if let Some(short_name) = full_name.split('/').nth(1) {
                // If the Tz name is in the format "RegionName/CityName":
                short_name == s
            } else {
                false
            }
        })
        .copied()
}

#[cfg(test)]
mod test {
    use super::TimeZone;
    use chrono::{TimeZone as _, Utc};
    use chrono_tz::Tz;

    #[test]
    fn short_name_match_works() {
        let tz = TimeZone::parse("Sydney").unwrap();
        assert_eq!(tz, TimeZone::Named(Tz::Australia__Sydney));
    }

    #[test]
    fn full_name_match_works() {
        let tz = TimeZone::parse("Australia/Sydney").unwrap();
        assert_eq!(tz, TimeZone::Named(Tz::Australia__Sydney));
    }

    #[test]
    fn unknown_name_fails() {
        assert!(TimeZone::parse("Atlantis/Poseidonia").is_err());
    }

    #[test]
    fn fixed_offset_round_trips() {
        let tz = TimeZone::from_raw_offset_millis(50_400_000).unwrap();
        assert_eq!(tz.raw_offset_millis(), 50_400_000);
        assert_eq!(tz.name(), "UTC+14:00");
    }

    #[test]
    fn fixed_offset_out_of_range_fails() {
        assert!(TimeZone::from_raw_offset_millis(86_400_000).is_err());
        assert!(TimeZone::from_raw_offset_millis(-86_400_000).is_err());
        assert!(TimeZone::from_raw_offset_millis(1).is_err());
    }

    #[test]
    fn raw_offset_ignores_dst() {
        let tz = TimeZone::Named(Tz::America__New_York);
        let summer = Utc.with_ymd_and_hms(2021, 7, 1, 12, 0, 0).unwrap();
        let winter = Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(tz.raw_offset_millis_at(summer), -5 * 3_600_000);
        assert_eq!(tz.raw_offset_millis_at(winter), -5 * 3_600_000);
        assert_eq!(tz.dst_savings_millis_at(summer), 3_600_000);
        assert_eq!(tz.dst_savings_millis_at(winter), 0);
    }
}
