use thiserror::Error;

/// An error indicating that a value was outside the range accepted by a
/// `Coordinate` or `TimeZone`. A `Coordinate` which returns one of these
/// errors from a setter is left unchanged.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    /// The latitude was not between -90 and 90 degrees.
    #[error("Latitude must be between -90 and 90, but was {0}")]
    Latitude(f64),
    /// The longitude was not between -180 and 180 degrees.
    #[error("Longitude must be between -180 and 180, but was {0}")]
    Longitude(f64),
    /// The elevation was negative, NaN or infinite.
    #[error("Elevation must be a finite, non-negative number, but was {0}")]
    Elevation(f64),
    /// The hemisphere given alongside a degrees/minutes/seconds value was
    /// not valid for the axis being set.
    #[error("Hemisphere must be one of {expected}, but was {token:?}")]
    Hemisphere {
        /// The hemisphere string which was rejected.
        token: String,
        /// The accepted hemisphere strings, for example "N or S".
        expected: &'static str,
    },
    /// The seconds component of a degrees/minutes/seconds value was
    /// negative or not finite.
    #[error("Seconds must be a finite, non-negative number, but was {0}")]
    DmsSeconds(f64),
    /// A fixed time zone offset was out of range or not a whole number of
    /// seconds.
    #[error("Time zone offset of {0} milliseconds is not supported")]
    TimeZoneOffset(i64),
    /// A convergence tolerance was negative, NaN or infinite.
    #[error("Tolerance must be a finite, non-negative number, but was {0}")]
    Tolerance(f64),
    /// No time zone matched the given name.
    #[error("Unknown time zone {0:?}")]
    UnknownTimeZone(String),
}

/// Errors that can occur when rendering a `Report`.
#[derive(Debug, Error)]
pub enum ReportError {
    /// An error originating in the underlying XML writer.
    #[error("Could not write XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// The rendered document was not valid UTF-8.
    #[error("Rendered XML was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, DomainError>;
