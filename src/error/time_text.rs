use thiserror::Error;

/// Rejection reasons for `[zone:]YYYY-MM-DD:HH-MM` text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeTextError {
    /// The text did not split into two or three `:`-separated parts.
    #[error("expected 2 or 3 ':'-separated parts, found {0}")]
    PartCount(usize),

    /// A date or time component was missing or not an integer.
    #[error("'{0}' is not a valid date or time component")]
    InvalidComponent(String),

    /// The zone prefix is not a known IANA zone name.
    #[error("unknown time zone '{0}'")]
    UnknownZone(String),

    /// The components are integers but do not name a real local time in the zone.
    #[error("{0} does not exist in the given time zone")]
    InvalidDateTime(String),
}
