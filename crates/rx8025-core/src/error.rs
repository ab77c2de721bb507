//! Error types for calendar values and clock-chip transactions.

use core::fmt;

use embedded_hal_async::i2c::{self, ErrorKind};
use thiserror_no_std::Error;

/// Calendar or register field named in a [`FieldError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Weekday,
    /// Decimal value handed to the BCD encoder
    Bcd,
    /// Linear timestamp that falls outside 2000..=2099
    Timestamp,
    /// Epoch anchor shift in seconds
    AnchorShift,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Weekday => "weekday",
            Self::Bcd => "BCD value",
            Self::Timestamp => "timestamp",
            Self::AnchorShift => "anchor shift",
        };
        f.write_str(name)
    }
}

/// Textual literal accepted by [`crate::DateTime::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    /// `"Mmm dd yyyy"`
    Date,
    /// `"hh:mm:ss"`
    Time,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => f.write_str("date"),
            Self::Time => f.write_str("time"),
        }
    }
}

/// A value that cannot be represented as a calendar field or BCD byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{field} out of range: {value}")]
    OutOfRange { field: Field, value: i64 },
    #[error("byte {0:#04x} is not valid BCD")]
    InvalidBcd(u8),
    #[error("malformed {0} literal")]
    Malformed(Literal),
}

impl FieldError {
    pub(crate) const fn out_of_range(field: Field, value: i64) -> Self {
        Self::OutOfRange { field, value }
    }
}

/// Failure of a driver operation.
///
/// `E` is the error type of the underlying transport. Acknowledge failures
/// are lifted into [`RtcError::BusNack`]; everything else the bus reports is
/// kept as [`RtcError::Bus`].
#[derive(Debug, Error)]
pub enum RtcError<E> {
    #[error("invalid field: {0}")]
    InvalidField(FieldError),
    #[error("bus transaction exceeded its timeout")]
    BusTimeout,
    #[error("device did not acknowledge")]
    BusNack,
    #[error("bus error: {0:?}")]
    Bus(E),
}

impl<E: i2c::Error> RtcError<E> {
    /// Classify a transport error.
    pub fn from_bus(error: E) -> Self {
        match error.kind() {
            ErrorKind::NoAcknowledge(_) => Self::BusNack,
            _ => Self::Bus(error),
        }
    }
}

impl<E> From<FieldError> for RtcError<E> {
    fn from(error: FieldError) -> Self {
        Self::InvalidField(error)
    }
}

/// Failure to persist or restore an [`crate::RtcConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config encoding failed: {0}")]
    Encode(postcard::Error),
    #[error("config decoding failed: {0}")]
    Decode(postcard::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_async::i2c::NoAcknowledgeSource;

    #[test]
    fn test_nack_is_lifted() {
        let err = RtcError::from_bus(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        assert!(matches!(err, RtcError::BusNack));
    }

    #[test]
    fn test_other_bus_errors_are_kept() {
        let err = RtcError::from_bus(ErrorKind::ArbitrationLoss);
        assert!(matches!(err, RtcError::Bus(ErrorKind::ArbitrationLoss)));
    }

    #[test]
    fn test_field_error_converts() {
        let err: RtcError<ErrorKind> = FieldError::InvalidBcd(0xAA).into();
        assert!(matches!(err, RtcError::InvalidField(FieldError::InvalidBcd(0xAA))));
    }
}
