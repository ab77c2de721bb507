//! Calendar value held by the clock chip.

use core::fmt::{self, Write};

use heapless::String;

use crate::calendar::{self, EpochAnchor, MAX_YEAR_OFFSET};
use crate::error::{Field, FieldError, Literal};

/// Month abbreviations in calendar order, three characters each.
pub const MONTH_NAMES: &str = "JanFebMarAprMayJunJulAugSepOctNovDec";

/// Length of the text produced by [`DateTime::to_iso8601`].
pub const ISO8601_LEN: usize = 19;

/// Date and wall-clock time between 2000-01-01 and 2099-12-31.
///
/// Every constructor validates its input, so a `DateTime` always names a
/// real calendar day. Values are never mutated; derived quantities such as
/// the weekday or the Unix timestamp are computed on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    // Field order gives chronological ordering for the derived `Ord`.
    year_offset: u8,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl DateTime {
    /// Build from components. `year` may be a full year (`2022`) or an
    /// offset from 2000 (`22`).
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, FieldError> {
        let offset = if year >= 2000 { year - 2000 } else { year };
        if offset > MAX_YEAR_OFFSET as u16 {
            return Err(FieldError::out_of_range(Field::Year, year as i64));
        }
        let year_offset = offset as u8;

        let month_len = calendar::days_in_month(year_offset, month)?;
        if day == 0 || day > month_len {
            return Err(FieldError::out_of_range(Field::Day, day as i64));
        }
        if hour > 23 {
            return Err(FieldError::out_of_range(Field::Hour, hour as i64));
        }
        if minute > 59 {
            return Err(FieldError::out_of_range(Field::Minute, minute as i64));
        }
        if second > 59 {
            return Err(FieldError::out_of_range(Field::Second, second as i64));
        }

        Ok(Self {
            year_offset,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Decompose seconds elapsed since 2000-01-01T00:00:00.
    pub fn from_seconds_time(seconds: u32) -> Result<Self, FieldError> {
        let second = (seconds % 60) as u8;
        let t = seconds / 60;
        let minute = (t % 60) as u8;
        let t = t / 60;
        let hour = (t % 24) as u8;
        let mut days = t / 24;

        let mut year_offset = 0u8;
        loop {
            let year_len = calendar::days_in_year(year_offset) as u32;
            if days < year_len {
                break;
            }
            days -= year_len;
            year_offset += 1;
            if year_offset > MAX_YEAR_OFFSET {
                return Err(FieldError::out_of_range(Field::Timestamp, seconds as i64));
            }
        }

        let mut month = 1u8;
        loop {
            let month_len = calendar::days_in_month(year_offset, month)? as u32;
            if days < month_len {
                break;
            }
            days -= month_len;
            month += 1;
        }

        Ok(Self {
            year_offset,
            month,
            day: days as u8 + 1,
            hour,
            minute,
            second,
        })
    }

    /// Decompose a Unix timestamp using the legacy eight hour anchor.
    pub fn from_unix_time(unix_time: u32) -> Result<Self, FieldError> {
        Self::from_unix_time_at(unix_time, EpochAnchor::LEGACY)
    }

    /// Decompose a Unix timestamp relative to `anchor`.
    pub fn from_unix_time_at(unix_time: u32, anchor: EpochAnchor) -> Result<Self, FieldError> {
        let since_anchor = unix_time as i64 - anchor.offset();
        let seconds = u32::try_from(since_anchor)
            .map_err(|_| FieldError::out_of_range(Field::Timestamp, unix_time as i64))?;
        Self::from_seconds_time(seconds)
    }

    /// Parse `"Mmm dd yyyy"` and `"hh:mm:ss"`, the layout of C's
    /// `__DATE__` and `__TIME__`.
    pub fn parse(date: &str, time: &str) -> Result<Self, FieldError> {
        let malformed_date = FieldError::Malformed(Literal::Date);
        let mut parts = date.split_whitespace();
        let (Some(name), Some(day), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed_date);
        };

        let month = month_from_abbreviation(name).ok_or(malformed_date)?;
        let day: u8 = day.parse().map_err(|_| malformed_date)?;
        let year: u16 = year.parse().map_err(|_| malformed_date)?;

        let malformed_time = FieldError::Malformed(Literal::Time);
        let mut parts = time.trim().split(':');
        let (Some(hour), Some(minute), Some(second), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed_time);
        };
        let hour: u8 = hour.parse().map_err(|_| malformed_time)?;
        let minute: u8 = minute.parse().map_err(|_| malformed_time)?;
        let second: u8 = second.parse().map_err(|_| malformed_time)?;

        Self::new(year, month, day, hour, minute, second)
    }

    pub const fn year(&self) -> u16 {
        2000 + self.year_offset as u16
    }

    /// Year as stored by the chip, 0–99.
    pub const fn year_offset(&self) -> u8 {
        self.year_offset
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn day(&self) -> u8 {
        self.day
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Days since 2000-01-01.
    pub fn days_since_anchor(&self) -> u32 {
        // Fields were validated on construction; the fallback is unreachable.
        calendar::days_since_anchor(self.year_offset, self.month, self.day).unwrap_or_default()
    }

    /// Day of the week, 0 = Sunday. 2000-01-01 was a Saturday.
    pub fn day_of_week(&self) -> u8 {
        ((self.days_since_anchor() + 6) % 7) as u8
    }

    /// Seconds since 2000-01-01T00:00:00.
    pub fn seconds_time(&self) -> u32 {
        let total =
            calendar::total_seconds(self.days_since_anchor(), self.hour, self.minute, self.second);
        // 2099-12-31T23:59:59 is 3_155_759_999, which still fits.
        total as u32
    }

    /// Unix timestamp using the legacy eight hour anchor.
    pub fn unix_time(&self) -> u32 {
        self.unix_time_at(EpochAnchor::LEGACY)
    }

    /// Unix timestamp relative to `anchor`.
    pub fn unix_time_at(&self, anchor: EpochAnchor) -> u32 {
        // Shifts are capped at a day, so the sum stays within u32.
        (self.seconds_time() as i64 + anchor.offset()) as u32
    }

    /// `YYYY-MM-DDThh:mm:ss` without a zone designator.
    pub fn to_iso8601(&self) -> String<ISO8601_LEN> {
        let mut out = String::new();
        // Capacity matches the fixed-width format exactly.
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year(),
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second
        );
        out
    }
}

impl Default for DateTime {
    /// 2000-01-01T00:00:00
    fn default() -> Self {
        Self {
            year_offset: 0,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year(),
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second
        )
    }
}

/// 1-based month for a three-letter abbreviation such as `"Apr"`.
fn month_from_abbreviation(name: &str) -> Option<u8> {
    if name.len() != 3 {
        return None;
    }
    let offset = MONTH_NAMES.find(name)?;
    // "anF" would otherwise match across the Jan/Feb boundary
    if offset % 3 != 0 {
        return None;
    }
    Some((offset / 3) as u8 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::SECONDS_PER_DAY;

    #[test]
    fn test_anchor_is_zero() {
        let dt = DateTime::new(2000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(dt.seconds_time(), 0);
        assert_eq!(dt, DateTime::default());
        assert_eq!(dt.day_of_week(), 6, "2000-01-01 was a Saturday");
    }

    #[test]
    fn test_year_normalization() {
        let full = DateTime::new(2022, 4, 8, 0, 33, 35).unwrap();
        let short = DateTime::new(22, 4, 8, 0, 33, 35).unwrap();
        assert_eq!(full, short);
        assert_eq!(full.year(), 2022);
        assert_eq!(full.year_offset(), 22);
    }

    #[test]
    fn test_rejects_out_of_range_components() {
        assert!(DateTime::new(2100, 1, 1, 0, 0, 0).is_err());
        assert!(DateTime::new(1999, 1, 1, 0, 0, 0).is_err());
        assert!(DateTime::new(2022, 13, 1, 0, 0, 0).is_err());
        assert!(DateTime::new(2022, 1, 32, 0, 0, 0).is_err());
        assert!(DateTime::new(2022, 1, 1, 24, 0, 0).is_err());
        assert!(DateTime::new(2022, 1, 1, 0, 60, 0).is_err());
        assert!(DateTime::new(2022, 1, 1, 0, 0, 60).is_err());
    }

    #[test]
    fn test_february_boundaries() {
        assert!(DateTime::new(2024, 2, 29, 0, 0, 0).is_ok());
        assert_eq!(
            DateTime::new(2023, 2, 29, 0, 0, 0),
            Err(FieldError::OutOfRange {
                field: Field::Day,
                value: 29
            })
        );

        // The day after 2023-02-28 decomposes to March 1st, never Feb 29th.
        let feb28 = DateTime::new(2023, 2, 28, 0, 0, 0).unwrap();
        let next = DateTime::from_seconds_time(feb28.seconds_time() + SECONDS_PER_DAY).unwrap();
        assert_eq!((next.month(), next.day()), (3, 1));

        let leap28 = DateTime::new(2024, 2, 28, 0, 0, 0).unwrap();
        let next = DateTime::from_seconds_time(leap28.seconds_time() + SECONDS_PER_DAY).unwrap();
        assert_eq!((next.month(), next.day()), (2, 29));
    }

    #[test]
    fn test_round_trip_every_day() {
        let times = [(0, 0, 0), (0, 33, 35), (12, 0, 1), (23, 59, 59)];
        for year in 2000..=2099u16 {
            for month in 1..=12u8 {
                let len = calendar::days_in_month((year - 2000) as u8, month).unwrap();
                for day in 1..=len {
                    for &(hour, minute, second) in &times {
                        let dt = DateTime::new(year, month, day, hour, minute, second).unwrap();
                        let back = DateTime::from_unix_time(dt.unix_time()).unwrap();
                        assert_eq!(dt, back, "round trip failed for {dt}");
                        let back = DateTime::from_seconds_time(dt.seconds_time()).unwrap();
                        assert_eq!(dt, back, "seconds_time round trip failed for {dt}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_timestamp_bounds() {
        let last = DateTime::new(2099, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(last.seconds_time(), 3_155_759_999);
        assert!(DateTime::from_seconds_time(last.seconds_time() + 1).is_err());
        assert!(DateTime::from_unix_time(0).is_err(), "1970 predates the anchor");
        assert!(DateTime::from_unix_time_at(946_684_799, EpochAnchor::UTC).is_err());
    }

    #[test]
    fn test_unix_time_keeps_legacy_shift() {
        let dt = DateTime::new(2022, 4, 8, 0, 33, 35).unwrap();
        assert_eq!(dt.unix_time_at(EpochAnchor::UTC), 1_649_378_015);
        assert_eq!(dt.unix_time(), 1_649_378_015 - 8 * 3600);
        assert_eq!(
            DateTime::from_unix_time_at(1_649_378_015, EpochAnchor::UTC).unwrap(),
            dt
        );
    }

    #[test]
    fn test_day_of_week() {
        // 2022-04-08 was a Friday, 2024-02-29 a Thursday
        assert_eq!(DateTime::new(2022, 4, 8, 0, 0, 0).unwrap().day_of_week(), 5);
        assert_eq!(DateTime::new(2024, 2, 29, 0, 0, 0).unwrap().day_of_week(), 4);
    }

    #[test]
    fn test_parse_literals() {
        let dt = DateTime::parse("Apr  8 2022", "00:33:35").unwrap();
        assert_eq!(dt, DateTime::new(2022, 4, 8, 0, 33, 35).unwrap());

        let dt = DateTime::parse("Dec 31 2099", "23:59:59").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2099, 12, 31));
        assert_eq!(DateTime::parse("Jan 01 2000", "00:00:00").unwrap().seconds_time(), 0);
    }

    #[test]
    fn test_parse_rejects_bad_literals() {
        let bad_date = Err(FieldError::Malformed(Literal::Date));
        let bad_time = Err(FieldError::Malformed(Literal::Time));
        assert_eq!(DateTime::parse("Foo 8 2022", "00:00:00"), bad_date);
        assert_eq!(DateTime::parse("anF 8 2022", "00:00:00"), bad_date);
        assert_eq!(DateTime::parse("Apr 8", "00:00:00"), bad_date);
        assert_eq!(DateTime::parse("Apr 8 2022 x", "00:00:00"), bad_date);
        assert_eq!(DateTime::parse("Apr 8 2022", "00:00"), bad_time);
        assert_eq!(DateTime::parse("Apr 8 2022", "aa:00:00"), bad_time);
        assert!(DateTime::parse("Feb 29 2023", "00:00:00").is_err());
    }

    #[test]
    fn test_formatting() {
        let dt = DateTime::new(2022, 4, 8, 0, 33, 35).unwrap();
        assert_eq!(dt.to_iso8601().as_str(), "2022-04-08T00:33:35");

        let mut text: String<32> = String::new();
        write!(text, "{dt}").unwrap();
        assert_eq!(text.as_str(), "2022-04-08 00:33:35");
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a = DateTime::new(2022, 12, 31, 23, 59, 59).unwrap();
        let b = DateTime::new(2023, 1, 1, 0, 0, 0).unwrap();
        assert!(a < b);
    }
}
