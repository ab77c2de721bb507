//! Calendar arithmetic for the 2000–2099 window the clock chip can hold.
//!
//! All day counts are relative to 2000-01-01, which is day 0. Years are
//! passed as offsets from 2000, the same form the chip stores in its year
//! register.

use serde::{Deserialize, Serialize};

use crate::error::{Field, FieldError};

/// Largest year offset the chip's two-digit year register can represent.
pub const MAX_YEAR_OFFSET: u8 = 99;

/// Month lengths for a common year, January first.
pub const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Seconds between 1970-01-01T00:00:00 and 2000-01-01T00:00:00.
pub const SECONDS_FROM_1970_TO_2000: u32 = 946_684_800;

/// Shift the original firmware folded into its 1970→2000 constant.
///
/// The firmware was deployed with the chip set to UTC+8 wall-clock time and
/// subtracted these eight hours from every Unix timestamp it produced.
pub const LEGACY_ANCHOR_SHIFT_SECS: i32 = 8 * 60 * 60;

/// Largest accepted anchor shift in either direction.
pub const MAX_ANCHOR_SHIFT_SECS: i32 = 24 * 60 * 60;

pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Gregorian leap-year test on a year offset from 2000.
///
/// Offsets above 99 never reach the chip but are still answered correctly,
/// e.g. offset 100 (year 2100) is not a leap year.
pub const fn is_leap_year(year_offset: u8) -> bool {
    year_offset % 4 == 0 && (year_offset % 100 != 0 || year_offset as u16 % 400 == 0)
}

pub const fn days_in_year(year_offset: u8) -> u16 {
    if is_leap_year(year_offset) { 366 } else { 365 }
}

/// Length of `month` (1-based) in the given year.
pub fn days_in_month(year_offset: u8, month: u8) -> Result<u8, FieldError> {
    if !(1..=12).contains(&month) {
        return Err(FieldError::out_of_range(Field::Month, month as i64));
    }
    let base = DAYS_IN_MONTH[month as usize - 1];
    if month == 2 && is_leap_year(year_offset) {
        Ok(base + 1)
    } else {
        Ok(base)
    }
}

/// Days elapsed between 2000-01-01 and the given date.
pub fn days_since_anchor(year_offset: u8, month: u8, day: u8) -> Result<u32, FieldError> {
    if year_offset > MAX_YEAR_OFFSET {
        return Err(FieldError::out_of_range(Field::Year, 2000 + year_offset as i64));
    }
    let month_len = days_in_month(year_offset, month)?;
    if day == 0 || day > month_len {
        return Err(FieldError::out_of_range(Field::Day, day as i64));
    }

    let mut days = day as u32;
    for len in &DAYS_IN_MONTH[..month as usize - 1] {
        days += *len as u32;
    }
    if month > 2 && is_leap_year(year_offset) {
        days += 1;
    }

    let y = year_offset as u32;
    Ok(days + 365 * y + (y + 3) / 4 - 1)
}

/// Compose a day count and a wall-clock time into seconds.
pub const fn total_seconds(days: u32, hour: u8, minute: u8, second: u8) -> i64 {
    ((days as i64 * 24 + hour as i64) * 60 + minute as i64) * 60 + second as i64
}

/// Offset between the 2000 anchor and the Unix epoch, minus a fixed shift.
///
/// `unix_time = seconds_time + offset()`. The legacy anchor keeps the
/// original firmware's eight hour shift, so its Unix times are only correct
/// when the chip holds UTC+8 wall-clock time. Use [`EpochAnchor::UTC`] for a
/// chip set to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct EpochAnchor {
    shift_secs: i32,
}

impl EpochAnchor {
    pub const LEGACY: Self = Self {
        shift_secs: LEGACY_ANCHOR_SHIFT_SECS,
    };

    pub const UTC: Self = Self { shift_secs: 0 };

    /// Anchor shifted by `shift_secs`; at most ±24 hours.
    pub const fn new(shift_secs: i32) -> Result<Self, FieldError> {
        if shift_secs < -MAX_ANCHOR_SHIFT_SECS || shift_secs > MAX_ANCHOR_SHIFT_SECS {
            return Err(FieldError::out_of_range(Field::AnchorShift, shift_secs as i64));
        }
        Ok(Self { shift_secs })
    }

    pub const fn shift_secs(self) -> i32 {
        self.shift_secs
    }

    /// Seconds to add to a 2000-anchored timestamp to get a Unix timestamp.
    pub const fn offset(self) -> i64 {
        SECONDS_FROM_1970_TO_2000 as i64 - self.shift_secs as i64
    }
}

impl Default for EpochAnchor {
    fn default() -> Self {
        Self::LEGACY
    }
}

impl TryFrom<i32> for EpochAnchor {
    type Error = FieldError;

    fn try_from(shift_secs: i32) -> Result<Self, Self::Error> {
        Self::new(shift_secs)
    }
}

impl From<EpochAnchor> for i32 {
    fn from(anchor: EpochAnchor) -> Self {
        anchor.shift_secs
    }
}
