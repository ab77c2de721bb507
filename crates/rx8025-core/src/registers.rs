//! RX8025 register map.
//!
//! The seven timekeeping registers are sequential, so a single pointer write
//! to [`Register::Second`] followed by a 7-byte read returns the whole time.
//! Unused high bits of each time register carry flags or read back as
//! undefined, so every byte is masked before BCD decoding.

/// 7-bit I2C address of the RX8025.
pub const RX8025_ADDRESS: u8 = 0x32;

/// Number of timekeeping registers starting at [`Register::Second`].
pub const TIME_REGISTER_COUNT: usize = 7;

/// Byte the chip accepts in the weekday slot when the full time is written.
pub const WEEKDAY_PLACEHOLDER: u8 = 0x01;

/// Control bytes written by [`crate::Rx8025::initialize`]: 24-hour mode in
/// control 1, all flags cleared in control 2.
pub const DEFAULT_CONTROL: [u8; 2] = [0x20, 0x00];

/// Valid bits of each timekeeping register, indexed by register address.
const TIME_REGISTER_MASKS: [u8; TIME_REGISTER_COUNT] = [
    0x7F, // second
    0x7F, // minute
    0x3F, // hour (24h)
    0x07, // weekday
    0x3F, // day of month
    0x1F, // month
    0xFF, // year
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    Second = 0x00,
    Minute = 0x01,
    Hour = 0x02,
    Weekday = 0x03,
    Day = 0x04,
    Month = 0x05,
    Year = 0x06,
    Control1 = 0x0D,
    Control2 = 0x0E,
}

impl Register {
    /// Timekeeping registers in address order.
    pub const TIME: [Register; TIME_REGISTER_COUNT] = [
        Register::Second,
        Register::Minute,
        Register::Hour,
        Register::Weekday,
        Register::Day,
        Register::Month,
        Register::Year,
    ];

    pub const fn address(self) -> u8 {
        self as u8
    }

    /// Bits that carry the register's value. Control registers are used
    /// verbatim.
    pub const fn mask(self) -> u8 {
        match self {
            Self::Control1 | Self::Control2 => 0xFF,
            time => TIME_REGISTER_MASKS[time as usize],
        }
    }

    /// Returns `true` for the seven BCD timekeeping registers.
    pub const fn is_time(self) -> bool {
        (self as usize) < TIME_REGISTER_COUNT
    }

    /// Strip flag bits from a raw register byte.
    pub const fn masked(self, raw: u8) -> u8 {
        raw & self.mask()
    }
}
