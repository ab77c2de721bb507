//! Hardware-independent core for the RX8025 real-time clock
//!
//! This crate holds everything needed to keep time with an RX8025 on an I2C
//! bus: a validated calendar value, 2000-anchored calendar arithmetic, the
//! BCD codec used by the chip's registers, and an async driver generic over
//! any `embedded-hal-async` I2C bus.
//!
//! It is `#![no_std]` so it compiles on both embedded targets and desktop
//! hosts (for the simulator and tests).
//!
//! ```rust,ignore
//! let mut rtc = Rx8025::new(i2c);
//! rtc.initialize().await?;
//! rtc.set_time(35, 33, 0, 8, 4, 22).await?;
//! let now = rtc.get_datetime().await?;
//! ```

#![no_std]

pub mod bcd;
pub mod calendar;
pub mod config;
pub mod datetime;
pub mod driver;
pub mod error;
pub mod registers;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod transport;

pub use calendar::EpochAnchor;
pub use config::RtcConfig;
pub use datetime::DateTime;
pub use driver::{DriverError, Rx8025};
pub use error::{ConfigError, Field, FieldError, Literal, RtcError};
pub use registers::Register;
pub use transport::RegisterTransport;
