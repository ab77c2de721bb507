//! RX8025 clock driver.
//!
//! The driver owns its transport, so a single `&mut` borrow serializes every
//! transaction it issues. Firmware that shares the bus with other
//! peripherals hands it a shared-bus device instead of the raw peripheral.
//!
//! # Atomicity
//!
//! The `get_*` field readers each issue their own transaction and may
//! observe the chip ticking between calls, e.g. reading minute 34 and then
//! second 00 across a 12:34:59 → 12:35:00 rollover. [`Rx8025::get_datetime`]
//! and [`Rx8025::get_unix_time`] read all seven timekeeping registers in a
//! single transaction and are immune to this.

use embassy_time::{Duration, with_timeout};
use embedded_hal_async::i2c;
use log::{debug, error, info, warn};

use crate::bcd;
use crate::config::RtcConfig;
use crate::datetime::DateTime;
use crate::error::RtcError;
use crate::registers::{Register, TIME_REGISTER_COUNT, WEEKDAY_PLACEHOLDER};
use crate::transport::RegisterTransport;

/// Error returned by a driver over transport `T`.
pub type DriverError<T> = RtcError<<T as RegisterTransport>::Error>;

pub struct Rx8025<T> {
    transport: T,
    config: RtcConfig,
    initialized: bool,
}

impl<T: RegisterTransport> Rx8025<T> {
    /// Driver for a chip at the default address with default settings.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, RtcConfig::default())
    }

    pub fn with_config(transport: T, config: RtcConfig) -> Self {
        Self {
            transport,
            config,
            initialized: false,
        }
    }

    pub fn config(&self) -> &RtcConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back, e.g. to hand the bus to another driver.
    pub fn release(self) -> T {
        self.transport
    }

    /// Write the two control bytes. Run once after power-up before relying
    /// on any other operation.
    pub async fn initialize(&mut self) -> Result<(), DriverError<T>> {
        if self.initialized {
            warn!("RX8025 already initialized, rewriting control registers");
        }
        let [control1, control2] = self.config.control;
        self.write(&[Register::Control1.address(), control1, control2])
            .await?;
        self.initialized = true;
        info!(
            "RX8025 initialized at {:#04x} (control {:#04x} {:#04x})",
            self.config.address, control1, control2
        );
        Ok(())
    }

    /// Set the clock. `year` is either an offset from 2000 or a full year.
    ///
    /// The combination is validated as a calendar value before anything is
    /// written, then all seven registers are written in one transaction.
    pub async fn set_time(
        &mut self,
        second: u8,
        minute: u8,
        hour: u8,
        day: u8,
        month: u8,
        year: u16,
    ) -> Result<(), DriverError<T>> {
        let time = DateTime::new(year, month, day, hour, minute, second)?;
        self.set_datetime(&time).await
    }

    pub async fn set_datetime(&mut self, time: &DateTime) -> Result<(), DriverError<T>> {
        self.warn_if_uninitialized();
        let frame = [
            Register::Second.address(),
            bcd::encode(time.second())?,
            bcd::encode(time.minute())?,
            bcd::encode(time.hour())?,
            WEEKDAY_PLACEHOLDER,
            bcd::encode(time.day())?,
            bcd::encode(time.month())?,
            bcd::encode(time.year_offset())?,
        ];
        self.write(&frame).await?;
        info!("RX8025 time set to {}", time);
        Ok(())
    }

    pub async fn get_second(&mut self) -> Result<u8, DriverError<T>> {
        self.read_field(Register::Second).await
    }

    pub async fn get_minute(&mut self) -> Result<u8, DriverError<T>> {
        self.read_field(Register::Minute).await
    }

    pub async fn get_hour(&mut self) -> Result<u8, DriverError<T>> {
        self.read_field(Register::Hour).await
    }

    /// Weekday counter as kept by the chip. [`Rx8025::set_time`] resets it
    /// to a placeholder, so it only tracks real weekdays if set separately.
    pub async fn get_day_of_week(&mut self) -> Result<u8, DriverError<T>> {
        self.read_field(Register::Weekday).await
    }

    /// Day of the month.
    pub async fn get_date(&mut self) -> Result<u8, DriverError<T>> {
        self.read_field(Register::Day).await
    }

    pub async fn get_month(&mut self) -> Result<u8, DriverError<T>> {
        self.read_field(Register::Month).await
    }

    /// Year offset from 2000.
    pub async fn get_year(&mut self) -> Result<u8, DriverError<T>> {
        self.read_field(Register::Year).await
    }

    /// Read one register in its own transaction, masked and decoded.
    pub async fn read_field(&mut self, register: Register) -> Result<u8, DriverError<T>> {
        let address = self.config.address;
        let raw = bounded(
            self.config.bus_timeout(),
            self.transport.read_byte(address, register.address()),
        )
        .await?;
        debug!("RX8025 {:?} = {:#04x}", register, raw);
        decode(register, raw)
    }

    /// Read the whole time in one transaction.
    pub async fn get_datetime(&mut self) -> Result<DateTime, DriverError<T>> {
        self.warn_if_uninitialized();
        let address = self.config.address;
        let timeout = self.config.bus_timeout();

        bounded(
            timeout,
            self.transport
                .write_sequence(address, &[Register::Second.address()]),
        )
        .await?;
        let mut raw = [0u8; TIME_REGISTER_COUNT];
        bounded(timeout, self.transport.read_bytes(address, &mut raw)).await?;
        debug!("RX8025 time registers {:02x?}", raw);

        let mut fields = [0u8; TIME_REGISTER_COUNT];
        for ((field, register), byte) in fields.iter_mut().zip(Register::TIME).zip(raw) {
            *field = decode(register, byte)?;
        }
        let [second, minute, hour, _weekday, day, month, year] = fields;
        let time = DateTime::new(year as u16, month, day, hour, minute, second).map_err(|e| {
            error!("RX8025 holds an impossible date: {}", e);
            RtcError::InvalidField(e)
        })?;
        Ok(time)
    }

    /// Unix time of the chip's clock, read in one transaction and converted
    /// with the configured anchor.
    pub async fn get_unix_time(&mut self) -> Result<u32, DriverError<T>> {
        let time = self.get_datetime().await?;
        Ok(time.unix_time_at(self.config.anchor))
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), DriverError<T>> {
        debug!("RX8025 write {:02x?}", bytes);
        let address = self.config.address;
        bounded(
            self.config.bus_timeout(),
            self.transport.write_sequence(address, bytes),
        )
        .await
    }

    fn warn_if_uninitialized(&self) {
        if !self.initialized {
            warn!("RX8025 accessed before initialize()");
        }
    }
}

fn decode<E>(register: Register, raw: u8) -> Result<u8, RtcError<E>> {
    bcd::decode(register.masked(raw)).map_err(|e| {
        error!("RX8025 {:?} register holds {:#04x}: {}", register, raw, e);
        RtcError::InvalidField(e)
    })
}

/// Run one transport operation, giving up after `timeout` if set.
async fn bounded<R, E: i2c::Error>(
    timeout: Option<Duration>,
    operation: impl Future<Output = Result<R, E>>,
) -> Result<R, RtcError<E>> {
    let outcome = match timeout {
        Some(limit) => with_timeout(limit, operation).await.map_err(|_| {
            error!("RX8025 bus transaction timed out after {} ms", limit.as_millis());
            RtcError::BusTimeout
        })?,
        None => operation.await,
    };
    outcome.map_err(|e| {
        error!("RX8025 bus transaction failed: {:?}", e);
        RtcError::from_bus(e)
    })
}
