//! In-memory RX8025 for host tests and the desktop simulator.
//!
//! The chip is modelled as a 16-byte register file behind an
//! auto-incrementing pointer. Each I2C transaction operates on one register
//! snapshot, so a multi-byte read can never straddle a clock tick, while
//! separate transactions can.

use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use log::{debug, warn};

use crate::bcd;
use crate::datetime::DateTime;
use crate::error::FieldError;
use crate::registers::{RX8025_ADDRESS, Register};

/// Size of the chip's register file.
pub const REGISTER_FILE_LEN: usize = 16;

const POINTER_MASK: u8 = (REGISTER_FILE_LEN - 1) as u8;

/// Simulated RX8025 answering on a virtual I2C bus.
#[derive(Debug, Clone)]
pub struct SimulatedRx8025 {
    address: u8,
    registers: [u8; REGISTER_FILE_LEN],
    pointer: u8,
    tick_per_transaction: u32,
    transactions: u32,
    fault: Option<ErrorKind>,
}

impl Default for SimulatedRx8025 {
    fn default() -> Self {
        Self::new(RX8025_ADDRESS)
    }
}

impl SimulatedRx8025 {
    /// A chip at `address` holding 2000-01-01T00:00:00.
    pub fn new(address: u8) -> Self {
        let mut sim = Self {
            address,
            registers: [0; REGISTER_FILE_LEN],
            pointer: 0,
            tick_per_transaction: 0,
            transactions: 0,
            fault: None,
        };
        sim.store(&DateTime::default());
        sim
    }

    /// Start the clock at `time`.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.store(&time);
        self
    }

    /// Advance the clock by `seconds` after every completed transaction.
    pub fn set_tick_per_transaction(&mut self, seconds: u32) {
        self.tick_per_transaction = seconds;
    }

    /// Fail every transaction with `fault` until cleared with `None`.
    pub fn inject_fault(&mut self, fault: Option<ErrorKind>) {
        self.fault = fault;
    }

    /// Number of transactions the chip has acknowledged.
    pub fn transactions(&self) -> u32 {
        self.transactions
    }

    /// Raw register byte, flag bits included.
    pub fn peek(&self, register: Register) -> u8 {
        self.registers[register.address() as usize]
    }

    /// Overwrite a raw register byte.
    pub fn poke(&mut self, register: Register, raw: u8) {
        self.registers[register.address() as usize] = raw;
    }

    /// Time currently held in the timekeeping registers.
    pub fn now(&self) -> Result<DateTime, FieldError> {
        let field = |reg: Register| bcd::decode(reg.masked(self.peek(reg)));
        DateTime::new(
            field(Register::Year)? as u16,
            field(Register::Month)?,
            field(Register::Day)?,
            field(Register::Hour)?,
            field(Register::Minute)?,
            field(Register::Second)?,
        )
    }

    /// Move the clock forward, carrying into every field like the chip does.
    pub fn advance(&mut self, seconds: u32) {
        let current = match self.now() {
            Ok(time) => time,
            Err(e) => {
                warn!("Simulated RX8025 halted, registers hold no valid time: {}", e);
                return;
            }
        };
        let next = current
            .seconds_time()
            .checked_add(seconds)
            .map(DateTime::from_seconds_time);
        let Some(Ok(next)) = next else {
            warn!("Simulated RX8025 reached the end of its century");
            return;
        };

        let elapsed_days = next.days_since_anchor() - current.days_since_anchor();
        let weekday = Register::Weekday.masked(self.peek(Register::Weekday)) as u32;
        self.store(&next);
        self.write_field(Register::Weekday, ((weekday + elapsed_days) % 7) as u8);
    }

    fn store(&mut self, time: &DateTime) {
        self.write_bcd(Register::Second, time.second());
        self.write_bcd(Register::Minute, time.minute());
        self.write_bcd(Register::Hour, time.hour());
        self.write_bcd(Register::Day, time.day());
        self.write_bcd(Register::Month, time.month());
        self.write_bcd(Register::Year, time.year_offset());
    }

    fn write_bcd(&mut self, register: Register, value: u8) {
        // Every DateTime field is below 100.
        if let Ok(encoded) = bcd::encode(value) {
            self.write_field(register, encoded);
        }
    }

    /// Replace the value bits of `register`, keeping its flag bits.
    fn write_field(&mut self, register: Register, value: u8) {
        let mask = register.mask();
        let slot = &mut self.registers[register.address() as usize];
        *slot = (*slot & !mask) | (value & mask);
    }

    fn next_register(&mut self) -> &mut u8 {
        let slot = &mut self.registers[self.pointer as usize];
        self.pointer = (self.pointer + 1) & POINTER_MASK;
        slot
    }
}

impl ErrorType for SimulatedRx8025 {
    type Error = ErrorKind;
}

impl I2c for SimulatedRx8025 {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        if let Some(fault) = self.fault {
            return Err(fault);
        }

        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    let Some((&pointer, data)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = pointer & POINTER_MASK;
                    debug!("sim: write {:02x?} at {:#04x}", data, self.pointer);
                    for &byte in data {
                        *self.next_register() = byte;
                    }
                }
                Operation::Read(buffer) => {
                    debug!("sim: read {} bytes at {:#04x}", buffer.len(), self.pointer);
                    for slot in buffer.iter_mut() {
                        *slot = *self.next_register();
                    }
                }
            }
        }

        self.transactions += 1;
        if self.tick_per_transaction > 0 {
            self.advance(self.tick_per_transaction);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    fn at(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> DateTime {
        DateTime::new(year, month, day, hour, minute, second).unwrap()
    }

    #[test]
    fn test_advance_carries_into_year() {
        let mut sim = SimulatedRx8025::default().with_time(at(2023, 12, 31, 23, 59, 59));
        sim.advance(1);
        assert_eq!(sim.now().unwrap(), at(2024, 1, 1, 0, 0, 0));
        assert_eq!(sim.peek(Register::Year), 0x24);
    }

    #[test]
    fn test_advance_keeps_flag_bits() {
        let mut sim = SimulatedRx8025::default().with_time(at(2022, 4, 8, 0, 33, 35));
        sim.poke(Register::Second, 0x80 | 0x35);
        sim.advance(1);
        assert_eq!(sim.peek(Register::Second), 0x80 | 0x36);
    }

    #[test]
    fn test_sequential_read_wraps_pointer() {
        let mut sim = SimulatedRx8025::default();
        let mut buf = [0u8; 2];
        block_on(sim.write(RX8025_ADDRESS, &[0x0F, 0xAB, 0xCD])).unwrap();
        block_on(sim.write_read(RX8025_ADDRESS, &[0x0F], &mut buf)).unwrap();
        assert_eq!(buf, [0xAB, 0xCD], "register 0x0F then wraps to 0x00");
    }

    #[test]
    fn test_wrong_address_is_not_acknowledged() {
        let mut sim = SimulatedRx8025::default();
        let err = block_on(sim.write(0x33, &[0x00])).unwrap_err();
        assert_eq!(err, ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        assert_eq!(sim.transactions(), 0);
    }
}
