//! Byte-level register transactions over a shared I2C bus.

use embedded_hal_async::i2c::{self, I2c};

/// Register access the clock driver needs from the bus.
///
/// Each method is one bus transaction; nothing else may use the bus while it
/// is in flight. Any async I2C bus implements this trait, so tests substitute
/// an in-memory bus and firmware hands over its HAL peripheral or a shared
/// bus device.
pub trait RegisterTransport {
    type Error: i2c::Error;

    /// Write `bytes` to the device at `address`. The first byte selects the
    /// register pointer; any following bytes are stored from there on.
    fn write_sequence(
        &mut self,
        address: u8,
        bytes: &[u8],
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Fill `buffer` starting at the device's current register pointer.
    fn read_bytes(
        &mut self,
        address: u8,
        buffer: &mut [u8],
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Select `register` and read exactly one byte back.
    fn read_byte(
        &mut self,
        address: u8,
        register: u8,
    ) -> impl Future<Output = Result<u8, Self::Error>>;
}

impl<I: I2c> RegisterTransport for I {
    type Error = I::Error;

    async fn write_sequence(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.write(address, bytes).await
    }

    async fn read_bytes(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.read(address, buffer).await
    }

    async fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        let mut byte = [0u8; 1];
        self.write_read(address, &[register], &mut byte).await?;
        Ok(byte[0])
    }
}
