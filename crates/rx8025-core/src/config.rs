use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::calendar::EpochAnchor;
use crate::error::ConfigError;
use crate::registers::{DEFAULT_CONTROL, RX8025_ADDRESS};

/// Default upper bound on a single bus transaction.
pub const DEFAULT_BUS_TIMEOUT_MS: u32 = 50;

/// Encoded size upper bound for [`RtcConfig`] with postcard.
pub const RTC_CONFIG_MAX_SIZE: usize = 16;

/// Clock driver settings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcConfig {
    /// 7-bit bus address of the chip.
    pub address: u8,
    /// Control 1 and control 2 bytes written on initialization.
    pub control: [u8; 2],
    /// Anchor used to turn chip time into Unix time.
    pub anchor: EpochAnchor,
    /// Bound on each bus transaction; `None` waits forever.
    pub bus_timeout_ms: Option<u32>,
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self {
            address: RX8025_ADDRESS,
            control: DEFAULT_CONTROL,
            anchor: EpochAnchor::LEGACY,
            bus_timeout_ms: Some(DEFAULT_BUS_TIMEOUT_MS),
        }
    }
}

impl RtcConfig {
    pub fn with_anchor(mut self, anchor: EpochAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_bus_timeout_ms(mut self, timeout_ms: Option<u32>) -> Self {
        self.bus_timeout_ms = timeout_ms;
        self
    }

    pub fn bus_timeout(&self) -> Option<Duration> {
        self.bus_timeout_ms
            .map(|ms| Duration::from_millis(u64::from(ms)))
    }

    /// Encode into `buf`, returning the used prefix.
    pub fn to_slice<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(ConfigError::Encode)
    }

    /// Decode a config previously written by [`RtcConfig::to_slice`].
    /// Anchor shifts beyond ±24 hours are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(ConfigError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_chip() {
        let config = RtcConfig::default();
        assert_eq!(config.address, 0x32);
        assert_eq!(config.control, [0x20, 0x00]);
        assert_eq!(config.anchor, EpochAnchor::LEGACY);
        assert_eq!(config.bus_timeout(), Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_persisted_config_is_restored() {
        let config = RtcConfig::default()
            .with_anchor(EpochAnchor::UTC)
            .with_bus_timeout_ms(None);
        let mut buf = [0u8; RTC_CONFIG_MAX_SIZE];
        let used = config.to_slice(&mut buf).unwrap().len();
        assert_eq!(RtcConfig::from_bytes(&buf[..used]).unwrap(), config);
    }

    #[test]
    fn test_out_of_range_anchor_is_rejected() {
        let mut buf = [0u8; RTC_CONFIG_MAX_SIZE];
        let encoded = RtcConfig::default().to_slice(&mut buf).unwrap();
        // address, two control bytes, then the zigzag varint of 28 800
        assert_eq!(&encoded[..6], &[0x32, 0x20, 0x00, 0x80, 0xC2, 0x03]);

        // Same layout with a 25 hour shift (zigzag(90_000) = 180_000)
        encoded[3..6].copy_from_slice(&[0xA0, 0xFE, 0x0A]);
        assert!(matches!(
            RtcConfig::from_bytes(encoded),
            Err(ConfigError::Decode(_))
        ));
    }
}
