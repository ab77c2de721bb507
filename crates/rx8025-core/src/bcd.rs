//! Binary-coded decimal codec for two-digit register fields.

use crate::error::{Field, FieldError};

/// Largest decimal value a single BCD byte can hold.
pub const MAX_DECIMAL: u8 = 99;

/// Pack `decimal` into one byte: tens in the high nibble, ones in the low.
pub const fn encode(decimal: u8) -> Result<u8, FieldError> {
    if decimal > MAX_DECIMAL {
        return Err(FieldError::out_of_range(Field::Bcd, decimal as i64));
    }
    Ok((decimal / 10) * 16 + decimal % 10)
}

/// Unpack a BCD byte; both nibbles must be decimal digits.
pub const fn decode(bcd: u8) -> Result<u8, FieldError> {
    if bcd >> 4 > 9 || bcd & 0x0F > 9 {
        return Err(FieldError::InvalidBcd(bcd));
    }
    Ok(bcd - 6 * (bcd >> 4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode(35), Ok(0x35));
        assert_eq!(encode(59), Ok(0x59));
        assert_eq!(encode(0), Ok(0x00));
        assert_eq!(encode(99), Ok(0x99));
    }

    #[test]
    fn test_bijection_over_decimal_range() {
        for n in 0..=MAX_DECIMAL {
            let byte = encode(n).unwrap();
            assert_eq!(decode(byte), Ok(n), "decode(encode({n})) must be {n}");
        }
    }

    #[test]
    fn test_encode_rejects_three_digits() {
        assert_eq!(
            encode(100),
            Err(FieldError::OutOfRange {
                field: Field::Bcd,
                value: 100
            })
        );
    }

    #[test]
    fn test_decode_rejects_hex_nibbles() {
        assert_eq!(decode(0x1A), Err(FieldError::InvalidBcd(0x1A)));
        assert_eq!(decode(0xA1), Err(FieldError::InvalidBcd(0xA1)));
        assert_eq!(decode(0xFF), Err(FieldError::InvalidBcd(0xFF)));
    }
}
