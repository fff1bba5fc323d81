//! CRC16 calculation for frame validation
//!
//! Every frame carries a 16-bit checksum over its payload so a load can tell a
//! valid frame from stale or damaged bytes in backup memory.

use crc::{Crc, CRC_16_IBM_3740};

/// CRC16 algorithm (IBM 3740 / CCITT-FALSE)
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// Size of the checksum field in bytes
pub const CRC_SIZE: usize = 2;

/// Calculate CRC16 checksum of data
///
/// Uses CRC-16/IBM-3740 (polynomial 0x1021, init 0xFFFF, no reflection).
///
/// # Example
///
/// ```
/// use retained_kv_core::crc::calculate_crc16;
///
/// assert_eq!(calculate_crc16(b"123456789"), 0x29B1);
/// ```
pub fn calculate_crc16(data: &[u8]) -> u16 {
    CRC16.checksum(data)
}

/// Validate data against CRC16 checksum
///
/// Returns `true` if the checksum matches.
pub fn validate_crc16(data: &[u8], expected_crc: u16) -> bool {
    calculate_crc16(data) == expected_crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_known_values() {
        let test_cases = [
            (b"" as &[u8], 0xFFFFu16),
            (b"123456789", 0x29B1),
        ];

        for (data, expected) in test_cases {
            assert_eq!(calculate_crc16(data), expected);
        }
    }

    #[test]
    fn test_validate_crc16() {
        let data = b"Test data for CRC validation";
        let crc = calculate_crc16(data);

        assert!(validate_crc16(data, crc));
        assert!(!validate_crc16(data, crc.wrapping_add(1)));
    }

    #[test]
    fn test_crc16_detects_single_bit_flip() {
        let mut data = *b"Original payload";
        let crc = calculate_crc16(&data);

        data[3] ^= 0x01;

        assert!(!validate_crc16(&data, crc));
    }
}
