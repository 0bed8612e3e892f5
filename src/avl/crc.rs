//! # CRC-16/ARC Implementation
//!
//! CRC-16 checksum used by Codec 8 packets.
//!
//! **Polynomial**: 0x8005, reflected form 0xA001
//! **Initial Value**: 0x0000
//! **Reflected**: input and output, no final XOR

/// CRC-16/ARC polynomial (bit-reflected)
const CRC16_POLY: u16 = 0xA001;

/// Precomputed CRC16 lookup table for fast calculation
const CRC16_TABLE: [u16; 256] = generate_crc16_table();

/// Generate CRC16 lookup table at compile time
const fn generate_crc16_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = i as u16;
        let mut j = 0;

        while j < 8 {
            if (crc & 0x0001) != 0 {
                crc = (crc >> 1) ^ CRC16_POLY;
            } else {
                crc >>= 1;
            }
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Calculate CRC-16/ARC checksum using lookup table
///
/// # Arguments
///
/// * `data` - Byte slice to calculate CRC for (codec id through trailing record count)
///
/// # Returns
///
/// * `u16` - Calculated CRC16 checksum, `0` for an empty slice
///
/// # Examples
///
/// ```
/// use avl_encoder::avl::crc::crc16_arc;
///
/// assert_eq!(crc16_arc(b"123456789"), 0xBB3D);
/// ```
pub fn crc16_arc(data: &[u8]) -> u16 {
    let mut crc = Crc16Arc::new();
    crc.update(data);
    crc.finish()
}

/// Incremental CRC-16/ARC hasher
///
/// Lets a checksum region that is split over several slices be hashed
/// without first copying it into one buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc16Arc {
    crc: u16,
}

impl Crc16Arc {
    /// Start a new checksum with the initial value 0
    pub fn new() -> Self {
        Self { crc: 0 }
    }

    /// Feed more bytes into the checksum
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        for &byte in data {
            let index = ((self.crc ^ byte as u16) & 0x00FF) as usize;
            self.crc = (self.crc >> 8) ^ CRC16_TABLE[index];
        }
        self
    }

    /// Current checksum value
    pub fn finish(&self) -> u16 {
        self.crc
    }
}

/// Calculate CRC-16/ARC checksum using direct algorithm (slow, for verification)
///
/// Bit-by-bit form of the algorithm. Used by tests to check the table.
#[allow(dead_code)]
fn crc16_arc_slow(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;

    for &byte in data {
        crc ^= byte as u16;

        for _ in 0..8 {
            if (crc & 0x0001) != 0 {
                crc = (crc >> 1) ^ CRC16_POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_empty() {
        let data: [u8; 0] = [];
        assert_eq!(crc16_arc(&data), 0x0000);
        assert_eq!(crc16_arc_slow(&data), 0x0000);
    }

    #[test]
    fn test_crc16_check_value() {
        // Standard CRC-16/ARC check value
        assert_eq!(crc16_arc(b"123456789"), 0xBB3D);
        assert_eq!(crc16_arc_slow(b"123456789"), 0xBB3D);
    }

    #[test]
    fn test_crc16_single_byte() {
        let data = [0x00];
        assert_eq!(crc16_arc(&data), 0x0000);

        let data = [0x01];
        assert_eq!(crc16_arc(&data), 0xC0C1);
        assert_eq!(crc16_arc(&data), crc16_arc_slow(&data));
    }

    #[test]
    fn test_crc16_teltonika_sample_body() {
        // Codec id through trailing record count of the Teltonika sample packet
        let body = [
            0x08, 0x01, 0x00, 0x00, 0x01, 0x6B, 0x40, 0xD8, 0xEA, 0x30, 0x01, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x01, 0x05, 0x02, 0x15, 0x03, 0x01, 0x01, 0x01, 0x42, 0x5E, 0x0F, 0x01,
            0xF1, 0x00, 0x00, 0x60, 0x1A, 0x01, 0x4E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x01,
        ];
        assert_eq!(body.len(), 54);
        assert_eq!(crc16_arc(&body), 0xC7CF);
    }

    #[test]
    fn test_crc16_lookup_table_matches_slow() {
        let test_data = [
            vec![0x01, 0x02, 0x03],
            vec![0xFF, 0xFE, 0xFD],
            vec![0x08, 0x01, 0x00, 0x01],
            vec![0x00; 32],
            vec![0xFF; 10],
        ];

        for data in test_data.iter() {
            assert_eq!(
                crc16_arc(data),
                crc16_arc_slow(data),
                "CRC mismatch for data: {:?}",
                data
            );
        }
    }

    #[test]
    fn test_crc16_deterministic() {
        let data = [0x08, 0x01, 0x12, 0x34, 0x56, 0x01];
        assert_eq!(crc16_arc(&data), crc16_arc(&data));
    }

    #[test]
    fn test_crc16_incremental_matches_one_shot() {
        let data = b"codec 8 checksum region";
        let (head, tail) = data.split_at(7);

        let mut crc = Crc16Arc::new();
        crc.update(head).update(&[]).update(tail);

        assert_eq!(crc.finish(), crc16_arc(data));
    }

    #[test]
    fn test_crc16_changes_with_data() {
        let crc1 = crc16_arc(&[0x08, 0x01, 0x00, 0x04]);
        let crc2 = crc16_arc(&[0x08, 0x01, 0x00, 0x05]);

        assert_ne!(crc1, crc2, "CRC should change when data changes");
    }
}
