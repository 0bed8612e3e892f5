//! # Codec 8 Protocol Constants and Types
//!
//! Core protocol definitions for Teltonika AVL data packets.

use serde::Deserialize;

use super::io::IoElements;

/// Packet preamble (always four zero bytes)
pub const AVL_PREAMBLE: [u8; 4] = [0x00; 4];

/// Codec 8 identifier
pub const AVL_CODEC_8: u8 = 0x08;

/// Bytes in the data field length besides the records:
/// codec id(1) + record count(1) + trailing record count(1)
pub const AVL_DATA_FIELD_OVERHEAD: u32 = 3;

/// Width of the CRC field on the wire (16-bit CRC, upper two bytes zero)
pub const AVL_CRC_FIELD_SIZE: usize = 4;

/// Packet header size: preamble(4) + data field length(4) + codec id(1) + record count(1)
pub const PACKET_HEADER_LEN: usize = AVL_PREAMBLE.len() + 4 + 1 + 1;

/// Packet trailer size: record count(1) + crc(4)
pub const PACKET_TRAILER_LEN: usize = 1 + AVL_CRC_FIELD_SIZE;

/// Maximum number of records in one packet (1-byte record count field)
pub const AVL_MAX_RECORDS: usize = u8::MAX as usize;

/// Coordinate scale: decimal degrees to wire integer
pub const COORDINATE_SCALE: f64 = 10_000_000.0;

/// I/O bucket capacities, per value width
pub const N1_CAPACITY: usize = 16;
pub const N2_CAPACITY: usize = 8;
pub const N4_CAPACITY: usize = 4;
pub const N8_CAPACITY: usize = 2;

/// Record priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    High,
    Panic,
}

impl Priority {
    /// Numeric value written to the wire
    pub fn wire_value(self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::High => 1,
            Priority::Panic => 2,
        }
    }
}

/// GPS element of an AVL record
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GpsElement {
    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,

    /// Altitude in meters above sea level
    pub altitude: u16,

    /// Heading in degrees from north
    pub angle: u16,

    /// Number of visible satellites
    pub satellites: u8,

    /// Speed in km/h
    pub speed: u16,
}

impl GpsElement {
    /// Whether the element carries a fix
    ///
    /// Devices report "no fix" as zero altitude, satellites and speed.
    pub fn is_valid_fix(&self) -> bool {
        !(self.altitude == 0 && self.satellites == 0 && self.speed == 0)
    }

    /// Longitude as the scaled wire integer
    pub fn longitude_e7(&self) -> i32 {
        scale_coordinate(self.longitude)
    }

    /// Latitude as the scaled wire integer
    pub fn latitude_e7(&self) -> i32 {
        scale_coordinate(self.latitude)
    }
}

/// Convert decimal degrees to the signed wire integer
///
/// Truncates toward zero; values outside the `i32` range saturate.
pub fn scale_coordinate(degrees: f64) -> i32 {
    (degrees * COORDINATE_SCALE) as i32
}

/// One AVL record: a timestamped GPS fix with I/O readings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvlRecord {
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,

    pub priority: Priority,

    pub gps: GpsElement,

    pub io: IoElements,
}
