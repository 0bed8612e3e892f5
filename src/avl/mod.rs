//! # AVL Codec 8 Module
//!
//! Implementation of the Teltonika Codec 8 AVL data packet encoder.
//!
//! This module handles:
//! - Fixed-capacity I/O readings grouped by value width
//! - AVL record encoding (timestamp, priority, GPS, I/O)
//! - Packet framing with declared data length and record counts
//! - CRC-16/ARC checksum calculation
//! - Encoding into caller-owned buffers

pub mod buffer;
pub mod crc;
pub mod encoder;
pub mod io;
pub mod protocol;
pub mod sink;
