//! # AVL Packet Encoder
//!
//! Encodes AVL records into Codec 8 packets.
//!
//! Packet layout (all integers big-endian):
//! ```text
//! Preamble(4) | Data Field Length(4) | Codec ID(1) | Record Count(1)
//!     | Record... | Record Count(1) | CRC(4)
//! ```
//!
//! The data field length covers codec id through the trailing record count,
//! which is also the range the CRC is computed over.

use tracing::{debug, trace, warn};

use super::crc::crc16_arc;
use super::protocol::*;
use super::sink::ByteSink;
use crate::error::{AvlError, Result};

/// One fixed-width field of an encoded record
///
/// The wire order of a record is the order of [`RECORD_FIELDS`], not the
/// order of the fields in [`AvlRecord`].
#[derive(Clone, Copy)]
pub struct RecordField {
    /// Field name, used in logs
    pub name: &'static str,

    /// Encoded width in bytes
    pub width: usize,

    write: fn(&AvlRecord, &mut dyn ByteSink) -> Result<()>,
}

impl std::fmt::Debug for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordField")
            .field("name", &self.name)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

/// Fixed part of a record, in wire order
///
/// The variable-length I/O buckets follow the last entry.
pub const RECORD_FIELDS: [RecordField; 10] = [
    RecordField {
        name: "timestamp",
        width: 8,
        write: |record, sink| sink.put_u64(record.timestamp),
    },
    RecordField {
        name: "priority",
        width: 1,
        write: |record, sink| sink.put_u8(record.priority.wire_value()),
    },
    // Longitude precedes latitude on the wire
    RecordField {
        name: "longitude",
        width: 4,
        write: |record, sink| sink.put_i32(record.gps.longitude_e7()),
    },
    RecordField {
        name: "latitude",
        width: 4,
        write: |record, sink| sink.put_i32(record.gps.latitude_e7()),
    },
    RecordField {
        name: "altitude",
        width: 2,
        write: |record, sink| sink.put_u16(record.gps.altitude),
    },
    RecordField {
        name: "angle",
        width: 2,
        write: |record, sink| sink.put_u16(record.gps.angle),
    },
    RecordField {
        name: "satellites",
        width: 1,
        write: |record, sink| sink.put_u8(record.gps.satellites),
    },
    RecordField {
        name: "speed",
        width: 2,
        write: |record, sink| sink.put_u16(record.gps.speed),
    },
    RecordField {
        name: "event_io_id",
        width: 1,
        write: |record, sink| sink.put_u8(record.io.event_io_id),
    },
    // Bucket capacities sum to 30, so the total always fits
    RecordField {
        name: "io_total",
        width: 1,
        write: |record, sink| sink.put_u8(record.io.total() as u8),
    },
];

/// Encoded size of the fixed record fields (26 bytes)
pub const RECORD_FIXED_LEN: usize = fields_width(&RECORD_FIELDS);

const fn fields_width(fields: &[RecordField]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < fields.len() {
        total += fields[i].width;
        i += 1;
    }
    total
}

/// Encoded size of one record
pub fn record_len(record: &AvlRecord) -> usize {
    RECORD_FIXED_LEN + record.io.buckets_encoded_len()
}

/// Data field length declared in the packet header for `records`
///
/// Codec id, both record counts and every encoded record.
pub fn data_field_length(records: &[AvlRecord]) -> u32 {
    let records_len: usize = records.iter().map(record_len).sum();
    // At most 255 records of at most 124 bytes each
    AVL_DATA_FIELD_OVERHEAD + records_len as u32
}

/// Encode a single AVL record (no packet framing)
///
/// # Arguments
///
/// * `sink` - Output to write into
/// * `record` - Record to encode
///
/// # Returns
///
/// * `Result<usize>` - Bytes written
///
/// # Errors
///
/// Returns [`AvlError::SinkExhausted`] if the sink fills up. Bytes written
/// before the failing field stay in the sink.
pub fn encode_record(sink: &mut dyn ByteSink, record: &AvlRecord) -> Result<usize> {
    let start = sink.position();

    for field in RECORD_FIELDS.iter() {
        (field.write)(record, sink).inspect_err(|e| {
            debug!("Failed to write record field {}: {}", field.name, e);
        })?;
    }

    record.io.encode_buckets(sink).inspect_err(|e| {
        debug!("Failed to write I/O buckets: {}", e);
    })?;

    let written = sink.position() - start;
    trace!(
        "Encoded record ts={} ({} bytes, {} I/O readings)",
        record.timestamp,
        written,
        record.io.total()
    );
    Ok(written)
}

/// Encode one record into a complete Codec 8 packet
///
/// # Arguments
///
/// * `sink` - Output to write into
/// * `record` - Record to encode
///
/// # Returns
///
/// * `Result<usize>` - Bytes written (header, record, trailer and CRC)
///
/// # Examples
///
/// ```
/// use avl_encoder::avl::encoder::encode_packet;
/// use avl_encoder::avl::protocol::AvlRecord;
/// use bytes::BytesMut;
///
/// let record = AvlRecord::default();
/// let mut packet = BytesMut::new();
/// let len = encode_packet(&mut packet, &record).unwrap();
/// assert_eq!(len, 45);
/// ```
pub fn encode_packet(sink: &mut dyn ByteSink, record: &AvlRecord) -> Result<usize> {
    encode_packet_multi(sink, std::slice::from_ref(record))
}

/// Encode several records into one Codec 8 packet
///
/// Records are written in slice order. The CRC is a 16-bit value carried in
/// a 4-byte field.
///
/// # Errors
///
/// Returns error if:
/// - `records` is empty ([`AvlError::NoRecords`], nothing written)
/// - more than 255 records ([`AvlError::TooManyRecords`], nothing written)
/// - the sink fills up ([`AvlError::SinkExhausted`], partial packet left in the sink)
pub fn encode_packet_multi(sink: &mut dyn ByteSink, records: &[AvlRecord]) -> Result<usize> {
    if records.is_empty() {
        warn!("Refusing to encode a packet with no records");
        return Err(AvlError::NoRecords);
    }
    if records.len() > AVL_MAX_RECORDS {
        warn!("Refusing to encode {} records in one packet", records.len());
        return Err(AvlError::TooManyRecords(records.len()));
    }

    let record_count = records.len() as u8;
    let declared = data_field_length(records);
    let start = sink.position();

    sink.put_slice(&AVL_PREAMBLE)?;
    sink.put_u32(declared)?;

    let crc_start = sink.position();
    sink.put_u8(AVL_CODEC_8)?;
    sink.put_u8(record_count)?;
    for record in records {
        encode_record(sink, record)?;
    }
    sink.put_u8(record_count)?;
    let crc_end = sink.position();

    let written = crc_end - crc_start;
    if written != declared as usize {
        return Err(AvlError::LengthMismatch { declared, written });
    }

    let crc = crc16_arc(&sink.written()[crc_start..crc_end]);
    sink.put_u32(crc as u32)?;

    let total = sink.position() - start;
    debug!(
        "Encoded AVL packet: {} record(s), data length {}, crc 0x{:04X}, {} bytes",
        record_count, declared, crc, total
    );
    Ok(total)
}
