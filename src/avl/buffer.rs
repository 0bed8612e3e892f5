//! # Buffer Adapters
//!
//! Encode straight into caller-owned byte regions.
//!
//! Each adapter returns the number of bytes written, or an error. A failed
//! call reports no partial count; bytes written before the failure are left
//! in the buffer and should be discarded by the caller.

use tracing::debug;

use super::crc::Crc16Arc;
use super::encoder::{encode_packet, encode_packet_multi, encode_record};
use super::protocol::*;
use super::sink::{ByteSink, SliceSink};
use crate::error::{AvlError, Result};

/// Encode a single record (no framing) into `buf`
pub fn encode_record_into_buffer(buf: &mut [u8], record: &AvlRecord) -> Result<usize> {
    let mut sink = SliceSink::new(buf);
    encode_record(&mut sink, record)
}

/// Encode one record as a complete packet into `buf`
///
/// # Examples
///
/// ```
/// use avl_encoder::avl::buffer::encode_into_buffer;
/// use avl_encoder::avl::protocol::AvlRecord;
///
/// let mut buf = [0u8; 64];
/// let len = encode_into_buffer(&mut buf, &AvlRecord::default()).unwrap();
/// assert_eq!(&buf[..4], &[0, 0, 0, 0]);
/// assert_eq!(len, 45);
/// ```
pub fn encode_into_buffer(buf: &mut [u8], record: &AvlRecord) -> Result<usize> {
    let mut sink = SliceSink::new(buf);
    encode_packet(&mut sink, record)
}

/// Encode several records as one packet into `buf`
pub fn encode_multi_into_buffer(buf: &mut [u8], records: &[AvlRecord]) -> Result<usize> {
    let mut sink = SliceSink::new(buf);
    encode_packet_multi(&mut sink, records)
}

/// Separate regions of a packet whose records are already encoded
///
/// `body` holds records produced by [`encode_record`]. The framing is
/// written to `header` (first [`PACKET_HEADER_LEN`] bytes) and `trailer`
/// (first [`PACKET_TRAILER_LEN`] bytes). Concatenating the written parts
/// gives the same packet as [`encode_packet_multi`].
#[derive(Debug)]
pub struct PacketRegions<'a> {
    pub header: &'a mut [u8],
    pub body: &'a [u8],
    pub trailer: &'a mut [u8],
}

/// Write packet framing around pre-encoded records
///
/// # Arguments
///
/// * `regions` - Header, body and trailer regions
/// * `record_count` - Number of records encoded in `regions.body`
///
/// # Errors
///
/// Returns error if:
/// - `record_count` is 0 or above 255
/// - `header` or `trailer` is too short (nothing is written in that case)
pub fn frame_encoded_records(regions: PacketRegions<'_>, record_count: usize) -> Result<()> {
    let PacketRegions {
        header,
        body,
        trailer,
    } = regions;

    if record_count == 0 {
        return Err(AvlError::NoRecords);
    }
    if record_count > AVL_MAX_RECORDS {
        return Err(AvlError::TooManyRecords(record_count));
    }
    if header.len() < PACKET_HEADER_LEN {
        return Err(AvlError::SinkExhausted {
            needed: PACKET_HEADER_LEN,
            remaining: header.len(),
        });
    }
    if trailer.len() < PACKET_TRAILER_LEN {
        return Err(AvlError::SinkExhausted {
            needed: PACKET_TRAILER_LEN,
            remaining: trailer.len(),
        });
    }

    let data_len = AVL_DATA_FIELD_OVERHEAD as usize + body.len();
    let declared = u32::try_from(data_len).map_err(|_| AvlError::LengthMismatch {
        declared: u32::MAX,
        written: data_len,
    })?;
    let record_count = record_count as u8;

    let mut header_sink = SliceSink::new(header);
    header_sink.put_slice(&AVL_PREAMBLE)?;
    header_sink.put_u32(declared)?;
    header_sink.put_u8(AVL_CODEC_8)?;
    header_sink.put_u8(record_count)?;

    // Codec id and record count are the last two header bytes
    let header_written = header_sink.written();
    let crc = Crc16Arc::new()
        .update(&header_written[PACKET_HEADER_LEN - 2..])
        .update(body)
        .update(&[record_count])
        .finish();

    let mut trailer_sink = SliceSink::new(trailer);
    trailer_sink.put_u8(record_count)?;
    trailer_sink.put_u32(crc as u32)?;

    debug!(
        "Framed {} pre-encoded record(s): data length {}, crc 0x{:04X}",
        record_count, declared, crc
    );
    Ok(())
}
