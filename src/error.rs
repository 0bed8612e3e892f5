//! # Error Types
//!
//! Custom error types for the AVL encoder using `thiserror`.

use thiserror::Error;

/// Main error type for the AVL encoder
#[derive(Debug, Error)]
pub enum AvlError {
    /// An I/O bucket already holds its maximum number of readings
    #[error("I/O bucket for {width}-byte values is full (capacity {capacity})")]
    IoCapacityExceeded { width: usize, capacity: usize },

    /// The output sink cannot hold the next primitive write
    #[error("Sink exhausted: need {needed} bytes, {remaining} remaining")]
    SinkExhausted { needed: usize, remaining: usize },

    /// Multi-record framing was asked to encode zero records
    #[error("Packet must contain at least one record")]
    NoRecords,

    /// Record count does not fit the 1-byte record count field
    #[error("Too many records for one packet: {0} (max 255)")]
    TooManyRecords(usize),

    /// Declared data field length differs from the bytes actually written
    #[error("Declared length {declared} does not match {written} bytes written")]
    LengthMismatch { declared: u32, written: usize },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the AVL encoder
pub type Result<T> = std::result::Result<T, AvlError>;
