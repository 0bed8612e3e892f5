//! # AVL Encoder Library
//!
//! Encode vehicle telemetry into Teltonika Codec 8 AVL packets.
//!
//! This library provides the record model (GPS fix, priority, I/O readings),
//! the byte-exact Codec 8 encoder and the configuration used by the
//! `avl-encoder` command line tool.

pub mod avl;
pub mod config;
pub mod error;
