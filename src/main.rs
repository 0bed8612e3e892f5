//! # AVL Encoder
//!
//! Encode vehicle telemetry into Teltonika Codec 8 AVL packets.
//!
//! Reads a TOML job file listing AVL records, encodes them into a single
//! Codec 8 packet and writes the packet as hex text or raw bytes.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use tracing::{debug, info};

use avl_encoder::avl::buffer::encode_multi_into_buffer;
use avl_encoder::config::{Config, OutputConfig};

/// Job file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for the AVL encoder
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber (stderr, so stdout carries the packet)
///    - Load and validate the job file
///
/// 2. **Encoding**
///    - Convert configured records, stamping missing timestamps with the current time
///    - Encode all records into one packet inside a fixed-size buffer
///
/// 3. **Output**
///    - Write the packet as uppercase hex or raw bytes, to stdout or a file
///
/// # Errors
///
/// Returns error if:
/// - The job file cannot be read or is invalid
/// - The packet does not fit `output.buffer_size`
/// - The output cannot be written
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO avl_encoder: AVL Encoder v0.1.0 starting...
/// INFO avl_encoder: Encoded 1 record(s) into 47 bytes
/// 000000000000002308010000018BCFE56800010E24877816A3DE300064005A08003C010101010100000001000050FF
/// ```
fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("AVL Encoder v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load job file {}", config_path))?;
    debug!("Loaded {} record(s) from {}", config.records.len(), config_path);

    let records = config.to_records()?;

    let mut buffer = vec![0u8; config.output.buffer_size];
    let len = encode_multi_into_buffer(&mut buffer, &records).with_context(|| {
        format!(
            "Failed to encode packet into {}-byte buffer",
            config.output.buffer_size
        )
    })?;
    info!("Encoded {} record(s) into {} bytes", records.len(), len);

    write_packet(&config.output, &buffer[..len])?;

    Ok(())
}

/// Format packet bytes as uppercase hex without separators
fn format_hex(packet: &[u8]) -> String {
    packet.iter().map(|byte| format!("{:02X}", byte)).collect()
}

/// Render the packet in the configured format
fn render_packet(format: &str, packet: &[u8]) -> Vec<u8> {
    match format {
        "binary" => packet.to_vec(),
        _ => {
            let mut text = format_hex(packet);
            text.push('\n');
            text.into_bytes()
        }
    }
}

/// Write the packet to stdout or the configured file
fn write_packet(output: &OutputConfig, packet: &[u8]) -> Result<()> {
    let rendered = render_packet(&output.format, packet);

    if output.path.is_empty() {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&rendered).context("Failed to write packet to stdout")?;
        stdout.flush()?;
    } else {
        fs::write(&output.path, &rendered)
            .with_context(|| format!("Failed to write packet to {}", output.path))?;
        info!("Wrote {} bytes to {}", rendered.len(), output.path);
    }

    Ok(())
}
