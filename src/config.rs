//! # Configuration Module
//!
//! Handles loading and validating encoder job files from TOML.
//!
//! A job file lists the records to encode and where the packet goes.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::avl::io::IoElements;
use crate::avl::protocol::{
    AvlRecord, GpsElement, Priority, AVL_MAX_RECORDS, N1_CAPACITY, N2_CAPACITY, N4_CAPACITY,
    N8_CAPACITY,
};
use crate::error::{AvlError, Result};

/// Supported output formats
const OUTPUT_FORMATS: &[&str] = &["hex", "binary"];

/// Largest output buffer the tool will allocate
const MAX_BUFFER_SIZE: usize = 65_536;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub records: Vec<RecordConfig>,
}

/// Packet output configuration
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_format")]
    pub format: String,

    /// Output file, empty for stdout
    #[serde(default)]
    pub path: String,

    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            path: String::new(),
            buffer_size: default_buffer_size(),
        }
    }
}

/// One AVL record to encode
#[derive(Debug, Deserialize, Clone)]
pub struct RecordConfig {
    /// Milliseconds since the Unix epoch; the current time when absent
    #[serde(default)]
    pub timestamp: Option<u64>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub event_io_id: u8,

    #[serde(default)]
    pub gps: GpsConfig,

    #[serde(default)]
    pub io: IoConfig,
}

/// GPS element of a record
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct GpsConfig {
    #[serde(default)]
    pub latitude: f64,

    #[serde(default)]
    pub longitude: f64,

    #[serde(default)]
    pub altitude: u16,

    #[serde(default)]
    pub angle: u16,

    #[serde(default)]
    pub satellites: u8,

    #[serde(default)]
    pub speed: u16,
}

/// I/O readings of a record, by value width
#[derive(Debug, Deserialize, Clone, Default)]
pub struct IoConfig {
    #[serde(default)]
    pub n1: Vec<IoReading<u8>>,

    #[serde(default)]
    pub n2: Vec<IoReading<u16>>,

    #[serde(default)]
    pub n4: Vec<IoReading<u32>>,

    #[serde(default)]
    pub n8: Vec<IoReading<u64>>,
}

/// A single `(id, value)` reading
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct IoReading<T> {
    pub id: u8,
    pub value: T,
}

// Default value functions
fn default_output_format() -> String { "hex".to_string() }
fn default_buffer_size() -> usize { 1280 }

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the job file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use avl_encoder::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the AVL records, stamping missing timestamps with the current time
    pub fn to_records(&self) -> Result<Vec<AvlRecord>> {
        let now_ms = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        self.to_records_at(now_ms)
    }

    /// Build the AVL records, using `now_ms` for missing timestamps
    pub fn to_records_at(&self, now_ms: u64) -> Result<Vec<AvlRecord>> {
        self.records
            .iter()
            .map(|record| record.to_record(now_ms))
            .collect()
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if !OUTPUT_FORMATS.contains(&self.output.format.as_str()) {
            return Err(config_error("output format must be one of: hex, binary"));
        }

        if self.output.buffer_size == 0 || self.output.buffer_size > MAX_BUFFER_SIZE {
            return Err(config_error(format!(
                "buffer_size must be between 1 and {}",
                MAX_BUFFER_SIZE
            )));
        }

        if self.records.is_empty() {
            return Err(config_error("at least one [[records]] entry is required"));
        }

        if self.records.len() > AVL_MAX_RECORDS {
            return Err(config_error(format!(
                "too many records: {} (max {})",
                self.records.len(),
                AVL_MAX_RECORDS
            )));
        }

        for (index, record) in self.records.iter().enumerate() {
            for (name, count, capacity) in [
                ("n1", record.io.n1.len(), N1_CAPACITY),
                ("n2", record.io.n2.len(), N2_CAPACITY),
                ("n4", record.io.n4.len(), N4_CAPACITY),
                ("n8", record.io.n8.len(), N8_CAPACITY),
            ] {
                if count > capacity {
                    return Err(config_error(format!(
                        "records[{}].io.{} has {} readings (max {})",
                        index, name, count, capacity
                    )));
                }
            }
        }

        Ok(())
    }
}

impl RecordConfig {
    /// Convert to an [`AvlRecord`], adding readings in file order
    ///
    /// # Errors
    ///
    /// Returns [`AvlError::IoCapacityExceeded`] if a bucket overflows
    pub fn to_record(&self, now_ms: u64) -> Result<AvlRecord> {
        let mut io = IoElements {
            event_io_id: self.event_io_id,
            ..IoElements::default()
        };
        for reading in &self.io.n1 {
            io.add_n1(reading.id, reading.value)?;
        }
        for reading in &self.io.n2 {
            io.add_n2(reading.id, reading.value)?;
        }
        for reading in &self.io.n4 {
            io.add_n4(reading.id, reading.value)?;
        }
        for reading in &self.io.n8 {
            io.add_n8(reading.id, reading.value)?;
        }

        Ok(AvlRecord {
            timestamp: self.timestamp.unwrap_or(now_ms),
            priority: self.priority,
            gps: GpsElement {
                latitude: self.gps.latitude,
                longitude: self.gps.longitude,
                altitude: self.gps.altitude,
                angle: self.gps.angle,
                satellites: self.gps.satellites,
                speed: self.gps.speed,
            },
            io,
        })
    }
}

fn config_error<T: std::fmt::Display>(msg: T) -> AvlError {
    AvlError::Config(toml::de::Error::custom(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_record() -> RecordConfig {
        RecordConfig {
            timestamp: Some(1_700_000_000_000),
            priority: Priority::High,
            event_io_id: 1,
            gps: GpsConfig {
                latitude: 37.9838,
                longitude: 23.7275,
                altitude: 100,
                angle: 90,
                satellites: 8,
                speed: 60,
            },
            io: IoConfig {
                n1: vec![IoReading { id: 1, value: 1 }],
                ..IoConfig::default()
            },
        }
    }

    fn create_valid_config() -> Config {
        Config {
            output: OutputConfig::default(),
            records: vec![create_valid_record()],
        }
    }

    #[test]
    fn test_default_config() {
        assert!(create_valid_config().validate().is_ok());
    }

    #[test]
    fn test_output_defaults() {
        let output = OutputConfig::default();
        assert_eq!(output.format, "hex");
        assert_eq!(output.buffer_size, 1280);
        assert!(output.path.is_empty());
    }

    #[test]
    fn test_invalid_output_format() {
        let mut config = create_valid_config();
        config.output.format = "jsonl".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_binary_output_format() {
        let mut config = create_valid_config();
        config.output.format = "binary".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_buffer_size_zero() {
        let mut config = create_valid_config();
        config.output.buffer_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_buffer_size_too_high() {
        let mut config = create_valid_config();
        config.output.buffer_size = MAX_BUFFER_SIZE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_records() {
        let mut config = create_valid_config();
        config.records.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_too_many_records() {
        let mut config = create_valid_config();
        config.records = vec![create_valid_record(); 256];
        assert!(config.validate().is_err());

        config.records.truncate(255);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_io_bucket_over_capacity() {
        let mut config = create_valid_config();
        config.records[0].io.n8 = vec![IoReading { id: 1, value: 1 }; 3];

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("records[0].io.n8"));
    }

    #[test]
    fn test_to_record() {
        let record = create_valid_record().to_record(0).unwrap();

        assert_eq!(record.timestamp, 1_700_000_000_000);
        assert_eq!(record.priority, Priority::High);
        assert_eq!(record.gps.longitude_e7(), 237_275_000);
        assert_eq!(record.gps.satellites, 8);
        assert_eq!(record.io.event_io_id, 1);
        assert_eq!(record.io.total(), 1);
    }

    #[test]
    fn test_to_record_missing_timestamp_uses_now() {
        let mut record = create_valid_record();
        record.timestamp = None;

        assert_eq!(record.to_record(1234).unwrap().timestamp, 1234);
    }

    #[test]
    fn test_to_record_rejects_overflowing_bucket() {
        let mut record = create_valid_record();
        record.io.n4 = vec![IoReading { id: 9, value: 9 }; 5];

        let result = record.to_record(0);
        assert!(matches!(
            result,
            Err(AvlError::IoCapacityExceeded { width: 4, capacity: 4 })
        ));
    }

    #[test]
    fn test_to_records_now_is_recent() {
        let mut config = create_valid_config();
        config.records[0].timestamp = None;

        let records = config.to_records().unwrap();
        // Later than 2020-01-01
        assert!(records[0].timestamp > 1_577_836_800_000);
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[output]
format = "binary"

[[records]]
timestamp = 1700000000000
priority = "panic"
event_io_id = 239

[records.gps]
latitude = 54.6872
longitude = 25.2797
satellites = 11

[records.io]
n1 = [{ id = 239, value = 1 }, { id = 240, value = 0 }]
n2 = [{ id = 66, value = 12450 }]

[[records]]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.output.format, "binary");
        assert_eq!(config.output.buffer_size, 1280);
        assert_eq!(config.records.len(), 2);

        let records = config.to_records_at(5).unwrap();
        assert_eq!(records[0].priority, Priority::Panic);
        assert_eq!(records[0].io.n1.len(), 2);
        assert_eq!(records[0].io.n2.iter().next(), Some(&(66, 12450)));
        assert_eq!(records[1].timestamp, 5);
        assert_eq!(records[1].priority, Priority::Low);
    }

    #[test]
    fn test_load_config_unknown_priority() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[[records]]\npriority = \"urgent\"\n")
            .unwrap();
        temp_file.flush().unwrap();

        assert!(matches!(
            Config::load(temp_file.path()),
            Err(AvlError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/avl-encoder.toml");
        assert!(matches!(result, Err(AvlError::Io(_))));
    }
}
