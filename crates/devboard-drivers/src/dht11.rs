//! DHT11 temperature/humidity sensor driver.
//!
//! One read on the device node returns exactly four unsigned 8-bit values:
//! humidity integer part, humidity fractional part, temperature integer
//! part, temperature fractional part.

use std::io::Read;

use devboard_core::{Dht11Data, Error, Result};
use tracing::{debug, error, info};

use crate::node::{DeviceNode, OpenMode};

/// Byte size of one sensor record.
const RECORD_SIZE: usize = 4;

/// Driver for the DHT11 sensor node.
#[derive(Debug)]
pub struct Dht11 {
    node: DeviceNode,
}

impl Dht11 {
    /// Create an uninitialized driver for `/dev/<name>`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            node: DeviceNode::new(name),
        }
    }

    /// Create an uninitialized driver with an explicit node path (test rigs).
    pub fn with_path(name: impl Into<String>, path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            node: DeviceNode::with_path(name, path),
        }
    }

    /// Open the device node. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `DevOpen` if the node cannot be opened.
    pub fn init(&mut self) -> Result<()> {
        self.node.open(OpenMode::ReadOnly)?;
        info!(device = %self.node.name(), "init success");
        Ok(())
    }

    /// Read one sensor record.
    ///
    /// # Errors
    ///
    /// Returns `DevNotReady` before a successful `init()`, `DevIo` if the
    /// read fails or yields anything other than exactly four bytes.
    pub fn read_data(&mut self) -> Result<Dht11Data> {
        let mut file = self.node.file()?;

        let mut buf = [0u8; RECORD_SIZE];
        let n = file.read(&mut buf).map_err(|e| {
            error!(device = %self.node.name(), "read failed");
            Error::dev_io(self.node.name().to_string(), format!("read failed: {e}"))
        })?;

        if n != RECORD_SIZE {
            error!(device = %self.node.name(), expected = RECORD_SIZE, got = n, "read size mismatch");
            return Err(Error::dev_io(
                self.node.name().to_string(),
                format!("read size mismatch: expected {RECORD_SIZE}, got {n}"),
            ));
        }

        let data = Dht11Data {
            humidity_int: buf[0],
            humidity_frac: buf[1],
            temperature_int: buf[2],
            temperature_frac: buf[3],
        };

        debug!(
            device = %self.node.name(),
            humidity = data.humidity(),
            temperature = data.temperature(),
            "sensor read"
        );
        Ok(data)
    }

    /// Whether `init()` has succeeded.
    pub fn is_ready(&self) -> bool {
        self.node.is_open()
    }

    /// Logical device name.
    pub fn device_name(&self) -> &str {
        self.node.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devboard_core::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_data_decodes_four_fields() {
        let mut backing = NamedTempFile::new().unwrap();
        backing.write_all(&[45, 2, 23, 7]).unwrap();
        backing.flush().unwrap();

        let mut sensor = Dht11::with_path("dht11", backing.path());
        sensor.init().unwrap();

        let data = sensor.read_data().unwrap();
        assert_eq!(data.humidity_int, 45);
        assert_eq!(data.humidity_frac, 2);
        assert_eq!(data.temperature_int, 23);
        assert_eq!(data.temperature_frac, 7);
    }

    #[test]
    fn test_short_read_is_dev_io() {
        let mut backing = NamedTempFile::new().unwrap();
        backing.write_all(&[45, 2]).unwrap();
        backing.flush().unwrap();

        let mut sensor = Dht11::with_path("dht11", backing.path());
        sensor.init().unwrap();

        let err = sensor.read_data().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DevIo);
    }

    #[test]
    fn test_read_before_init_is_not_ready() {
        let mut sensor = Dht11::new("dht11");
        let err = sensor.read_data().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DevNotReady);
    }

    #[test]
    fn test_init_missing_node_is_dev_open() {
        let mut sensor = Dht11::new("no-such-sensor");
        let err = sensor.init().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DevOpen);
        assert!(!sensor.is_ready());
    }
}
