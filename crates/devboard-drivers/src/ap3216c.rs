//! AP3216C ambient-light/proximity sensor driver.
//!
//! One read on the device node returns exactly three unsigned 16-bit
//! values in host byte order: infrared, ambient light, proximity.

use std::io::Read;

use devboard_core::{Ap3216cData, Error, Result};
use tracing::{debug, error, info};

use crate::node::{DeviceNode, OpenMode};

/// Byte size of one sensor record (three u16 channels).
const RECORD_SIZE: usize = 6;

/// Driver for the AP3216C sensor node.
///
/// # Examples
///
/// ```no_run
/// use devboard_drivers::Ap3216c;
///
/// # fn main() -> devboard_core::Result<()> {
/// let mut sensor = Ap3216c::new("ap3216c");
/// sensor.init()?;
/// let data = sensor.read_data()?;
/// println!("ir={} als={} ps={}", data.ir, data.als, data.ps);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Ap3216c {
    node: DeviceNode,
}

impl Ap3216c {
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
        self.node.open(OpenMode::ReadWrite)?;
        info!(device = %self.node.name(), "init success");
        Ok(())
    }

    /// Read one sensor record.
    ///
    /// The data is returned by value, so a failed read never leaves a
    /// partially-filled struct with the caller.
    ///
    /// # Errors
    ///
    /// Returns `DevNotReady` before a successful `init()`, `DevIo` if the
    /// read fails or yields anything other than exactly six bytes.
    pub fn read_data(&mut self) -> Result<Ap3216cData> {
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

        let data = Ap3216cData {
            ir: u16::from_ne_bytes([buf[0], buf[1]]),
            als: u16::from_ne_bytes([buf[2], buf[3]]),
            ps: u16::from_ne_bytes([buf[4], buf[5]]),
        };

        debug!(device = %self.node.name(), ir = data.ir, als = data.als, ps = data.ps, "sensor read");
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

    fn sensor_backed_by(bytes: &[u8]) -> (Ap3216c, NamedTempFile) {
        let mut backing = NamedTempFile::new().unwrap();
        backing.write_all(bytes).unwrap();
        backing.flush().unwrap();
        (Ap3216c::with_path("ap3216c", backing.path()), backing)
    }

    #[test]
    fn test_read_data_decodes_three_channels() {
        let mut record = Vec::new();
        record.extend_from_slice(&10u16.to_ne_bytes());
        record.extend_from_slice(&200u16.to_ne_bytes());
        record.extend_from_slice(&3000u16.to_ne_bytes());

        let (mut sensor, _backing) = sensor_backed_by(&record);
        sensor.init().unwrap();

        let data = sensor.read_data().unwrap();
        assert_eq!(data.ir, 10);
        assert_eq!(data.als, 200);
        assert_eq!(data.ps, 3000);
    }

    #[test]
    fn test_short_read_is_dev_io() {
        let (mut sensor, _backing) = sensor_backed_by(&[1, 2, 3, 4, 5]);
        sensor.init().unwrap();

        let err = sensor.read_data().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DevIo);
    }

    #[test]
    fn test_read_before_init_is_not_ready() {
        let mut sensor = Ap3216c::new("ap3216c");
        let err = sensor.read_data().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DevNotReady);
    }

    #[test]
    fn test_init_twice_is_ok() {
        let (mut sensor, _backing) = sensor_backed_by(&[0u8; 6]);
        sensor.init().unwrap();
        sensor.init().unwrap();
        assert!(sensor.is_ready());
    }

    #[test]
    fn test_init_missing_node_is_dev_open() {
        let mut sensor = Ap3216c::new("no-such-sensor");
        let err = sensor.init().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DevOpen);
        assert!(!sensor.is_ready());
    }
}
