//! LED driver.
//!
//! The LED kernel module exposes no read/write interface; state changes go
//! through two parameterless ioctls with magic `'L'`: request 0 switches
//! the LED on, request 1 switches it off.

use std::os::fd::AsRawFd;

use devboard_core::{Error, Result};
use tracing::{debug, error, info};

use crate::node::{DeviceNode, OpenMode};

mod ioctl {
    // _IO('L', 0) and _IO('L', 1), matching the kernel module.
    nix::ioctl_none!(led_on, b'L', 0);
    nix::ioctl_none!(led_off, b'L', 1);
}

/// Driver for an LED device node.
///
/// # Examples
///
/// ```no_run
/// use devboard_drivers::Led;
///
/// # fn main() -> devboard_core::Result<()> {
/// let mut led = Led::new("led0");
/// led.init()?;
/// led.turn_on()?;
/// led.turn_off()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Led {
    node: DeviceNode,
}

impl Led {
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

    /// Set the LED state.
    ///
    /// # Errors
    ///
    /// Returns `DevNotReady` before a successful `init()`, `DevIo` if the
    /// ioctl fails.
    pub fn set_state(&mut self, on: bool) -> Result<()> {
        let fd = self.node.file()?.as_raw_fd();

        let res = unsafe {
            if on {
                ioctl::led_on(fd)
            } else {
                ioctl::led_off(fd)
            }
        };

        if let Err(e) = res {
            error!(device = %self.node.name(), on, "set state failed");
            return Err(Error::dev_io(
                self.node.name().to_string(),
                format!("ioctl failed: {e}"),
            ));
        }

        debug!(device = %self.node.name(), state = if on { "on" } else { "off" }, "state set");
        Ok(())
    }

    /// Switch the LED on.
    pub fn turn_on(&mut self) -> Result<()> {
        self.set_state(true)
    }

    /// Switch the LED off.
    pub fn turn_off(&mut self) -> Result<()> {
        self.set_state(false)
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
