//! Evdev-backed key event source.
//!
//! Reads fixed-size `input_event` records from a `/dev/input/event*` node.
//! The read syscall blocks until the kernel delivers an event, so it runs
//! on the blocking thread pool with a cloned file handle; the source itself
//! keeps ownership of the node.

use std::io::Read;

use devboard_core::{Error, INPUT_EVENT_SIZE, RawInputEvent, Result};
use tracing::warn;

use super::source::KeyEventSource;
use crate::node::{DeviceNode, OpenMode};

/// Key event source reading from a real input-event device node.
#[derive(Debug)]
pub struct EvdevSource {
    node: DeviceNode,
}

impl EvdevSource {
    /// Open `/dev/<name>` read-only.
    ///
    /// # Errors
    ///
    /// Returns `DevOpen` if the node cannot be opened.
    pub fn open(name: impl Into<String>) -> Result<Self> {
        let mut node = DeviceNode::new(name);
        node.open(OpenMode::ReadOnly)?;
        Ok(Self { node })
    }

    /// Open an explicit path read-only (test rigs).
    ///
    /// # Errors
    ///
    /// Returns `DevOpen` if the path cannot be opened.
    pub fn open_path(
        name: impl Into<String>,
        path: impl Into<std::path::PathBuf>,
    ) -> Result<Self> {
        let mut node = DeviceNode::with_path(name, path);
        node.open(OpenMode::ReadOnly)?;
        Ok(Self { node })
    }
}

impl KeyEventSource for EvdevSource {
    async fn read_event(&mut self) -> Result<RawInputEvent> {
        let file = self.node.try_clone_file()?;
        let name = self.node.name().to_string();

        let task = tokio::task::spawn_blocking(move || {
            let mut reader = &file;
            loop {
                let mut buf = [0u8; INPUT_EVENT_SIZE];
                match reader.read(&mut buf) {
                    Ok(0) => {
                        return Err(Error::dev_io(name, "end of event stream"));
                    }
                    Ok(n) if n != INPUT_EVENT_SIZE => {
                        // Not fatal: evdev delivers whole records, anything
                        // else is noise worth logging and skipping.
                        warn!(device = %name, expected = INPUT_EVENT_SIZE, got = n, "read size mismatch");
                        continue;
                    }
                    Ok(_) => return RawInputEvent::from_bytes(&buf),
                    Err(e) => {
                        return Err(Error::dev_io(name, format!("read failed: {e}")));
                    }
                }
            }
        });

        task.await.map_err(|e| {
            Error::dev_io(
                self.node.name().to_string(),
                format!("reader task failed: {e}"),
            )
        })?
    }

    fn device_name(&self) -> &str {
        self.node.name()
    }
}
