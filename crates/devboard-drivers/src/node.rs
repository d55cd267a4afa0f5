//! Owned device-node handle.
//!
//! Every driver in this crate owns exactly one OS handle to its device
//! node. `DeviceNode` centralizes the open/close/ownership rules so the
//! drivers only carry their decode logic: open-on-init (idempotent),
//! close-on-drop, non-duplicable, transferable by move.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use devboard_core::{Error, Result, device_path};
use tracing::{debug, warn};

/// How the device node is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Open read-only (key, DHT11).
    ReadOnly,

    /// Open read-write (LED, AP3216C).
    ReadWrite,
}

/// One owned handle to a device node under `/dev`.
///
/// The handle starts closed; [`open`](Self::open) transitions it to open
/// exactly once (a second call is a warn-and-succeed no-op). Dropping the
/// node closes the file. Moving the node transfers the open handle; Rust's
/// ownership rules make the moved-from binding unusable, so there is never
/// more than one live handle per node.
#[derive(Debug)]
pub struct DeviceNode {
    /// Logical device name, e.g. `led0` or `input/event2`.
    name: String,

    /// Node path, always derived as `/dev/<name>` by the canonical
    /// constructor.
    path: PathBuf,

    /// Open OS handle, `None` until a successful `open()`.
    file: Option<File>,
}

impl DeviceNode {
    /// Create a closed handle for `/dev/<name>`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let path = device_path(&name);
        Self {
            name,
            path,
            file: None,
        }
    }

    /// Create a closed handle with an explicit path.
    ///
    /// Intended for bench rigs and tests that point a driver at a regular
    /// file instead of a device node. Production callers use
    /// [`new`](Self::new), which derives the canonical `/dev/<name>` path.
    pub fn with_path(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            file: None,
        }
    }

    /// Open the device node.
    ///
    /// A second call on an already-open node warns and returns `Ok` without
    /// touching the existing handle.
    ///
    /// # Errors
    ///
    /// Returns `DevOpen` if the node cannot be opened (missing node,
    /// permission denied).
    pub fn open(&mut self, mode: OpenMode) -> Result<()> {
        if self.file.is_some() {
            warn!(device = %self.name, "device already initialized");
            return Ok(());
        }

        let mut options = OpenOptions::new();
        options.read(true);
        if mode == OpenMode::ReadWrite {
            options.write(true);
        }

        let file = options
            .open(&self.path)
            .map_err(|e| Error::dev_open(self.path.display().to_string(), e))?;

        debug!(device = %self.name, path = %self.path.display(), "device node opened");
        self.file = Some(file);
        Ok(())
    }

    /// Whether the node is currently open.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Logical device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Device node path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borrow the open file.
    ///
    /// # Errors
    ///
    /// Returns `DevNotReady` if the node has not been opened.
    pub fn file(&self) -> Result<&File> {
        self.file
            .as_ref()
            .ok_or_else(|| Error::not_ready(self.name.clone()))
    }

    /// Clone the open file handle (shares the underlying descriptor).
    ///
    /// Used by the key driver to hand a read handle to a blocking reader
    /// without giving up ownership of the node.
    ///
    /// # Errors
    ///
    /// Returns `DevNotReady` if the node has not been opened, `DevIo` if
    /// the OS refuses to duplicate the descriptor.
    pub fn try_clone_file(&self) -> Result<File> {
        let file = self.file()?;
        file.try_clone()
            .map_err(|e| Error::dev_io(self.name.clone(), format!("descriptor clone failed: {e}")))
    }

    /// Close the node. Idempotent.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            debug!(device = %self.name, "device node closed");
        }
    }
}
