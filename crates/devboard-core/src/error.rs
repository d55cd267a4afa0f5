//! Error types for driver operations.
//!
//! Every driver operation resolves to one of a small closed set of outcomes.
//! The set is deliberately flat: drivers never retry internally and never
//! panic on device failure; each error is returned to the immediate caller,
//! who decides whether to log, abort, or retry.

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The closed set of failure kinds a driver operation can produce.
///
/// `kind()` on [`Error`] maps every variant into this set, which is what the
/// CLI and logs key off. The display phrase for each kind is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid argument (empty device name, out-of-range value).
    InvalidParam,

    /// Device node could not be opened (missing node, permission denied).
    DevOpen,

    /// Device read/write/ioctl failed.
    DevIo,

    /// Device not initialized or not ready for the requested operation.
    DevNotReady,

    /// Memory allocation failed. Kept for taxonomy completeness; no driver
    /// constructs it in practice.
    MemAlloc,

    /// Operation not supported by the device. Kept for taxonomy
    /// completeness; no driver constructs it in practice.
    Unsupported,
}

impl ErrorKind {
    /// Fixed human-readable phrase for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidParam => "Invalid parameter",
            Self::DevOpen => "Device open failed",
            Self::DevIo => "Device I/O failed",
            Self::DevNotReady => "Device not ready",
            Self::MemAlloc => "Memory allocation failed",
            Self::Unsupported => "Unsupported operation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during driver operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An argument failed validation before touching the device.
    #[error("Invalid parameter: {message}")]
    InvalidParam { message: String },

    /// Opening the device node failed.
    #[error("Device open failed: {path}: {source}")]
    DevOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A read, write, or ioctl on the device failed.
    #[error("Device I/O failed: {device}: {message}")]
    DevIo { device: String, message: String },

    /// The device was used before a successful `init()`.
    #[error("Device not ready: {device}")]
    DevNotReady { device: String },

    /// Memory allocation failed.
    #[error("Memory allocation failed")]
    MemAlloc,

    /// The device does not support the requested operation.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },
}

impl Error {
    /// Create a new invalid parameter error.
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidParam {
            message: message.into(),
        }
    }

    /// Create a new device open error.
    pub fn dev_open(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::DevOpen {
            path: path.into(),
            source,
        }
    }

    /// Create a new device I/O error.
    pub fn dev_io(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DevIo {
            device: device.into(),
            message: message.into(),
        }
    }

    /// Create a new device-not-ready error.
    pub fn not_ready(device: impl Into<String>) -> Self {
        Self::DevNotReady {
            device: device.into(),
        }
    }

    /// Create a new unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Which of the closed failure kinds this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParam { .. } => ErrorKind::InvalidParam,
            Self::DevOpen { .. } => ErrorKind::DevOpen,
            Self::DevIo { .. } => ErrorKind::DevIo,
            Self::DevNotReady { .. } => ErrorKind::DevNotReady,
            Self::MemAlloc => ErrorKind::MemAlloc,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_param_error() {
        let error = Error::invalid_param("empty device name");
        assert_eq!(error.kind(), ErrorKind::InvalidParam);
        assert_eq!(error.to_string(), "Invalid parameter: empty device name");
    }

    #[test]
    fn test_dev_open_error() {
        let io = std::io::Error::from(std::io::ErrorKind::NotFound);
        let error = Error::dev_open("/dev/led0", io);
        assert_eq!(error.kind(), ErrorKind::DevOpen);
        assert!(error.to_string().starts_with("Device open failed: /dev/led0"));
    }

    #[test]
    fn test_dev_io_error() {
        let error = Error::dev_io("ap3216c", "read size mismatch");
        assert_eq!(error.kind(), ErrorKind::DevIo);
        assert_eq!(
            error.to_string(),
            "Device I/O failed: ap3216c: read size mismatch"
        );
    }

    #[test]
    fn test_not_ready_error() {
        let error = Error::not_ready("led0");
        assert_eq!(error.kind(), ErrorKind::DevNotReady);
        assert_eq!(error.to_string(), "Device not ready: led0");
    }

    #[test]
    fn test_kind_phrases_are_fixed() {
        assert_eq!(ErrorKind::InvalidParam.as_str(), "Invalid parameter");
        assert_eq!(ErrorKind::DevOpen.as_str(), "Device open failed");
        assert_eq!(ErrorKind::DevIo.as_str(), "Device I/O failed");
        assert_eq!(ErrorKind::DevNotReady.as_str(), "Device not ready");
        assert_eq!(ErrorKind::MemAlloc.as_str(), "Memory allocation failed");
        assert_eq!(ErrorKind::Unsupported.as_str(), "Unsupported operation");
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            Error::invalid_param("bad"),
            Error::dev_io("dht11", "short read"),
            Error::unsupported("resolution change"),
        ];

        for error in errors {
            let _ = format!("{}", error);
            let _ = format!("{:?}", error);
        }
    }
}
