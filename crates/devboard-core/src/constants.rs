//! Device naming conventions and driver tunables.
//!
//! All drivers address their peripheral through a device node under
//! [`DEV_ROOT`]; the node path is always derived from the logical device
//! name with [`device_path`], never stored independently.

use std::path::PathBuf;

// ============================================================================
// Device nodes
// ============================================================================

/// Root directory for device nodes.
pub const DEV_ROOT: &str = "/dev";

/// Default LED device name (node `/dev/led0`).
pub const DEFAULT_LED_DEVICE: &str = "led0";

/// Default key input-event device name (node `/dev/input/event2`).
pub const DEFAULT_KEY_DEVICE: &str = "input/event2";

/// Default AP3216C sensor device name (node `/dev/ap3216c`).
pub const DEFAULT_AP3216C_DEVICE: &str = "ap3216c";

/// Default DHT11 sensor device name (node `/dev/dht11`).
pub const DEFAULT_DHT11_DEVICE: &str = "dht11";

/// Derive the device node path for a logical device name.
///
/// The path is exactly `/dev/<name>`; names may contain subdirectories
/// (e.g. `input/event2`). Plain concatenation, so even a leading slash in
/// `name` cannot escape the `/dev` prefix.
///
/// # Examples
///
/// ```
/// use devboard_core::constants::device_path;
///
/// assert_eq!(device_path("led0").to_str(), Some("/dev/led0"));
/// assert_eq!(device_path("input/event2").to_str(), Some("/dev/input/event2"));
/// ```
pub fn device_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{DEV_ROOT}/{name}"))
}

// ============================================================================
// Key driver
// ============================================================================

/// A key held down at least this long before release is a long press.
pub const LONG_PRESS_THRESHOLD_MS: u64 = 500;
