//! Character-device drivers for the devboard board-support layer.
//!
//! Each peripheral is exposed through one driver type owning exactly one
//! open device node:
//!
//! - [`Led`]: on/off control via custom ioctls, synchronous.
//! - [`Ap3216c`]: ambient-light/proximity sensor, synchronous reads.
//! - [`Dht11`]: temperature/humidity sensor, synchronous reads.
//! - [`key::Key`]: GPIO key input with a background event loop that
//!   classifies raw input-event records into press/release/long-press
//!   events and delivers them to a single registered callback.
//!
//! # Device handles
//!
//! All drivers share the [`DeviceNode`] abstraction: the node is opened by
//! `init()`, closed on drop, never duplicated, and transferable by move.
//! A driver value that has not been initialized reports `is_ready() ==
//! false` and fails its operations with `DevNotReady`.
//!
//! # Synchronous vs. background drivers
//!
//! LED and the two sensors are plain blocking open/read/ioctl wrappers with
//! no background activity. Only the key driver owns a task: `start()` spawns
//! a single tokio task per [`key::Key`] instance, and `stop()` joins it.
//!
//! # Errors
//!
//! Every operation returns [`devboard_core::Result`]; failures are never
//! retried here. See `devboard-core` for the closed error taxonomy.

pub mod ap3216c;
pub mod dht11;
pub mod key;
pub mod led;
pub mod node;

// Re-export commonly used types for convenience
pub use ap3216c::Ap3216c;
pub use dht11::Dht11;
pub use key::{AnyKeySource, Key, KeyCallback, KeyConfig, MockKeyHandle, MockKeySource};
pub use led::Led;
pub use node::{DeviceNode, OpenMode};
