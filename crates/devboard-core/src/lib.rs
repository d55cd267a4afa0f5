//! Core types for the devboard board-support layer.
//!
//! This crate holds everything the driver and CLI crates share: the closed
//! error taxonomy returned by every driver operation, the data structures
//! produced by the sensor drivers, the classified key-event type, and the
//! device-path conventions.
//!
//! The drivers themselves live in `devboard-drivers`; this crate has no I/O.

pub mod constants;
pub mod error;
pub mod types;

pub use constants::device_path;
pub use error::{Error, ErrorKind, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
