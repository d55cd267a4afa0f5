//! Key event source abstraction.
//!
//! The event loop consumes raw input-event records through the
//! [`KeyEventSource`] trait, which lets tests substitute a channel-backed
//! mock for the real evdev node.
//!
//! Native `async fn` in traits (Edition 2024 RPITIT) is not object-safe,
//! so dispatch goes through the [`AnyKeySource`] enum wrapper instead of
//! `Box<dyn KeyEventSource>`.

#![allow(async_fn_in_trait)]

use devboard_core::{RawInputEvent, Result};

use super::evdev::EvdevSource;
use super::mock::MockKeySource;

/// Source of raw input-event records for one key device.
pub trait KeyEventSource: Send {
    /// Read the next raw record.
    ///
    /// Blocks asynchronously until a record is available.
    ///
    /// # Errors
    ///
    /// Returns `DevIo` when the underlying stream fails or ends.
    async fn read_event(&mut self) -> Result<RawInputEvent>;

    /// Logical device name.
    fn device_name(&self) -> &str;
}

/// Enum wrapper for key event source dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyKeySource {
    /// Real evdev device node.
    Evdev(EvdevSource),

    /// Channel-backed mock for development and testing.
    Mock(MockKeySource),
}

impl KeyEventSource for AnyKeySource {
    async fn read_event(&mut self) -> Result<RawInputEvent> {
        match self {
            Self::Evdev(source) => source.read_event().await,
            Self::Mock(source) => source.read_event().await,
        }
    }

    fn device_name(&self) -> &str {
        match self {
            Self::Evdev(source) => source.device_name(),
            Self::Mock(source) => source.device_name(),
        }
    }
}
