//! Mock key event source for testing and development.
//!
//! Simulates an input-event device: raw records are injected through a
//! channel handle instead of being delivered by the kernel, so the event
//! loop and classification can be exercised without hardware.

use devboard_core::{EV_KEY, Error, KEY_VALUE_PRESS, KEY_VALUE_RELEASE, RawInputEvent, Result};
use tokio::sync::mpsc;

use super::source::KeyEventSource;

/// Mock key device fed through a [`MockKeyHandle`].
///
/// # Examples
///
/// ```
/// use devboard_drivers::key::{KeyEventSource, MockKeySource};
///
/// #[tokio::main]
/// async fn main() -> devboard_core::Result<()> {
///     let (mut source, handle) = MockKeySource::new();
///
///     handle.press(30).await?;
///     handle.release(30).await?;
///
///     let press = source.read_event().await?;
///     let release = source.read_event().await?;
///
///     assert_eq!(press.value, 1);
///     assert_eq!(release.value, 0);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeySource {
    /// Channel receiver for simulated records.
    event_rx: mpsc::Receiver<RawInputEvent>,

    /// Device name.
    name: String,
}

impl MockKeySource {
    /// Create a mock source with the default name.
    ///
    /// Returns the source and the handle used to inject records.
    pub fn new() -> (Self, MockKeyHandle) {
        Self::with_name("mock/key".to_string())
    }

    /// Create a mock source with a custom name.
    pub fn with_name(name: String) -> (Self, MockKeyHandle) {
        let (event_tx, event_rx) = mpsc::channel(32);

        let source = Self {
            event_rx,
            name: name.clone(),
        };

        let handle = MockKeyHandle { event_tx, name };

        (source, handle)
    }
}

impl KeyEventSource for MockKeySource {
    async fn read_event(&mut self) -> Result<RawInputEvent> {
        self.event_rx
            .recv()
            .await
            .ok_or_else(|| Error::dev_io(self.name.clone(), "event channel closed"))
    }

    fn device_name(&self) -> &str {
        &self.name
    }
}

/// Handle for injecting records into a [`MockKeySource`].
///
/// Can be cloned and shared across tasks; dropping every clone closes the
/// stream, which the source reports as a `DevIo` read failure (the same
/// way a vanished device node would).
#[derive(Debug, Clone)]
pub struct MockKeyHandle {
    /// Channel sender for simulated records.
    event_tx: mpsc::Sender<RawInputEvent>,

    /// Device name.
    name: String,
}

impl MockKeyHandle {
    /// Inject one raw record.
    ///
    /// # Errors
    ///
    /// Returns `DevIo` if the source has been dropped.
    pub async fn send_raw(&self, event: RawInputEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| Error::dev_io(self.name.clone(), "event channel closed"))
    }

    /// Inject a key-press record for `code`.
    ///
    /// # Errors
    ///
    /// Returns `DevIo` if the source has been dropped.
    pub async fn press(&self, code: u16) -> Result<()> {
        self.send_raw(key_record(code, KEY_VALUE_PRESS)).await
    }

    /// Inject a key-release record for `code`.
    ///
    /// # Errors
    ///
    /// Returns `DevIo` if the source has been dropped.
    pub async fn release(&self, code: u16) -> Result<()> {
        self.send_raw(key_record(code, KEY_VALUE_RELEASE)).await
    }

    /// Inject a non-key record (e.g. a sync marker), useful for ticking
    /// the event loop without producing a classified event.
    ///
    /// # Errors
    ///
    /// Returns `DevIo` if the source has been dropped.
    pub async fn send_non_key(&self) -> Result<()> {
        self.send_raw(RawInputEvent {
            time_sec: 0,
            time_usec: 0,
            event_type: 0x00, // EV_SYN
            code: 0,
            value: 0,
        })
        .await
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn key_record(code: u16, value: i32) -> RawInputEvent {
    RawInputEvent {
        time_sec: 0,
        time_usec: 0,
        event_type: EV_KEY,
        code,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_source_sequence() {
        let (mut source, handle) = MockKeySource::new();

        tokio::spawn(async move {
            handle.press(30).await.unwrap();
            handle.release(30).await.unwrap();
        });

        let press = source.read_event().await.unwrap();
        let release = source.read_event().await.unwrap();

        assert_eq!((press.code, press.value), (30, 1));
        assert_eq!((release.code, release.value), (30, 0));
        assert!(press.is_key_event());
    }

    #[tokio::test]
    async fn test_mock_source_non_key_record() {
        let (mut source, handle) = MockKeySource::new();

        handle.send_non_key().await.unwrap();

        let event = source.read_event().await.unwrap();
        assert!(!event.is_key_event());
    }

    #[tokio::test]
    async fn test_mock_source_closed_channel() {
        let (mut source, handle) = MockKeySource::new();

        drop(handle);

        let result = source.read_event().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_handle_clone() {
        let (mut source, handle) = MockKeySource::new();
        let handle_clone = handle.clone();

        handle.press(30).await.unwrap();
        handle_clone.press(31).await.unwrap();

        let first = source.read_event().await.unwrap();
        let second = source.read_event().await.unwrap();
        assert_eq!(first.code, 30);
        assert_eq!(second.code, 31);
    }

    #[tokio::test]
    async fn test_mock_source_custom_name() {
        let (source, handle) = MockKeySource::with_name("bench/key".to_string());
        assert_eq!(source.device_name(), "bench/key");
        assert_eq!(handle.name(), "bench/key");
    }
}
