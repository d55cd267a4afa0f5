//! Data types shared across the driver implementations.
//!
//! Sensor drivers return these structs by value inside `Result`, so a failed
//! read can never leave a partially-filled struct in the caller's hands.

use serde::{Deserialize, Serialize};

// ============================================================================
// AP3216C ambient light / proximity sensor
// ============================================================================

/// One AP3216C reading: three unsigned 16-bit channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ap3216cData {
    /// Infrared channel.
    pub ir: u16,

    /// Ambient light channel.
    pub als: u16,

    /// Proximity channel.
    pub ps: u16,
}

// ============================================================================
// DHT11 temperature / humidity sensor
// ============================================================================

/// One DHT11 reading: four unsigned 8-bit fields.
///
/// The sensor reports humidity and temperature as integer/fractional byte
/// pairs; [`humidity`](Self::humidity) and [`temperature`](Self::temperature)
/// combine them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dht11Data {
    /// Relative humidity, integer part (%RH).
    pub humidity_int: u8,

    /// Relative humidity, fractional part.
    pub humidity_frac: u8,

    /// Temperature, integer part (°C).
    pub temperature_int: u8,

    /// Temperature, fractional part.
    pub temperature_frac: u8,
}

impl Dht11Data {
    /// Relative humidity in %RH.
    pub fn humidity(&self) -> f32 {
        self.humidity_int as f32 + self.humidity_frac as f32 / 10.0
    }

    /// Temperature in °C.
    pub fn temperature(&self) -> f32 {
        self.temperature_int as f32 + self.temperature_frac as f32 / 10.0
    }
}

// ============================================================================
// Key events
// ============================================================================

/// Classified key event delivered to the registered callback.
///
/// The discriminants mirror the raw `value` field of a Linux key
/// input-event record (0 = release, 1 = press), extended with 2 for a
/// long press detected at release time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum KeyEvent {
    /// Key released before the long-press threshold.
    Released = 0,

    /// Key pressed down.
    Pressed = 1,

    /// Key held at least the long-press threshold before release.
    LongPressed = 2,
}

impl std::fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Released => write!(f, "released"),
            Self::Pressed => write!(f, "pressed"),
            Self::LongPressed => write!(f, "long-pressed"),
        }
    }
}

/// Key event class in a raw input-event record (`EV_KEY` in
/// `linux/input-event-codes.h`).
pub const EV_KEY: u16 = 0x01;

/// Raw `value` of a key-press record.
pub const KEY_VALUE_PRESS: i32 = 1;

/// Raw `value` of a key-release record.
pub const KEY_VALUE_RELEASE: i32 = 0;

/// Byte size of one `struct input_event` record on 64-bit Linux
/// (two 64-bit time fields, type, code, value).
pub const INPUT_EVENT_SIZE: usize = 24;

/// One raw Linux input-event record as read from an evdev node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputEvent {
    /// Timestamp seconds (kernel-supplied, unused by classification).
    pub time_sec: i64,

    /// Timestamp microseconds.
    pub time_usec: i64,

    /// Event class (`EV_KEY`, `EV_SYN`, ...).
    pub event_type: u16,

    /// Key code within the class.
    pub code: u16,

    /// Event value: 0 release, 1 press, 2 autorepeat.
    pub value: i32,
}

impl RawInputEvent {
    /// Decode one record from exactly [`INPUT_EVENT_SIZE`] bytes in native
    /// byte order (the kernel writes records in host endianness).
    ///
    /// # Errors
    ///
    /// Returns `InvalidParam` if the slice is not exactly one record long.
    pub fn from_bytes(buf: &[u8]) -> crate::Result<Self> {
        if buf.len() != INPUT_EVENT_SIZE {
            return Err(crate::Error::invalid_param(format!(
                "input event record must be {} bytes, got {}",
                INPUT_EVENT_SIZE,
                buf.len()
            )));
        }

        Ok(Self {
            time_sec: i64::from_ne_bytes(buf[0..8].try_into().expect("slice length checked")),
            time_usec: i64::from_ne_bytes(buf[8..16].try_into().expect("slice length checked")),
            event_type: u16::from_ne_bytes(buf[16..18].try_into().expect("slice length checked")),
            code: u16::from_ne_bytes(buf[18..20].try_into().expect("slice length checked")),
            value: i32::from_ne_bytes(buf[20..24].try_into().expect("slice length checked")),
        })
    }

    /// Whether this record belongs to the key event class.
    pub fn is_key_event(&self) -> bool {
        self.event_type == EV_KEY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(event: &RawInputEvent) -> Vec<u8> {
        let mut buf = Vec::with_capacity(INPUT_EVENT_SIZE);
        buf.extend_from_slice(&event.time_sec.to_ne_bytes());
        buf.extend_from_slice(&event.time_usec.to_ne_bytes());
        buf.extend_from_slice(&event.event_type.to_ne_bytes());
        buf.extend_from_slice(&event.code.to_ne_bytes());
        buf.extend_from_slice(&event.value.to_ne_bytes());
        buf
    }

    #[test]
    fn test_dht11_combined_values() {
        let data = Dht11Data {
            humidity_int: 45,
            humidity_frac: 2,
            temperature_int: 23,
            temperature_frac: 7,
        };
        assert!((data.humidity() - 45.2).abs() < 1e-5);
        assert!((data.temperature() - 23.7).abs() < 1e-5);
    }

    #[test]
    fn test_key_event_discriminants() {
        assert_eq!(KeyEvent::Released as u8, 0);
        assert_eq!(KeyEvent::Pressed as u8, 1);
        assert_eq!(KeyEvent::LongPressed as u8, 2);
    }

    #[test]
    fn test_ev_key_constant() {
        // EV_KEY is 0x01 in linux/input-event-codes.h
        assert_eq!(EV_KEY, 0x01);
    }

    #[test]
    fn test_raw_event_decode() {
        let original = RawInputEvent {
            time_sec: 1_700_000_000,
            time_usec: 123_456,
            event_type: EV_KEY,
            code: 30,
            value: KEY_VALUE_PRESS,
        };

        let decoded = RawInputEvent::from_bytes(&encode(&original)).unwrap();
        assert_eq!(decoded, original);
        assert!(decoded.is_key_event());
    }

    #[test]
    fn test_raw_event_decode_wrong_size() {
        let result = RawInputEvent::from_bytes(&[0u8; 16]);
        assert!(result.is_err());
    }

    #[test]
    fn test_raw_event_non_key_class() {
        let event = RawInputEvent {
            time_sec: 0,
            time_usec: 0,
            event_type: 0x00, // EV_SYN
            code: 0,
            value: 0,
        };
        assert!(!event.is_key_event());
    }

    #[test]
    fn test_sensor_data_serialization() {
        let data = Ap3216cData {
            ir: 10,
            als: 200,
            ps: 3000,
        };
        let json = serde_json::to_string(&data).unwrap();
        let back: Ap3216cData = serde_json::from_str(&json).unwrap();
        assert_eq!(data, back);
    }
}
