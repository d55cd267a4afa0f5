//! Press/release/long-press classification.
//!
//! The classifier is a pure state machine: it consumes the `(code, value)`
//! pair of one key record together with the current monotonic time and
//! yields at most one classified [`KeyEvent`]. All timing decisions happen
//! here, which keeps the surrounding event loop free of logic and the
//! timing behavior unit-testable with explicit instants.

use std::time::Duration;

use devboard_core::constants::LONG_PRESS_THRESHOLD_MS;
use devboard_core::{KEY_VALUE_PRESS, KEY_VALUE_RELEASE, KeyEvent};
use tokio::time::Instant;

/// Tunables for key classification.
#[derive(Debug, Clone)]
pub struct KeyConfig {
    /// A key held at least this long before release is a long press.
    pub long_press_threshold: Duration,

    /// Latch the long-press report for the rest of the press cycle.
    ///
    /// With latching off (the default) the reported flag stays clear
    /// after a long press fires, so a duplicate release record for the
    /// same code re-fires the long-press event. Set to `true` to report
    /// at most one event per press cycle.
    pub latch_long_press: bool,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            long_press_threshold: Duration::from_millis(LONG_PRESS_THRESHOLD_MS),
            latch_long_press: false,
        }
    }
}

/// Debounce/long-press state for one key device.
#[derive(Debug)]
pub struct KeyClassifier {
    config: KeyConfig,

    /// Code of the last key seen pressed, `None` before the first press.
    last_code: Option<u16>,

    /// Monotonic time of the last press.
    last_press_at: Option<Instant>,

    /// Whether a long press was already reported for the current cycle.
    /// Only ever set when `latch_long_press` is enabled.
    long_press_reported: bool,
}

impl KeyClassifier {
    /// Create a classifier in its initial state.
    pub fn new(config: KeyConfig) -> Self {
        Self {
            config,
            last_code: None,
            last_press_at: None,
            long_press_reported: false,
        }
    }

    /// Classify one key record.
    ///
    /// - value 1 (press): records the code and timestamp, resets the
    ///   long-press flag, yields `Pressed`.
    /// - value 0 (release) matching the last pressed code: yields
    ///   `LongPressed` when held at least the threshold, otherwise
    ///   `Released`.
    /// - anything else (autorepeat, releases of other codes): `None`.
    pub fn classify(&mut self, code: u16, value: i32, now: Instant) -> Option<KeyEvent> {
        match value {
            KEY_VALUE_PRESS => {
                self.last_code = Some(code);
                self.last_press_at = Some(now);
                self.long_press_reported = false;
                Some(KeyEvent::Pressed)
            }
            KEY_VALUE_RELEASE => {
                if self.last_code != Some(code) {
                    return None;
                }
                let pressed_at = self.last_press_at?;

                let held = now.saturating_duration_since(pressed_at);
                if held >= self.config.long_press_threshold && !self.long_press_reported {
                    if self.config.latch_long_press {
                        self.long_press_reported = true;
                    }
                    Some(KeyEvent::LongPressed)
                } else if !self.long_press_reported {
                    Some(KeyEvent::Released)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_press_is_reported() {
        let mut classifier = KeyClassifier::new(KeyConfig::default());
        let t0 = Instant::now();
        assert_eq!(classifier.classify(30, 1, t0), Some(KeyEvent::Pressed));
    }

    #[test]
    fn test_short_press_release_is_released() {
        let mut classifier = KeyClassifier::new(KeyConfig::default());
        let t0 = Instant::now();
        classifier.classify(30, 1, t0);
        assert_eq!(
            classifier.classify(30, 0, t0 + ms(100)),
            Some(KeyEvent::Released)
        );
    }

    #[test]
    fn test_release_at_threshold_is_long_press() {
        let mut classifier = KeyClassifier::new(KeyConfig::default());
        let t0 = Instant::now();
        classifier.classify(30, 1, t0);
        assert_eq!(
            classifier.classify(30, 0, t0 + ms(500)),
            Some(KeyEvent::LongPressed)
        );
    }

    #[test]
    fn test_release_of_other_code_is_ignored() {
        let mut classifier = KeyClassifier::new(KeyConfig::default());
        let t0 = Instant::now();
        classifier.classify(30, 1, t0);
        assert_eq!(classifier.classify(31, 0, t0 + ms(10)), None);
    }

    #[test]
    fn test_autorepeat_is_ignored() {
        let mut classifier = KeyClassifier::new(KeyConfig::default());
        let t0 = Instant::now();
        classifier.classify(30, 1, t0);
        assert_eq!(classifier.classify(30, 2, t0 + ms(250)), None);
    }

    #[test]
    fn test_release_before_any_press_is_ignored() {
        let mut classifier = KeyClassifier::new(KeyConfig::default());
        assert_eq!(classifier.classify(30, 0, Instant::now()), None);
    }

    #[test]
    fn test_duplicate_release_refires_long_press_without_latch() {
        // Without latching the reported flag is never set after a long
        // press fires, so a duplicate release re-fires the event.
        let mut classifier = KeyClassifier::new(KeyConfig::default());
        let t0 = Instant::now();
        classifier.classify(30, 1, t0);
        assert_eq!(
            classifier.classify(30, 0, t0 + ms(600)),
            Some(KeyEvent::LongPressed)
        );
        assert_eq!(
            classifier.classify(30, 0, t0 + ms(700)),
            Some(KeyEvent::LongPressed)
        );
    }

    #[test]
    fn test_duplicate_release_is_swallowed_with_latch() {
        let mut classifier = KeyClassifier::new(KeyConfig {
            latch_long_press: true,
            ..KeyConfig::default()
        });
        let t0 = Instant::now();
        classifier.classify(30, 1, t0);
        assert_eq!(
            classifier.classify(30, 0, t0 + ms(600)),
            Some(KeyEvent::LongPressed)
        );
        assert_eq!(classifier.classify(30, 0, t0 + ms(700)), None);
    }

    #[test]
    fn test_new_press_resets_latched_flag() {
        let mut classifier = KeyClassifier::new(KeyConfig {
            latch_long_press: true,
            ..KeyConfig::default()
        });
        let t0 = Instant::now();
        classifier.classify(30, 1, t0);
        classifier.classify(30, 0, t0 + ms(600));

        let t1 = t0 + ms(1000);
        assert_eq!(classifier.classify(30, 1, t1), Some(KeyEvent::Pressed));
        assert_eq!(
            classifier.classify(30, 0, t1 + ms(50)),
            Some(KeyEvent::Released)
        );
    }
}
