//! Configuration types for debouncing and throttling.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Edge and ceiling configuration for a [`Debouncer`](super::Debouncer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceOptions {
    /// Fire on the first call of a burst.
    #[serde(default)]
    pub leading: bool,
    /// Fire with the last arguments once the burst goes quiet.
    #[serde(default = "default_true")]
    pub trailing: bool,
    /// Upper bound between deliveries under continuous invocation.
    #[serde(default)]
    pub max_wait_ms: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl Default for DebounceOptions {
    fn default() -> Self {
        Self {
            leading: false,
            trailing: default_true(),
            max_wait_ms: None,
        }
    }
}

impl DebounceOptions {
    /// Creates options with the default edges (trailing only, no ceiling).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets leading-edge firing.
    #[must_use]
    pub fn with_leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    /// Sets trailing-edge firing.
    #[must_use]
    pub fn with_trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }

    /// Sets the max-wait ceiling.
    #[must_use]
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait_ms = Some(u64::try_from(max_wait.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Gets the max-wait ceiling as a Duration.
    #[must_use]
    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait_ms.map(Duration::from_millis)
    }
}

/// Edge configuration for a [`Throttle`](super::Throttle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleOptions {
    /// Emit the first value of a window immediately.
    #[serde(default = "default_true")]
    pub leading: bool,
    /// Emit the last value seen in a window once it elapses.
    #[serde(default = "default_true")]
    pub trailing: bool,
}

impl Default for ThrottleOptions {
    fn default() -> Self {
        Self {
            leading: true,
            trailing: true,
        }
    }
}

impl ThrottleOptions {
    /// Creates options with both edges enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets leading-edge emission.
    #[must_use]
    pub fn with_leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    /// Sets trailing-edge emission.
    #[must_use]
    pub fn with_trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }
}

/// Converts a signed millisecond count into a delay, clamping negatives to zero.
#[must_use]
pub fn delay_from_ms(ms: i64) -> Duration {
    Duration::from_millis(u64::try_from(ms).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_defaults() {
        let options = DebounceOptions::default();
        assert!(!options.leading);
        assert!(options.trailing);
        assert!(options.max_wait().is_none());
    }

    #[test]
    fn test_debounce_deserialize_partial() {
        let options: DebounceOptions =
            serde_json::from_str(r#"{"leading": true, "max_wait_ms": 500}"#).unwrap();
        assert!(options.leading);
        assert!(options.trailing);
        assert_eq!(options.max_wait(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_throttle_defaults() {
        let options = ThrottleOptions::new().with_trailing(false);
        assert!(options.leading);
        assert!(!options.trailing);
    }

    #[test]
    fn test_delay_from_ms_clamps_negative() {
        assert_eq!(delay_from_ms(-25), Duration::ZERO);
        assert_eq!(delay_from_ms(0), Duration::ZERO);
        assert_eq!(delay_from_ms(250), Duration::from_millis(250));
    }
}
