//! Tracks the value from the previous update.

use parking_lot::Mutex;

/// Remembers the last value it was updated with.
#[derive(Debug, Default)]
pub struct PreviousValue<T> {
    last: Mutex<Option<T>>,
}

impl<T: Clone> PreviousValue<T> {
    /// Creates a tracker with no history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }

    /// Records `value` and returns the value recorded before it.
    pub fn update(&self, value: T) -> Option<T> {
        self.last.lock().replace(value)
    }

    /// Returns the most recently recorded value.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.last.lock().clone()
    }

    /// Forgets the recorded value.
    pub fn reset(&self) {
        self.last.lock().take();
    }
}
