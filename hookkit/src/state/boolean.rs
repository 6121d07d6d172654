//! An observable boolean flag.

use tokio::sync::watch;

/// A boolean with convenience setters.
#[derive(Debug)]
pub struct BooleanState {
    value: watch::Sender<bool>,
}

impl BooleanState {
    /// Creates the flag with an initial value.
    #[must_use]
    pub fn new(initial: bool) -> Self {
        Self {
            value: watch::Sender::new(initial),
        }
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> bool {
        *self.value.borrow()
    }

    /// Sets the value; subscribers are notified only on change.
    pub fn set(&self, value: bool) {
        self.value.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }

    /// Sets the value to `true`.
    pub fn set_true(&self) {
        self.set(true);
    }

    /// Sets the value to `false`.
    pub fn set_false(&self) {
        self.set(false);
    }

    /// Flips the value and returns the new one.
    pub fn toggle(&self) -> bool {
        let mut next = false;
        self.value.send_modify(|current| {
            *current = !*current;
            next = *current;
        });
        next
    }

    /// Subscribes to changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.value.subscribe()
    }
}

impl Default for BooleanState {
    fn default() -> Self {
        Self::new(false)
    }
}
