//! Timer slots shared by the debounce and throttle sessions.

use std::time::Duration;
use tokio::task::JoinHandle;

/// A scheduled callback tagged with the id it was armed under.
///
/// A fired timer re-checks its id against the owning session before it
/// acts, so a timer that lost a race with `cancel()` or a re-arm never
/// delivers.
#[derive(Debug)]
pub(crate) struct TimerSlot {
    pub(crate) id: u64,
    handle: JoinHandle<()>,
}

impl TimerSlot {
    /// Spawns `on_fire` on the Tokio runtime after `after` has elapsed.
    pub(crate) fn arm<F>(id: u64, after: Duration, on_fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            on_fire();
        });
        Self { id, handle }
    }

    /// Aborts the scheduled callback.
    pub(crate) fn cancel(self) {
        self.handle.abort();
    }
}
