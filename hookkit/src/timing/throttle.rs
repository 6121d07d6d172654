//! Throttled value stream with leading/trailing windows.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::trace;

use super::options::ThrottleOptions;
use super::timer::TimerSlot;

struct ThrottleSession<T> {
    /// Start of the current window; `None` until the first value arrives.
    last_executed: Option<Instant>,
    pending: Option<T>,
    timer: Option<TimerSlot>,
    next_timer_id: u64,
}

struct ThrottleShared<T> {
    session: Mutex<ThrottleSession<T>>,
    value: watch::Sender<T>,
    wait: Duration,
    options: ThrottleOptions,
}

impl<T> ThrottleShared<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn publish(&self, next: T) {
        self.value.send_if_modified(|value| {
            if *value == next {
                false
            } else {
                *value = next;
                true
            }
        });
    }

    fn schedule(shared: &Arc<Self>, session: &mut ThrottleSession<T>, after: Duration) {
        session.next_timer_id += 1;
        let id = session.next_timer_id;
        let weak: Weak<Self> = Arc::downgrade(shared);
        session.timer = Some(TimerSlot::arm(id, after, move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_timer(id);
            }
        }));
    }

    fn on_timer(&self, id: u64) {
        let pending = {
            let mut session = self.session.lock();
            if session.timer.as_ref().map(|t| t.id) != Some(id) {
                return;
            }
            session.timer = None;
            let pending = session.pending.take();
            if pending.is_some() {
                session.last_executed = Some(Instant::now());
            }
            pending
        };

        if let Some(value) = pending {
            trace!("Throttle trailing edge firing");
            self.publish(value);
        }
    }
}

/// Rate-limits a value stream to at most one emission per window.
///
/// The first value of a window is emitted immediately when `leading` is
/// set; later values inside the window replace a single pending slot that
/// is emitted when the window elapses when `trailing` is set. A zero wait
/// passes every value through synchronously.
pub struct Throttle<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    shared: Arc<ThrottleShared<T>>,
}

impl<T> Throttle<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates a throttle; `initial` counts as the first value of the stream.
    pub fn new(initial: T, wait: Duration, options: ThrottleOptions) -> Self {
        let throttle = Self {
            shared: Arc::new(ThrottleShared {
                session: Mutex::new(ThrottleSession {
                    last_executed: None,
                    pending: None,
                    timer: None,
                    next_timer_id: 0,
                }),
                value: watch::Sender::new(initial.clone()),
                wait,
                options,
            }),
        };
        throttle.set(initial);
        throttle
    }

    /// Feeds a new value into the stream.
    pub fn set(&self, value: T) {
        let shared = &self.shared;
        if shared.wait.is_zero() {
            shared.publish(value);
            return;
        }

        let now = Instant::now();
        let mut session = shared.session.lock();

        let Some(last_executed) = session.last_executed else {
            session.last_executed = Some(now);
            if shared.options.leading {
                drop(session);
                shared.publish(value);
                return;
            }
            if shared.options.trailing && session.timer.is_none() {
                session.pending = Some(value);
                ThrottleShared::schedule(shared, &mut session, shared.wait);
            }
            return;
        };

        let elapsed = now.saturating_duration_since(last_executed);
        if elapsed >= shared.wait && shared.options.leading {
            session.last_executed = Some(now);
            session.pending = None;
            if let Some(timer) = session.timer.take() {
                timer.cancel();
            }
            drop(session);
            shared.publish(value);
            return;
        }

        if shared.options.trailing {
            session.pending = Some(value);
            if session.timer.is_none() {
                let remaining = shared.wait.saturating_sub(elapsed);
                ThrottleShared::schedule(shared, &mut session, remaining);
            }
        }
    }

    /// Returns the current throttled value.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.value.borrow().clone()
    }

    /// Subscribes to emissions of the throttled value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.shared.value.subscribe()
    }

    /// Returns the window length.
    #[must_use]
    pub fn wait(&self) -> Duration {
        self.shared.wait
    }
}

impl<T> Drop for Throttle<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn drop(&mut self) {
        let mut session = self.shared.session.lock();
        if let Some(timer) = session.timer.take() {
            timer.cancel();
        }
        session.pending = None;
    }
}

impl<T> std::fmt::Debug for Throttle<T>
where
    T: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("value", &*self.shared.value.borrow())
            .field("wait", &self.shared.wait)
            .field("options", &self.shared.options)
            .finish()
    }
}
