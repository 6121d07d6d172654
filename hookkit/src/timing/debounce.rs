//! Debounce engine with leading/trailing edges and a max-wait ceiling.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::trace;

use super::options::DebounceOptions;
use super::timer::TimerSlot;

/// The action a debouncer delivers arguments to.
pub type DebounceAction<A> = Arc<dyn Fn(A) + Send + Sync>;

#[derive(Debug, Clone, Copy)]
enum TimerKind {
    Trailing,
    MaxWait,
}

struct DebounceSession<A> {
    /// Most recent undelivered arguments.
    pending_args: Option<A>,
    trailing_timer: Option<TimerSlot>,
    max_wait_timer: Option<TimerSlot>,
    /// Always the most recently supplied action.
    latest_action: DebounceAction<A>,
    next_timer_id: u64,
}

impl<A> DebounceSession<A> {
    fn take_delivery(&mut self) -> Option<(DebounceAction<A>, A)> {
        self.pending_args
            .take()
            .map(|args| (self.latest_action.clone(), args))
    }

    fn clear_timers(&mut self) {
        if let Some(timer) = self.trailing_timer.take() {
            timer.cancel();
        }
        if let Some(timer) = self.max_wait_timer.take() {
            timer.cancel();
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_timer_id += 1;
        self.next_timer_id
    }
}

struct DebounceShared<A> {
    session: Mutex<DebounceSession<A>>,
    delay: Duration,
    options: DebounceOptions,
}

impl<A: Send + 'static> DebounceShared<A> {
    fn arm(
        shared: &Arc<Self>,
        session: &mut DebounceSession<A>,
        kind: TimerKind,
        after: Duration,
    ) -> TimerSlot {
        let id = session.next_id();
        let weak: Weak<Self> = Arc::downgrade(shared);
        TimerSlot::arm(id, after, move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_timer(kind, id);
            }
        })
    }

    fn on_timer(&self, kind: TimerKind, id: u64) {
        let delivery = {
            let mut session = self.session.lock();
            match kind {
                TimerKind::Trailing => {
                    if session.trailing_timer.as_ref().map(|t| t.id) != Some(id) {
                        return;
                    }
                    // Running inside this timer's task; dropping the slot detaches it.
                    session.trailing_timer = None;
                    let delivery = if self.options.trailing {
                        session.take_delivery()
                    } else {
                        // Quiet window closed: calls suppressed during the burst are dropped.
                        session.pending_args = None;
                        None
                    };
                    if let Some(timer) = session.max_wait_timer.take() {
                        timer.cancel();
                    }
                    delivery
                }
                TimerKind::MaxWait => {
                    if session.max_wait_timer.as_ref().map(|t| t.id) != Some(id) {
                        return;
                    }
                    session.max_wait_timer = None;
                    if let Some(timer) = session.trailing_timer.take() {
                        timer.cancel();
                    }
                    session.take_delivery()
                }
            }
        };

        if let Some((action, args)) = delivery {
            trace!(?kind, "Debounced action firing");
            action(args);
        }
    }
}

/// Delays and coalesces invocations of an action.
///
/// Only the arguments of the most recent call are ever delivered on the
/// trailing edge; older calls are superseded, never queued. Timers run on
/// the ambient Tokio runtime, so `invoke` must be called from within one.
///
/// With `leading` set and `trailing` unset, each call re-arms a silent
/// quiet window of `delay`; only the first call after a quiet period fires.
///
/// The action is never called while the session lock is held, so it may
/// call back into the debouncer.
pub struct Debouncer<A: Send + 'static> {
    shared: Arc<DebounceShared<A>>,
}

impl<A: Send + 'static> Debouncer<A> {
    /// Creates a debouncer around `action`.
    pub fn new<F>(action: F, delay: Duration, options: DebounceOptions) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(DebounceShared {
                session: Mutex::new(DebounceSession {
                    pending_args: None,
                    trailing_timer: None,
                    max_wait_timer: None,
                    latest_action: Arc::new(action),
                    next_timer_id: 0,
                }),
                delay,
                options,
            }),
        }
    }

    /// Records `args` and schedules delivery according to the options.
    pub fn invoke(&self, args: A) {
        let options = self.shared.options;
        let leading_delivery = {
            let mut session = self.shared.session.lock();
            session.pending_args = Some(args);

            let idle = session.trailing_timer.is_none() && session.max_wait_timer.is_none();
            let delivery = if options.leading && idle {
                session.take_delivery()
            } else {
                None
            };

            if let Some(timer) = session.trailing_timer.take() {
                timer.cancel();
            }
            if options.trailing || options.leading {
                let timer = DebounceShared::arm(
                    &self.shared,
                    &mut session,
                    TimerKind::Trailing,
                    self.shared.delay,
                );
                session.trailing_timer = Some(timer);
            }

            if let (Some(max_wait), true) = (options.max_wait(), options.trailing) {
                if session.max_wait_timer.is_none() {
                    let timer =
                        DebounceShared::arm(&self.shared, &mut session, TimerKind::MaxWait, max_wait);
                    session.max_wait_timer = Some(timer);
                }
            }

            delivery
        };

        if let Some((action, args)) = leading_delivery {
            trace!("Debounced action firing on leading edge");
            action(args);
        }
    }

    /// Clears all timers and discards pending arguments without executing.
    pub fn cancel(&self) {
        let mut session = self.shared.session.lock();
        session.clear_timers();
        session.pending_args = None;
    }

    /// Executes immediately with the pending arguments, if any.
    pub fn flush(&self) {
        let delivery = {
            let mut session = self.shared.session.lock();
            if session.pending_args.is_none() {
                return;
            }
            session.clear_timers();
            session.take_delivery()
        };

        if let Some((action, args)) = delivery {
            action(args);
        }
    }

    /// Whether arguments are waiting to be delivered.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.shared.session.lock().pending_args.is_some()
    }

    /// Replaces the action; later deliveries use the new one.
    pub fn set_action<F>(&self, action: F)
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        self.shared.session.lock().latest_action = Arc::new(action);
    }

    /// Returns the configured delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.shared.delay
    }

    /// Returns the configured options.
    #[must_use]
    pub fn options(&self) -> DebounceOptions {
        self.shared.options
    }
}

impl<A: Send + 'static> Drop for Debouncer<A> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<A: Send + 'static> std::fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.shared.delay)
            .field("options", &self.shared.options)
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recorder<A: Clone + Send + 'static>() -> (Arc<Mutex<Vec<A>>>, impl Fn(A) + Send + Sync) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        (calls, move |args: A| sink.lock().push(args))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_trailing_delivers_last_call_only() {
        let (calls, action) = recorder();
        let debouncer = Debouncer::new(action, ms(100), DebounceOptions::default());

        debouncer.invoke("a");
        debouncer.invoke("b");
        debouncer.invoke("c");
        assert!(calls.lock().is_empty());

        tokio::time::sleep(ms(101)).await;
        assert_eq!(*calls.lock(), vec!["c"]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_keep_resetting_trailing_timer() {
        let (calls, action) = recorder();
        let debouncer = Debouncer::new(action, ms(100), DebounceOptions::default());

        for i in 0..5 {
            debouncer.invoke(i);
            tokio::time::sleep(ms(60)).await;
        }
        assert!(calls.lock().is_empty());

        tokio::time::sleep(ms(50)).await;
        assert_eq!(*calls.lock(), vec![4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_action_is_used() {
        let (first, first_action) = recorder();
        let (second, second_action) = recorder();
        let debouncer = Debouncer::new(first_action, ms(100), DebounceOptions::default());

        debouncer.invoke("test");
        debouncer.set_action(second_action);
        tokio::time::sleep(ms(101)).await;

        assert!(first.lock().is_empty());
        assert_eq!(*second.lock(), vec!["test"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leading_fires_synchronously() {
        let (calls, action) = recorder();
        let debouncer = Debouncer::new(action, ms(100), DebounceOptions::new().with_leading(true));

        debouncer.invoke("first");
        assert_eq!(*calls.lock(), vec!["first"]);

        // The leading call consumed its arguments, so the trailing edge has nothing to send.
        tokio::time::sleep(ms(101)).await;
        assert_eq!(*calls.lock(), vec!["first"]);

        debouncer.invoke("second");
        debouncer.invoke("third");
        tokio::time::sleep(ms(101)).await;
        assert_eq!(*calls.lock(), vec!["first", "second", "third"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leading_only_fires_once_per_burst() {
        let (calls, action) = recorder();
        let options = DebounceOptions::new().with_leading(true).with_trailing(false);
        let debouncer = Debouncer::new(action, ms(100), options);

        debouncer.invoke("first");
        debouncer.invoke("second");
        tokio::time::sleep(ms(50)).await;
        debouncer.invoke("third");
        assert_eq!(*calls.lock(), vec!["first"]);

        tokio::time::sleep(ms(200)).await;
        assert_eq!(*calls.lock(), vec!["first"]);

        debouncer.invoke("next burst");
        assert_eq!(*calls.lock(), vec!["first", "next burst"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leading_only_drops_suppressed_args_after_window() {
        let (calls, action) = recorder();
        let options = DebounceOptions::new().with_leading(true).with_trailing(false);
        let debouncer = Debouncer::new(action, ms(100), options);

        debouncer.invoke("first");
        debouncer.invoke("second");
        assert!(debouncer.is_pending());

        tokio::time::sleep(ms(1000)).await;
        assert!(!debouncer.is_pending());

        debouncer.flush();
        assert_eq!(*calls.lock(), vec!["first"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_edges_never_fires() {
        let (calls, action) = recorder::<&str>();
        let options = DebounceOptions::new().with_leading(false).with_trailing(false);
        let debouncer = Debouncer::new(action, ms(100), options);

        debouncer.invoke("first");
        debouncer.invoke("second");
        tokio::time::sleep(ms(500)).await;

        assert!(calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_wait_ceiling_under_continuous_calls() {
        let (calls, action) = recorder();
        let options = DebounceOptions::new().with_max_wait(ms(250));
        let debouncer = Debouncer::new(action, ms(100), options);

        // Calls every 60ms would starve a plain trailing timer forever.
        for i in 0..10 {
            debouncer.invoke(i);
            tokio::time::sleep(ms(60)).await;
        }
        assert_eq!(*calls.lock(), vec![4, 9]);

        tokio::time::sleep(ms(200)).await;
        assert_eq!(*calls.lock(), vec![4, 9]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending() {
        let (calls, action) = recorder::<&str>();
        let debouncer = Debouncer::new(action, ms(100), DebounceOptions::default());

        debouncer.invoke("test");
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(ms(200)).await;
        assert!(calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_executes_once() {
        let (calls, action) = recorder();
        let debouncer = Debouncer::new(action, ms(100), DebounceOptions::default());

        debouncer.invoke("flush-me");
        debouncer.flush();
        assert_eq!(*calls.lock(), vec!["flush-me"]);

        tokio::time::sleep(ms(200)).await;
        assert_eq!(*calls.lock(), vec!["flush-me"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_without_pending_is_noop() {
        let (calls, action) = recorder::<&str>();
        let debouncer = Debouncer::new(action, ms(100), DebounceOptions::default());

        debouncer.flush();
        assert!(calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending() {
        let (calls, action) = recorder::<&str>();
        let debouncer = Debouncer::new(action, ms(100), DebounceOptions::default());

        debouncer.invoke("dropped");
        drop(debouncer);

        tokio::time::sleep(ms(200)).await;
        assert!(calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_may_reenter() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let slot: Arc<Mutex<Option<Arc<Debouncer<u32>>>>> = Arc::new(Mutex::new(None));

        let sink = calls.clone();
        let handle = slot.clone();
        let debouncer = Arc::new(Debouncer::new(
            move |n: u32| {
                sink.lock().push(n);
                if n < 2 {
                    if let Some(debouncer) = handle.lock().clone() {
                        debouncer.invoke(n + 1);
                    }
                }
            },
            ms(10),
            DebounceOptions::default(),
        ));
        *slot.lock() = Some(debouncer.clone());

        debouncer.invoke(0);
        tokio::time::sleep(ms(100)).await;
        assert_eq!(*calls.lock(), vec![0, 1, 2]);

        slot.lock().take();
    }
}
