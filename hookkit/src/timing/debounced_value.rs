//! A value that settles only after its input stops changing.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::debounce::Debouncer;
use super::options::DebounceOptions;

/// Holds the debounced view of a changing input value.
///
/// The initial value is visible immediately. Later inputs pass through a
/// [`Debouncer`] whose action replaces the current value; subscribers are
/// notified only when the delivered value differs from the current one.
pub struct DebouncedValue<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    current: Arc<watch::Sender<T>>,
    debouncer: Debouncer<T>,
}

impl<T> DebouncedValue<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates a debounced value starting at `initial`.
    pub fn new(initial: T, delay: Duration, options: DebounceOptions) -> Self {
        Self::build(initial, delay, options, None)
    }

    /// Creates a debounced value that also runs `observer` on every delivered change.
    pub fn with_observer<F>(initial: T, delay: Duration, options: DebounceOptions, observer: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self::build(initial, delay, options, Some(Box::new(observer)))
    }

    #[allow(clippy::type_complexity)]
    fn build(
        initial: T,
        delay: Duration,
        options: DebounceOptions,
        observer: Option<Box<dyn Fn(&T) + Send + Sync>>,
    ) -> Self {
        let current = Arc::new(watch::Sender::new(initial));
        let sender = current.clone();
        let debouncer = Debouncer::new(
            move |next: T| {
                let changed = sender.send_if_modified(|value| {
                    if *value == next {
                        false
                    } else {
                        *value = next;
                        true
                    }
                });
                if changed {
                    if let Some(observer) = observer.as_ref() {
                        let value = sender.borrow().clone();
                        observer(&value);
                    }
                }
            },
            delay,
            options,
        );
        Self { current, debouncer }
    }

    /// Feeds a new input value.
    pub fn set(&self, value: T) {
        self.debouncer.invoke(value);
    }

    /// Returns the current debounced value.
    #[must_use]
    pub fn get(&self) -> T {
        self.current.borrow().clone()
    }

    /// Subscribes to changes of the debounced value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.current.subscribe()
    }

    /// Drops any input that has not settled yet.
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    /// Settles the pending input immediately.
    pub fn flush(&self) {
        self.debouncer.flush();
    }

    /// Whether an input is waiting to settle.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

impl<T> std::fmt::Debug for DebouncedValue<T>
where
    T: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedValue")
            .field("current", &*self.current.borrow())
            .field("debouncer", &self.debouncer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_value_is_immediate() {
        let value = DebouncedValue::new("initial", ms(100), DebounceOptions::default());
        assert_eq!(value.get(), "initial");
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_update_settles() {
        let value = DebouncedValue::new("v0", ms(100), DebounceOptions::default());

        value.set("v1");
        value.set("v2");
        value.set("v3");
        assert_eq!(value.get(), "v0");

        tokio::time::sleep(ms(101)).await;
        assert_eq!(value.get(), "v3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_hold_old_value() {
        let value = DebouncedValue::new(0, ms(200), DebounceOptions::default());

        for i in 1..=10 {
            value.set(i);
            tokio::time::sleep(ms(50)).await;
        }
        assert_eq!(value.get(), 0);

        tokio::time::sleep(ms(200)).await;
        assert_eq!(value.get(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_respects_delay() {
        let value = DebouncedValue::new("start", ms(500), DebounceOptions::default());
        value.set("end");

        tokio::time::sleep(ms(400)).await;
        assert_eq!(value.get(), "start");

        tokio::time::sleep(ms(101)).await;
        assert_eq!(value.get(), "end");
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_changes_only() {
        let value = DebouncedValue::new(vec![1, 2, 3], ms(100), DebounceOptions::default());
        let mut rx = value.subscribe();

        value.set(vec![1, 2, 3]);
        tokio::time::sleep(ms(101)).await;
        assert!(!rx.has_changed().unwrap());

        value.set(vec![4, 5, 6]);
        tokio::time::sleep(ms(101)).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), vec![4, 5, 6]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_runs_on_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let value = DebouncedValue::with_observer(
            String::new(),
            ms(100),
            DebounceOptions::default(),
            move |v: &String| sink.lock().push(v.clone()),
        );

        value.set("https://example.com".to_string());
        tokio::time::sleep(ms(101)).await;
        value.set("https://example.com".to_string());
        tokio::time::sleep(ms(101)).await;

        assert_eq!(*seen.lock(), vec!["https://example.com".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_keeps_current_value() {
        let value = DebouncedValue::new(1, ms(100), DebounceOptions::default());
        value.set(2);
        assert!(value.is_pending());
        value.cancel();

        tokio::time::sleep(ms(200)).await;
        assert_eq!(value.get(), 1);
    }
}
