//! Debounce and throttle scheduling.
//!
//! This module provides:
//! - [`Debouncer`] for coalescing invocations of an action
//! - [`DebouncedValue`] for a value that settles after its input goes quiet
//! - [`Throttle`] for rate-limiting a value stream
//!
//! All timers run on the ambient Tokio runtime.

mod debounce;
mod debounced_value;
mod options;
mod throttle;
mod timer;

pub use debounce::{DebounceAction, Debouncer};
pub use debounced_value::DebouncedValue;
pub use options::{delay_from_ms, DebounceOptions, ThrottleOptions};
pub use throttle::Throttle;
