//! Observability utilities.
//!
//! Library code only emits `tracing` events; applications opt into output
//! with [`init_tracing`] or their own subscriber.

mod subscriber;
mod timer;

pub use subscriber::{init_tracing, TracingConfig};
pub use timer::SpanTimer;
