//! Small observable state containers.
//!
//! Each container publishes its value through a Tokio `watch` channel so
//! consumers can read the latest value or await changes.

mod boolean;
mod map;
mod previous;

pub use boolean::BooleanState;
pub use map::StateMap;
pub use previous::PreviousValue;
