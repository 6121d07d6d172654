//! Cooperative cancellation for in-flight operations.
//!
//! Every network request issued by an extractor owns exactly one
//! [`CancellationToken`]. Starting a new request cancels the previous
//! owner's token before a fresh one is created.

mod token;

pub use token::CancellationToken;
