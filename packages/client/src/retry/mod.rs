//! Retry helper
//!
//! [`retry`] re-invokes a request thunk under a [`RetryPolicy`]. Cancellation
//! is terminal and never retried.

pub mod executor;
pub mod policy;

pub use executor::retry;
pub use policy::{RetryPolicy, ShouldRetry};
