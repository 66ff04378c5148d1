//! Instance client
//!
//! [`HttpClient`] pairs a frozen configuration snapshot with a transport
//! dispatcher. [`ClientBuilder`] assembles both.

pub mod builder;
pub mod core;
pub mod stats;

pub use builder::ClientBuilder;
pub use core::HttpClient;
pub use stats::{ClientStats, ClientStatsSnapshot};
