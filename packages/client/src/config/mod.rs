//! Instance configuration
//!
//! [`ClientConfig`] holds the defaults shared by every call on an instance;
//! [`validation`] holds the checks run when a client is built.

pub mod client;
pub mod validation;

pub use client::{ClientConfig, join_url};
pub use validation::{ConfigError, ConfigResult, ConfigValidator, Validator};
