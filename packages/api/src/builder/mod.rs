//! Fluent per-call request builder
//!
//! Split by concern: the builder itself, headers, payloads, and request
//! options with the terminal `send` methods.

pub mod body;
pub mod core;
pub mod headers;
pub mod methods;

pub use core::{ContentType, RequestBuilder};
pub use headers::header;
