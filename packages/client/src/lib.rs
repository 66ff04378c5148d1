//! # hxs client core
//!
//! Transport-agnostic HTTP request pipeline.
//!
//! A request travels as a [`RequestDescriptor`] through an onion of
//! interceptors into a terminal stage that resolves the URL, encodes the body,
//! dispatches to a transport and decodes the response. Every transport shares
//! the same contract: headers normalised into a [`HeaderMap`], non-2xx
//! statuses rejected, deadlines reported as `Timeout` and aborts as `Cancel`.
//!
//! ## Features
//!
//! - **Case-insensitive headers** with canonical casing
//! - **Onion-model interceptors** with nested and optional entries
//! - **Four transports**: custom function, host-native (hyper), XHR-style and
//!   fetch-style, selected per request from injected capabilities
//! - **Unified cancellation and timeouts** with guaranteed listener cleanup
//! - **Batch and retry helpers**
//!
//! ## Usage
//!
//! ```no_run
//! use hxs_client::{HttpClient, RequestDescriptor};
//!
//! # async fn run() -> hxs_client::Result<()> {
//! let client = HttpClient::builder()
//!     .base_url("http://localhost:8080/api")
//!     .header("accept", "application/json")
//!     .build()
//!     .expect("valid configuration");
//!
//! let envelope = client.get("/users/{id}").await?;
//! println!("{} {}", envelope.status, envelope.request.url);
//!
//! let mut call = RequestDescriptor::get("/users/{id}");
//! call.path_params = Some(vec!["7".into()]);
//! let user: serde_json::Value = client.request(call).await?.json()?;
//! # let _ = user;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod cancel;
pub mod client;
pub mod concurrent;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod pipeline;
pub mod retry;
pub mod transform;
pub mod transport;

// Prelude with canonical types
pub mod prelude;

pub use crate::prelude::*;
