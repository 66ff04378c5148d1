//! # hxs
//!
//! Cross-transport HTTP requests with composable middleware, unified
//! cancellation and batch/retry helpers.
//!
//! The free functions ([`get`], [`post`], ...) start a [`RequestBuilder`] on a
//! lazily-initialised global [`HttpClient`]. Build your own client with
//! [`HttpClient::builder`] for base URLs, default headers or interceptors and
//! start requests on it with [`with_client`].
//!
//! ```no_run
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! # async fn run() -> hxs::Result<()> {
//! let user: User = hxs::get("http://localhost:8080/users/{id}")
//!     .path_params(["7"])
//!     .query(&serde_json::json!({"expand": ["posts"]}))
//!     .timeout(std::time::Duration::from_secs(5))
//!     .send_json()
//!     .await?;
//! println!("{}", user.name);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

use std::sync::OnceLock;

pub mod builder;

pub use builder::{ContentType, RequestBuilder, header};

// Re-export the core
pub use hxs_client::prelude::*;
pub use hxs_client::{cancel, concurrent, config, error, middleware, pipeline, retry, transform, transport};

/// Global HTTP client instance, created on first use
static GLOBAL_CLIENT: OnceLock<HttpClient> = OnceLock::new();

/// Get the global HTTP client instance
///
/// Defaults to [`HttpClient::default`] (no base URL, host-native transport)
/// unless [`init_global_client`] ran first.
pub fn global_client() -> &'static HttpClient {
    GLOBAL_CLIENT.get_or_init(HttpClient::default)
}

/// Install `client` as the global client.
///
/// # Errors
///
/// Hands `client` back if the global client was already initialised.
pub fn init_global_client(client: HttpClient) -> std::result::Result<(), HttpClient> {
    GLOBAL_CLIENT.set(client).inspect_err(|_| {
        tracing::warn!("global client already initialised, keeping the existing one");
    })
}

/// Start a request on an explicit client.
pub fn with_client(client: &HttpClient, method: Method, url: impl Into<String>) -> RequestBuilder {
    RequestBuilder::new(client, method, url)
}

/// Start a request on the global client.
pub fn request(method: Method, url: impl Into<String>) -> RequestBuilder {
    RequestBuilder::new(global_client(), method, url)
}

pub fn get(url: impl Into<String>) -> RequestBuilder {
    request(Method::GET, url)
}

pub fn post(url: impl Into<String>) -> RequestBuilder {
    request(Method::POST, url)
}

pub fn put(url: impl Into<String>) -> RequestBuilder {
    request(Method::PUT, url)
}

pub fn patch(url: impl Into<String>) -> RequestBuilder {
    request(Method::PATCH, url)
}

pub fn delete(url: impl Into<String>) -> RequestBuilder {
    request(Method::DELETE, url)
}

pub fn head(url: impl Into<String>) -> RequestBuilder {
    request(Method::HEAD, url)
}
