//! Header management for a single request

use hxs_client::HeaderMap;
use hxs_client::http::content_type;

use crate::builder::core::{ContentType, RequestBuilder};

/// Header constants for common HTTP headers
pub mod header {
    pub use http::header::*;

    /// Custom X-API-Key header for API authentication
    pub const X_API_KEY: &str = "x-api-key";
}

impl RequestBuilder {
    /// Set a header, replacing any value already set under the same name in
    /// any casing.
    ///
    /// # Examples
    /// ```no_run
    /// # async fn run() -> hxs::Result<()> {
    /// let envelope = hxs::get("http://localhost:8080/data")
    ///     .header("x-custom-header", "custom-value")
    ///     .send()
    ///     .await?;
    /// # let _ = envelope;
    /// # Ok(())
    /// # }
    /// ```
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.request.headers.set(name, value);
        self
    }

    /// Add a value without replacing existing ones.
    pub fn append_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.request.headers.append(name, value);
        self
    }

    /// Merge `headers` over the ones set so far.
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        self.request.headers.extend_from(headers);
        self
    }

    pub fn content_type(self, content_type: ContentType) -> Self {
        self.header(content_type::NAME, content_type.as_str())
    }

    pub fn accept(self, content_type: ContentType) -> Self {
        self.header(header::ACCEPT.as_str(), content_type.as_str())
    }

    /// Set the `X-API-Key` header.
    pub fn api_key(self, key: &str) -> Self {
        self.header(header::X_API_KEY, key)
    }

    /// Set an `Authorization: Bearer` header.
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header(header::AUTHORIZATION.as_str(), format!("Bearer {token}"))
    }
}
