//! Core `RequestBuilder` structure
//!
//! A builder owns a clone of the client (cheap, the defaults are shared) and
//! the call-specific descriptor it is filling in. Nothing touches the
//! client's defaults; they are overlaid when the request is sent.

use std::fmt;

use hxs_client::http::content_type;
use hxs_client::{HttpClient, Method, RequestDescriptor};

/// Content type enumeration for the fluent API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// application/json content type
    ApplicationJson,
    /// application/x-www-form-urlencoded content type
    ApplicationFormUrlEncoded,
    /// application/octet-stream content type
    ApplicationOctetStream,
    /// text/plain content type
    TextPlain,
    /// text/html content type
    TextHtml,
    /// multipart/form-data content type
    MultipartFormData,
}

impl ContentType {
    /// Header value for this content type
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::ApplicationJson => content_type::JSON,
            ContentType::ApplicationFormUrlEncoded => content_type::FORM,
            ContentType::ApplicationOctetStream => "application/octet-stream",
            ContentType::TextPlain => content_type::TEXT,
            ContentType::TextHtml => "text/html",
            ContentType::MultipartFormData => content_type::FORM_DATA,
        }
    }
}

/// Per-call request builder.
#[must_use = "a RequestBuilder does nothing until `send` is awaited"]
#[derive(Clone)]
pub struct RequestBuilder {
    pub(crate) client: HttpClient,
    pub(crate) request: RequestDescriptor,
}

impl RequestBuilder {
    /// Start building a `method` request to `url` on `client`.
    pub fn new(client: &HttpClient, method: Method, url: impl Into<String>) -> Self {
        RequestBuilder {
            client: client.clone(),
            request: RequestDescriptor::new(method, url),
        }
    }

    /// The descriptor built so far.
    pub fn request(&self) -> &RequestDescriptor {
        &self.request
    }

    /// Hand back the descriptor without sending it.
    pub fn into_request(self) -> RequestDescriptor {
        self.request
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}
