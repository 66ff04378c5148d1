use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use http::StatusCode;

use crate::http::headers::HeaderMap;
use crate::http::request::RequestDescriptor;
use crate::http::response::ResponseBody;

/// A Result alias where the Err case is `hxs_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed rejection produced by the request pipeline.
///
/// Every failure that crosses the pipeline boundary carries a machine-readable
/// [`Kind`], the [`Phase`] it was detected in, the originating request and a
/// snapshot of whatever headers were known at that point.
#[derive(Clone)]
pub struct Error {
    pub(crate) inner: Box<Inner>,
}

#[derive(Clone)]
pub(crate) struct Inner {
    pub(crate) kind: Kind,
    pub(crate) phase: Phase,
    pub(crate) message: String,
    pub(crate) request: Option<RequestDescriptor>,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<ResponseBody>,
    pub(crate) source: Option<Arc<dyn StdError + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// User- or system-initiated abort
    Cancel,
    /// Deadline elapsed before the transport settled
    Timeout,
    /// Low-level transport failure unrelated to timeout or cancel
    Network,
    /// Out-of-range HTTP status
    Response(StatusCode),
    /// Malformed body for the declared or sniffed response type
    Decode,
}

impl Kind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Cancel => "cancel",
            Kind::Timeout => "timeout",
            Kind::Network => "network",
            Kind::Response(_) => "response",
            Kind::Decode => "decode",
        }
    }
}

/// Pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Request,
    Transport,
    Abort,
    Timeout,
    Response,
    Decode,
}

impl Phase {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Request => "request",
            Phase::Transport => "error",
            Phase::Abort => "abort",
            Phase::Timeout => "timeout",
            Phase::Response => "response",
            Phase::Decode => "decode",
        }
    }
}

impl Error {
    pub fn new(kind: Kind, phase: Phase, message: impl Into<String>) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                phase,
                message: message.into(),
                request: None,
                headers: HeaderMap::new(),
                body: None,
                source: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(Arc::from(source.into()));
        self
    }

    #[must_use]
    pub fn with_request(mut self, request: RequestDescriptor) -> Error {
        self.inner.request = Some(request);
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Error {
        self.inner.headers = headers;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: ResponseBody) -> Error {
        self.inner.body = Some(body);
        self
    }

    pub fn message(&self) -> &str {
        &self.inner.message
    }

    pub fn request(&self) -> Option<&RequestDescriptor> {
        self.inner.request.as_ref()
    }

    pub(crate) fn request_mut(&mut self) -> Option<&mut RequestDescriptor> {
        self.inner.request.as_mut()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Decoded error body, present on `Response` errors when the transport
    /// delivered one.
    pub fn body(&self) -> Option<&ResponseBody> {
        self.inner.body.as_ref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("hxs::Error");

        f.field("kind", &self.inner.kind);
        f.field("phase", &self.inner.phase);
        f.field("message", &self.inner.message);

        if let Some(ref request) = self.inner.request {
            f.field("url", &request.url);
        }

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            Kind::Cancel => write!(f, "request cancelled: {}", self.inner.message),
            Kind::Timeout => write!(f, "request timeout: {}", self.inner.message),
            Kind::Network => write!(f, "network error: {}", self.inner.message),
            Kind::Decode => write!(f, "error decoding response body: {}", self.inner.message),
            Kind::Response(code) => {
                let prefix = if code.is_client_error() {
                    "HTTP status client error"
                } else if code.is_server_error() {
                    "HTTP status server error"
                } else {
                    "unexpected HTTP status"
                };
                write!(f, "{prefix} ({code})")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
