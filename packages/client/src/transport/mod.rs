//! Transport selection and host transport adapters
//!
//! The pipeline never moves bytes itself. Each adapter wraps a host-provided
//! primitive ([`FetchBackend`], [`XhrBackend`], [`NativeBackend`] or a custom
//! request function) and normalises it into the common envelope contract:
//! headers become a [`HeaderMap`](crate::http::HeaderMap), non-2xx statuses
//! reject with a `Response` error, deadlines surface as `Timeout` and aborts as
//! `Cancel`.

use std::fmt;

use bytes::Bytes;
use futures::future::BoxFuture;
use http::Method;
use thiserror::Error;

use crate::error::{Error, Kind, Phase, Result};
use crate::http::{FormData, RequestBody, RequestDescriptor, ResponseEnvelope};
use crate::transform::encode_body;

pub mod capabilities;
pub mod custom;
pub mod dispatcher;
pub mod fetch;
pub(crate) mod guard;
pub mod native;
pub mod xhr;

pub use capabilities::TransportCapabilities;
pub use custom::{CustomRequest, CustomTransport};
pub use dispatcher::Dispatcher;
pub use fetch::{FetchBackend, FetchReply, FetchTransport};
pub use native::{HyperBackend, NativeBackend, NativeTransport};
pub use xhr::{XhrBackend, XhrOptions, XhrReply, XhrTransport};

/// Which transport produced an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Custom,
    Native,
    Xhr,
    Fetch,
}

impl TransportKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Custom => "custom",
            TransportKind::Native => "native",
            TransportKind::Xhr => "xhr",
            TransportKind::Fetch => "fetch",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transport turns a fully transformed request into an envelope.
pub trait Transport: Send + Sync {
    fn kind(&self) -> TransportKind;

    fn send(&self, request: RequestDescriptor) -> BoxFuture<'static, Result<ResponseEnvelope>>;
}

/// Failure reported by a host primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("transport aborted")]
    Aborted,
    #[error("transport timed out")]
    TimedOut,
    #[error("{0}")]
    Network(String),
}

impl TransportFailure {
    pub fn network(message: impl fmt::Display) -> Self {
        TransportFailure::Network(message.to_string())
    }
}

/// Body as handed to browser-style primitives.
#[derive(Debug, Clone)]
pub enum WireBody {
    Empty,
    Bytes(Bytes),
    /// Encoded by the primitive, which also owns the boundary
    Multipart(FormData),
}

/// Request as handed to browser-style primitives.
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: WireBody,
}

impl WireRequest {
    /// Encode the descriptor's body in place, then take its wire shape.
    pub(crate) fn from_request(request: &mut RequestDescriptor) -> Result<Self> {
        encode_body(request);
        let body = match &request.body {
            None => WireBody::Empty,
            Some(RequestBody::Text(text)) => WireBody::Bytes(Bytes::from(text.clone())),
            Some(RequestBody::Binary(bytes)) => WireBody::Bytes(bytes.clone()),
            Some(RequestBody::Multipart(form)) => WireBody::Multipart(form.clone()),
            Some(RequestBody::Structured(_) | RequestBody::Params(_)) => {
                return Err(Error::new(Kind::Network, Phase::Request, "request body was not encoded")
                    .with_request(request.clone()));
            }
        };
        Ok(WireRequest {
            method: request.method.clone(),
            url: request.url.clone(),
            headers: request
                .headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body,
        })
    }
}
