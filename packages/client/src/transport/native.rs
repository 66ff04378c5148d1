//! Native transport for non-browser hosts
//!
//! Builds an `http::Request<Bytes>` from the transformed descriptor and hands
//! it to a [`NativeBackend`]. [`HyperBackend`] is the stock backend, a
//! plain-HTTP hyper client.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use futures::future::BoxFuture;
use http::Uri;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use super::guard::{self, RawReply};
use super::{Transport, TransportFailure, TransportKind, WireBody, WireRequest};
use crate::cancel::{AbortController, AbortSignal};
use crate::error::{Error, Kind, Phase, Result};
use crate::http::{Credentials, FormData, HeaderMap, RequestDescriptor, ResponseEnvelope, content_type};

/// Host HTTP stack.
pub trait NativeBackend: Send + Sync {
    fn send(
        &self,
        request: http::Request<Bytes>,
        signal: AbortSignal,
    ) -> BoxFuture<'static, std::result::Result<http::Response<Bytes>, TransportFailure>>;
}

fn basic_auth(credentials: &Credentials) -> String {
    let pair = format!("{}:{}", credentials.username, credentials.password.as_deref().unwrap_or(""));
    format!("Basic {}", STANDARD.encode(pair))
}

fn invalid_request(request: &RequestDescriptor, message: impl Into<String>) -> Error {
    Error::new(Kind::Network, Phase::Request, message).with_request(request.clone())
}

/// Materialise the descriptor as an `http::Request`.
pub(crate) fn build_request(request: &mut RequestDescriptor) -> Result<http::Request<Bytes>> {
    let uri: Uri = request
        .url
        .parse()
        .map_err(|e: http::uri::InvalidUri| invalid_request(request, format!("invalid url {}: {e}", request.url)))?;

    let wire = WireRequest::from_request(request)?;
    let mut headers = request.headers.clone();
    if let Some(credentials) = &request.auth
        && !headers.has("authorization")
    {
        headers.set("Authorization", basic_auth(credentials));
    }

    let body = match wire.body {
        WireBody::Empty => Bytes::new(),
        WireBody::Bytes(bytes) => bytes,
        WireBody::Multipart(form) => {
            let boundary = FormData::generate_boundary();
            headers.set(content_type::NAME, FormData::content_type(&boundary));
            form.encode(&boundary)
        }
    };

    let mut builder = http::Request::builder().method(request.method.clone()).uri(uri);
    if let Some(map) = builder.headers_mut() {
        *map = headers
            .to_http()
            .map_err(|e| invalid_request(request, e.to_string()))?;
    }
    builder
        .body(body)
        .map_err(|e| invalid_request(request, e.to_string()))
}

pub struct NativeTransport {
    backend: Arc<dyn NativeBackend>,
}

impl NativeTransport {
    pub fn new<B: NativeBackend + 'static>(backend: B) -> Self {
        NativeTransport { backend: Arc::new(backend) }
    }
}

impl Transport for NativeTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Native
    }

    fn send(&self, mut request: RequestDescriptor) -> BoxFuture<'static, Result<ResponseEnvelope>> {
        let backend = self.backend.clone();
        Box::pin(async move {
            let outgoing = build_request(&mut request)?;
            let controller = AbortController::new();
            let in_flight = backend.send(outgoing, controller.signal());
            let response = guard::settle(&request, &controller, async {
                in_flight.await.map_err(|failure| guard::classify(&request, failure))
            })
            .await?;

            let (parts, body) = response.into_parts();
            let raw = RawReply {
                status: parts.status,
                status_text: parts.status.canonical_reason().unwrap_or_default().to_string(),
                headers: HeaderMap::from(&parts.headers),
                body,
            };
            guard::into_envelope(request, raw, TransportKind::Native)
        })
    }
}

/// Plain-HTTP backend over hyper's pooled client.
#[derive(Clone)]
pub struct HyperBackend {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HyperBackend {
    #[must_use]
    pub fn new() -> Self {
        HyperBackend {
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }
}

impl Default for HyperBackend {
    fn default() -> Self {
        HyperBackend::new()
    }
}

impl NativeBackend for HyperBackend {
    fn send(
        &self,
        request: http::Request<Bytes>,
        _signal: AbortSignal,
    ) -> BoxFuture<'static, std::result::Result<http::Response<Bytes>, TransportFailure>> {
        // Dropping the response future tears the connection down, which is how
        // an abort reaches hyper.
        let client = self.client.clone();
        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let response = client
                .request(http::Request::from_parts(parts, Full::new(body)))
                .await
                .map_err(TransportFailure::network)?;
            let (parts, incoming): (_, hyper::body::Incoming) = response.into_parts();
            let bytes = incoming
                .collect()
                .await
                .map_err(TransportFailure::network)?
                .to_bytes();
            Ok(http::Response::from_parts(parts, bytes))
        })
    }
}
