//! Fetch-style browser transport

use std::sync::Arc;

use bytes::Bytes;
use futures::future::BoxFuture;

use super::guard::{self, RawReply};
use super::{Transport, TransportFailure, TransportKind, WireRequest};
use crate::cancel::{AbortController, AbortSignal};
use crate::error::Result;
use crate::http::{HeaderMap, RequestDescriptor, ResponseEnvelope};

/// What a fetch primitive hands back once the body has been read.
#[derive(Debug, Clone, Default)]
pub struct FetchReply {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

/// Host fetch primitive.
///
/// `signal` is the per-request abort signal; the primitive should stop and
/// report [`TransportFailure::Aborted`] once it fires.
pub trait FetchBackend: Send + Sync {
    fn fetch(&self, request: WireRequest, signal: AbortSignal) -> BoxFuture<'static, std::result::Result<FetchReply, TransportFailure>>;
}

pub struct FetchTransport {
    backend: Arc<dyn FetchBackend>,
}

impl FetchTransport {
    pub fn new<B: FetchBackend + 'static>(backend: B) -> Self {
        FetchTransport { backend: Arc::new(backend) }
    }
}

impl Transport for FetchTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Fetch
    }

    fn send(&self, mut request: RequestDescriptor) -> BoxFuture<'static, Result<ResponseEnvelope>> {
        let backend = self.backend.clone();
        Box::pin(async move {
            let wire = WireRequest::from_request(&mut request)?;
            let controller = AbortController::new();
            let in_flight = backend.fetch(wire, controller.signal());
            let reply = guard::settle(&request, &controller, async {
                in_flight.await.map_err(|failure| guard::classify(&request, failure))
            })
            .await?;

            let status = guard::parse_status(reply.status).map_err(|failure| guard::classify(&request, failure))?;
            let raw = RawReply {
                status,
                status_text: reply.status_text,
                headers: HeaderMap::from_pairs(reply.headers),
                body: reply.body,
            };
            guard::into_envelope(request, raw, TransportKind::Fetch)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{RequestBody, ResponseBody, content_type};
    use crate::transport::WireBody;

    struct Canned(u16, &'static [u8]);

    impl FetchBackend for Canned {
        fn fetch(&self, request: WireRequest, _signal: AbortSignal) -> BoxFuture<'static, std::result::Result<FetchReply, TransportFailure>> {
            let reply = FetchReply {
                status: self.0,
                status_text: request.url,
                headers: vec![("content-type".into(), "text/plain".into())],
                body: Bytes::from_static(self.1),
            };
            Box::pin(async move { Ok(reply) })
        }
    }

    #[tokio::test]
    async fn normalises_reply() {
        let envelope = FetchTransport::new(Canned(200, b"hi"))
            .send(RequestDescriptor::get("/x"))
            .await
            .unwrap();
        assert_eq!(envelope.status_text, "/x");
        assert_eq!(envelope.headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(envelope.response, ResponseBody::Bytes(Bytes::from_static(b"hi")));
        assert_eq!(envelope.transport, TransportKind::Fetch);
    }

    #[derive(Default)]
    struct Recording(std::sync::Mutex<Vec<WireRequest>>);

    impl FetchBackend for Arc<Recording> {
        fn fetch(&self, request: WireRequest, _signal: AbortSignal) -> BoxFuture<'static, std::result::Result<FetchReply, TransportFailure>> {
            self.0.lock().unwrap().push(request);
            Box::pin(async {
                Ok(FetchReply { status: 204, status_text: String::new(), headers: Vec::new(), body: Bytes::new() })
            })
        }
    }

    #[tokio::test]
    async fn structured_body_follows_declared_form_type() {
        let backend = Arc::new(Recording::default());
        let mut request = RequestDescriptor::post("/login");
        request.headers.set(content_type::NAME, content_type::FORM);
        request.body = Some(RequestBody::Structured(serde_json::json!({"next": "/a b", "n": 1})));

        FetchTransport::new(backend.clone()).send(request).await.unwrap();

        let sent = backend.0.lock().unwrap();
        assert!(matches!(&sent[0].body, WireBody::Bytes(b) if b.as_ref() == b"next=%2Fa+b&n=1"));
        assert!(sent[0].headers.contains(&("Content-Type".to_string(), content_type::FORM.to_string())));
    }

    #[tokio::test]
    async fn unencoded_params_reach_the_wire_form_encoded() {
        let backend = Arc::new(Recording::default());
        let mut request = RequestDescriptor::post("/search");
        request.body = Some(RequestBody::Params(vec![("q".into(), "a,b".into())]));

        let envelope = FetchTransport::new(backend.clone()).send(request).await.unwrap();

        let sent = backend.0.lock().unwrap();
        assert!(matches!(&sent[0].body, WireBody::Bytes(b) if b.as_ref() == b"q=a%2Cb"));
        assert_eq!(envelope.request.headers.content_type(), Some(content_type::FORM));
    }

    #[tokio::test]
    async fn status_zero_is_a_network_error() {
        let err = FetchTransport::new(Canned(0, b""))
            .send(RequestDescriptor::get("/x"))
            .await
            .unwrap_err();
        assert!(err.is_network());
    }
}
