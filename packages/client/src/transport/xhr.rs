//! XHR-style browser transport
//!
//! XHR is the only browser primitive with native timeouts, progress events
//! and request-level credentials, so those settings travel to the backend in
//! [`XhrOptions`]. The deadline is still enforced here as well.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::future::BoxFuture;

use super::guard::{self, RawReply};
use super::{Transport, TransportFailure, TransportKind, WireRequest};
use crate::cancel::{AbortController, AbortSignal};
use crate::error::Result;
use crate::http::{Credentials, HeaderMap, ProgressHandler, RequestDescriptor, ResponseEnvelope, ResponseType};

/// Per-request settings applied to the XHR object before `send`.
#[derive(Clone, Default)]
pub struct XhrOptions {
    pub timeout: Option<Duration>,
    pub credentials: Option<Credentials>,
    pub with_credentials: bool,
    pub response_type: Option<ResponseType>,
    pub on_progress: Option<ProgressHandler>,
    pub on_upload_progress: Option<ProgressHandler>,
}

impl XhrOptions {
    fn from_request(request: &RequestDescriptor) -> Self {
        XhrOptions {
            timeout: request.timeout,
            credentials: request.auth.clone(),
            with_credentials: request.with_credentials.unwrap_or(false),
            response_type: request.response_type,
            on_progress: request.on_progress.clone(),
            on_upload_progress: request.on_upload_progress.clone(),
        }
    }
}

impl fmt::Debug for XhrOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XhrOptions")
            .field("timeout", &self.timeout)
            .field("credentials", &self.credentials)
            .field("with_credentials", &self.with_credentials)
            .field("response_type", &self.response_type)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_upload_progress", &self.on_upload_progress.is_some())
            .finish()
    }
}

/// Completed XHR: status line, the raw `getAllResponseHeaders()` block and
/// the response payload.
#[derive(Debug, Clone, Default)]
pub struct XhrReply {
    pub status: u16,
    pub status_text: String,
    pub raw_headers: String,
    pub body: Bytes,
}

/// Host XHR primitive.
pub trait XhrBackend: Send + Sync {
    fn send(
        &self,
        request: WireRequest,
        options: XhrOptions,
        signal: AbortSignal,
    ) -> BoxFuture<'static, std::result::Result<XhrReply, TransportFailure>>;
}

pub struct XhrTransport {
    backend: Arc<dyn XhrBackend>,
}

impl XhrTransport {
    pub fn new<B: XhrBackend + 'static>(backend: B) -> Self {
        XhrTransport { backend: Arc::new(backend) }
    }
}

impl Transport for XhrTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Xhr
    }

    fn send(&self, mut request: RequestDescriptor) -> BoxFuture<'static, Result<ResponseEnvelope>> {
        let backend = self.backend.clone();
        Box::pin(async move {
            let wire = WireRequest::from_request(&mut request)?;
            let controller = AbortController::new();
            let in_flight = backend.send(
                wire,
                XhrOptions::from_request(&request),
                controller.signal(),
            );
            let reply = guard::settle(&request, &controller, async {
                in_flight.await.map_err(|failure| guard::classify(&request, failure))
            })
            .await?;

            let status = guard::parse_status(reply.status).map_err(|failure| guard::classify(&request, failure))?;
            let raw = RawReply {
                status,
                status_text: reply.status_text,
                headers: HeaderMap::parse_raw(&reply.raw_headers),
                body: reply.body,
            };
            guard::into_envelope(request, raw, TransportKind::Xhr)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::http::Progress;

    #[derive(Default)]
    struct Recording {
        seen: Arc<Mutex<Option<XhrOptions>>>,
    }

    impl XhrBackend for Recording {
        fn send(
            &self,
            _request: WireRequest,
            options: XhrOptions,
            _signal: AbortSignal,
        ) -> BoxFuture<'static, std::result::Result<XhrReply, TransportFailure>> {
            if let Some(handler) = &options.on_progress {
                handler(Progress { loaded: 2, total: Some(2) });
            }
            *self.seen.lock().unwrap() = Some(options);
            Box::pin(async {
                Ok(XhrReply {
                    status: 201,
                    status_text: "Created".into(),
                    raw_headers: "content-type: application/json\r\nx-id: 9\r\n".into(),
                    body: Bytes::from_static(b"{}"),
                })
            })
        }
    }

    struct TimesOut;

    impl XhrBackend for TimesOut {
        fn send(
            &self,
            _request: WireRequest,
            _options: XhrOptions,
            _signal: AbortSignal,
        ) -> BoxFuture<'static, std::result::Result<XhrReply, TransportFailure>> {
            Box::pin(async { Err(TransportFailure::TimedOut) })
        }
    }

    #[tokio::test]
    async fn forwards_options_and_parses_raw_headers() {
        let backend = Recording::default();
        let seen = backend.seen.clone();
        let loaded = Arc::new(Mutex::new(0));
        let sink = loaded.clone();

        let mut request = RequestDescriptor::post("/items");
        request.auth = Some(Credentials { username: "ada".into(), password: Some("pw".into()) });
        request.with_credentials = Some(true);
        request.on_progress = Some(Arc::new(move |p: Progress| *sink.lock().unwrap() = p.loaded));

        let envelope = XhrTransport::new(backend).send(request).await.unwrap();
        assert_eq!(envelope.status.as_u16(), 201);
        assert_eq!(envelope.headers.get("X-Id"), Some("9"));
        assert_eq!(*loaded.lock().unwrap(), 2);

        let options = seen.lock().unwrap().take().unwrap();
        assert!(options.with_credentials);
        assert_eq!(options.credentials.map(|c| c.username).as_deref(), Some("ada"));
    }

    #[tokio::test]
    async fn native_timeout_maps_to_timeout_error() {
        let err = XhrTransport::new(TimesOut).send(RequestDescriptor::get("/")).await.unwrap_err();
        assert!(err.is_timeout());
    }
}
