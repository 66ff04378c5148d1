//! Transport selection, cancellation and deadlines

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use bytes::Bytes;
    use futures::future::BoxFuture;
    use hxs_client::transport::{FetchBackend, FetchReply, NativeBackend, WireRequest, XhrBackend, XhrOptions, XhrReply};
    use hxs_client::{
        AbortSignal, CancelToken, Dispatcher, HttpClient, Phase, Progress, RequestDescriptor, RequestMode,
        ResponseBody, TransportCapabilities, TransportFailure, TransportKind,
    };

    /// Native backend that never answers; it only settles once aborted.
    #[derive(Clone, Default)]
    struct Stall {
        signals: Arc<Mutex<Vec<AbortSignal>>>,
        calls: Arc<AtomicUsize>,
    }

    impl NativeBackend for Stall {
        fn send(
            &self,
            _request: http::Request<Bytes>,
            signal: AbortSignal,
        ) -> BoxFuture<'static, Result<http::Response<Bytes>, TransportFailure>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.signals.lock().unwrap().push(signal.clone());
            Box::pin(async move {
                signal.cancelled().await;
                Err(TransportFailure::Aborted)
            })
        }
    }

    fn stalled_client(backend: Stall) -> HttpClient {
        HttpClient::builder()
            .base_url("http://api.test")
            .dispatcher(Dispatcher::new(TransportCapabilities::host()).with_native_backend(backend))
            .build()
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_rejects_with_timeout_and_aborts_the_backend() {
        let backend = Stall::default();
        let client = stalled_client(backend.clone());

        let mut call = RequestDescriptor::get("/slow");
        call.timeout = Some(Duration::from_millis(50));
        let err = client.request(call).await.unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(err.phase(), Phase::Timeout);
        assert_eq!(err.message(), "network timeout of 50ms");

        let signal = backend.signals.lock().unwrap()[0].clone();
        assert!(signal.aborted());
        assert_eq!(signal.reason().as_deref(), Some("timeout"));
        assert_eq!(client.stats().snapshot().requests_timed_out, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelling_in_flight_rejects_with_cancel() {
        let backend = Stall::default();
        let client = stalled_client(backend.clone());
        let token = CancelToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel_with("user navigated away");
        });

        let mut call = RequestDescriptor::get("/slow");
        call.cancel = Some(token.clone());
        let err = client.request(call).await.unwrap_err();

        assert!(err.is_cancel());
        assert_eq!(err.phase(), Phase::Abort);
        assert_eq!(err.message(), "client aborted: user navigated away");
        assert!(backend.signals.lock().unwrap()[0].aborted());
    }

    #[tokio::test]
    async fn cancelled_token_never_reaches_the_transport() {
        let backend = Stall::default();
        let client = stalled_client(backend.clone());
        let token = CancelToken::new();
        token.cancel();

        let mut call = RequestDescriptor::get("/never");
        call.cancel = Some(token);
        let err = client.request(call).await.unwrap_err();

        assert!(err.is_cancel());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(client.stats().snapshot().requests_cancelled, 1);
    }

    /// Native backend that answers at once and keeps each request's signal.
    #[derive(Clone, Default)]
    struct Quick {
        signals: Arc<Mutex<Vec<AbortSignal>>>,
    }

    impl NativeBackend for Quick {
        fn send(
            &self,
            _request: http::Request<Bytes>,
            signal: AbortSignal,
        ) -> BoxFuture<'static, Result<http::Response<Bytes>, TransportFailure>> {
            self.signals.lock().unwrap().push(signal);
            Box::pin(async { Ok(http::Response::new(Bytes::new())) })
        }
    }

    #[tokio::test]
    async fn settled_requests_detach_from_their_token() {
        let backend = Quick::default();
        let client = HttpClient::builder()
            .base_url("http://api.test")
            .dispatcher(Dispatcher::new(TransportCapabilities::host()).with_native_backend(backend.clone()))
            .build()
            .unwrap();
        let token = CancelToken::new();

        for _ in 0..3 {
            let mut call = RequestDescriptor::get("/");
            call.cancel = Some(token.clone());
            client.request(call).await.unwrap();
        }
        token.cancel();

        let signals = backend.signals.lock().unwrap();
        assert_eq!(signals.len(), 3);
        assert!(signals.iter().all(|signal| !signal.aborted()));
    }

    #[derive(Clone, Default)]
    struct FakeFetch {
        calls: Arc<AtomicUsize>,
    }

    impl FetchBackend for FakeFetch {
        fn fetch(&self, request: WireRequest, _signal: AbortSignal) -> BoxFuture<'static, Result<FetchReply, TransportFailure>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                Ok(FetchReply {
                    status: 200,
                    status_text: "OK".into(),
                    headers: vec![("Content-Type".into(), "text/plain".into())],
                    body: Bytes::from(format!("fetch {}", request.url)),
                })
            })
        }
    }

    #[derive(Clone, Default)]
    struct FakeXhr {
        options: Arc<Mutex<Vec<XhrOptions>>>,
    }

    impl XhrBackend for FakeXhr {
        fn send(
            &self,
            request: WireRequest,
            options: XhrOptions,
            _signal: AbortSignal,
        ) -> BoxFuture<'static, Result<XhrReply, TransportFailure>> {
            if let Some(progress) = &options.on_progress {
                progress(Progress { loaded: 4, total: Some(4) });
            }
            self.options.lock().unwrap().push(options);
            Box::pin(async move {
                Ok(XhrReply {
                    status: 200,
                    status_text: "OK".into(),
                    raw_headers: "content-type: application/json\r\nx-served-by: xhr\r\n".into(),
                    body: Bytes::from(format!(r#"{{"url":"{}"}}"#, request.url)),
                })
            })
        }
    }

    fn browser_client(capabilities: TransportCapabilities, fetch: FakeFetch, xhr: FakeXhr) -> HttpClient {
        let dispatcher = Dispatcher::new(capabilities)
            .with_fetch_backend(fetch)
            .with_xhr_backend(xhr);
        HttpClient::builder().dispatcher(dispatcher).build().unwrap()
    }

    #[tokio::test]
    async fn browser_prefers_fetch() {
        let fetch = FakeFetch::default();
        let client = browser_client(TransportCapabilities::browser(), fetch.clone(), FakeXhr::default());

        let mut call = RequestDescriptor::get("/a");
        call.cancel = Some(CancelToken::new());
        let envelope = client.request(call).await.unwrap();

        assert_eq!(envelope.transport, TransportKind::Fetch);
        assert_eq!(envelope.request.request_mode, Some(RequestMode::Fetch));
        assert_eq!(envelope.response, ResponseBody::Text("fetch /a".into()));
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn xhr_only_features_route_to_xhr() {
        let xhr = FakeXhr::default();
        let client = browser_client(TransportCapabilities::browser(), FakeFetch::default(), xhr.clone());
        let seen = Arc::new(AtomicUsize::new(0));

        let mut call = RequestDescriptor::get("/b");
        call.timeout = Some(Duration::from_secs(5));
        let counter = seen.clone();
        call.on_progress = Some(Arc::new(move |_: Progress| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let envelope = client.request(call).await.unwrap();

        assert_eq!(envelope.transport, TransportKind::Xhr);
        assert_eq!(envelope.headers.get("X-Served-By"), Some("xhr"));
        assert_eq!(envelope.response, ResponseBody::Json(serde_json::json!({"url": "/b"})));
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        let options = xhr.options.lock().unwrap();
        assert_eq!(options[0].timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn legacy_browsers_always_use_xhr() {
        let fetch = FakeFetch::default();
        let client = browser_client(TransportCapabilities::legacy_browser(), fetch.clone(), FakeXhr::default());

        let envelope = client.get("/c").await.unwrap();

        assert_eq!(envelope.transport, TransportKind::Xhr);
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_backend_is_a_network_error() {
        let client = HttpClient::builder()
            .dispatcher(Dispatcher::new(TransportCapabilities::browser()))
            .build()
            .unwrap();

        let err = client.get("/d").await.unwrap_err();
        assert!(err.is_network());
    }
}
