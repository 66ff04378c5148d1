//! Instance client with a fixed method table

use std::sync::Arc;

use http::Method;

use super::builder::ClientBuilder;
use super::stats::ClientStats;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{RequestBody, RequestDescriptor, ResponseEnvelope};
use crate::middleware::InterceptorEntry;
use crate::pipeline;
use crate::transport::Dispatcher;

/// Holds the caller's interceptor list while the merged list runs, and puts it
/// back on the descriptor that leaves the client, whichever way the call ends.
struct InterceptorScope {
    call: Vec<InterceptorEntry>,
}

impl InterceptorScope {
    fn enter(call: &RequestDescriptor) -> Self {
        InterceptorScope { call: call.interceptors.clone() }
    }

    fn exit(self, outcome: Result<ResponseEnvelope>) -> Result<ResponseEnvelope> {
        match outcome {
            Ok(mut envelope) => {
                envelope.request.interceptors = self.call;
                Ok(envelope)
            }
            Err(mut err) => {
                if let Some(request) = err.request_mut() {
                    request.interceptors = self.call;
                }
                Err(err)
            }
        }
    }
}

/// HTTP client instance.
///
/// Defaults live in an immutable [`ClientConfig`] snapshot shared by clones;
/// every call works on its own overlay of it.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: Arc<ClientConfig>,
    dispatcher: Arc<Dispatcher>,
    stats: Arc<ClientStats>,
}

impl Default for HttpClient {
    fn default() -> Self {
        HttpClient::from_parts(ClientConfig::default(), Dispatcher::default())
    }
}

impl HttpClient {
    /// Client with no defaults over the host-native transport.
    #[must_use]
    pub fn new() -> Self {
        HttpClient::default()
    }

    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn from_parts(config: ClientConfig, dispatcher: Dispatcher) -> Self {
        HttpClient {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            stats: Arc::new(ClientStats::new()),
        }
    }

    #[inline]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[inline]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    #[inline]
    pub fn stats(&self) -> Arc<ClientStats> {
        self.stats.clone()
    }

    /// Run `call` on top of this instance's defaults.
    pub async fn request(&self, call: RequestDescriptor) -> Result<ResponseEnvelope> {
        self.stats.record_request();
        let scope = InterceptorScope::enter(&call);
        let request = self.config.overlay(call);
        let outcome = scope.exit(pipeline::execute(&self.dispatcher, request).await);

        match &outcome {
            Ok(_) => self.stats.record_success(),
            Err(err) => {
                tracing::debug!(kind = err.kind().as_str(), phase = err.phase().as_str(), error = %err, "request failed");
                self.stats.record_failure(err);
            }
        }
        outcome
    }

    async fn bodiless(&self, method: Method, url: impl Into<String>) -> Result<ResponseEnvelope> {
        self.request(RequestDescriptor::new(method, url)).await
    }

    async fn with_body(&self, method: Method, url: impl Into<String>, body: RequestBody) -> Result<ResponseEnvelope> {
        let mut call = RequestDescriptor::new(method, url);
        call.body = Some(body);
        self.request(call).await
    }

    pub async fn get(&self, url: impl Into<String>) -> Result<ResponseEnvelope> {
        self.bodiless(Method::GET, url).await
    }

    pub async fn delete(&self, url: impl Into<String>) -> Result<ResponseEnvelope> {
        self.bodiless(Method::DELETE, url).await
    }

    pub async fn head(&self, url: impl Into<String>) -> Result<ResponseEnvelope> {
        self.bodiless(Method::HEAD, url).await
    }

    pub async fn options(&self, url: impl Into<String>) -> Result<ResponseEnvelope> {
        self.bodiless(Method::OPTIONS, url).await
    }

    pub async fn post(&self, url: impl Into<String>, body: impl Into<RequestBody>) -> Result<ResponseEnvelope> {
        self.with_body(Method::POST, url, body.into()).await
    }

    pub async fn put(&self, url: impl Into<String>, body: impl Into<RequestBody>) -> Result<ResponseEnvelope> {
        self.with_body(Method::PUT, url, body.into()).await
    }

    pub async fn patch(&self, url: impl Into<String>, body: impl Into<RequestBody>) -> Result<ResponseEnvelope> {
        self.with_body(Method::PATCH, url, body.into()).await
    }
}
