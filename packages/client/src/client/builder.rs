//! Fluent construction of an [`HttpClient`]

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use super::core::HttpClient;
use crate::config::{ClientConfig, ConfigResult, Validator};
use crate::error::Result;
use crate::http::{HeaderMap, RequestDescriptor, RequestMode, ResponseEnvelope, ResponseType};
use crate::middleware::{Interceptor, InterceptorEntry};
use crate::transport::{Dispatcher, TransportCapabilities};

/// Builder for [`HttpClient`]; the configuration is frozen by [`build`](Self::build).
#[must_use]
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    dispatcher: Option<Dispatcher>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        ClientBuilder::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.config.headers.set(name, value);
        self
    }

    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        self.config.headers.extend_from(headers);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn interceptor<I: Interceptor + 'static>(self, interceptor: I) -> Self {
        self.interceptor_entry(InterceptorEntry::new(interceptor))
    }

    pub fn interceptor_entry(mut self, entry: InterceptorEntry) -> Self {
        self.config.interceptors.push(entry);
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.config.response_type = Some(response_type);
        self
    }

    pub fn request_mode(mut self, mode: RequestMode) -> Self {
        self.config.request_mode = Some(mode);
        self
    }

    /// Route every call through `request` unless the call brings its own.
    pub fn custom_request<F, Fut>(mut self, request: F) -> Self
    where
        F: Fn(RequestDescriptor) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResponseEnvelope>> + Send + 'static,
    {
        self.config.custom_request = Some(Arc::new(
            move |req: RequestDescriptor| -> BoxFuture<'static, Result<ResponseEnvelope>> { Box::pin(request(req)) },
        ));
        self
    }

    /// Use a dispatcher wired to host backends.
    pub fn dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Shorthand for a backend-less dispatcher with `capabilities`.
    pub fn capabilities(self, capabilities: TransportCapabilities) -> Self {
        self.dispatcher(Dispatcher::new(capabilities))
    }

    /// Validate and freeze the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::config::ConfigError) if the base URL,
    /// timeout or default headers are invalid.
    pub fn build(self) -> ConfigResult<HttpClient> {
        self.config.validate()?;
        tracing::debug!(config = ?self.config, "building client");
        let dispatcher = self.dispatcher.unwrap_or_default();
        Ok(HttpClient::from_parts(self.config, dispatcher))
    }
}
