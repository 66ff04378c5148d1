//! Request options and terminal methods

use std::time::Duration;

use hxs_client::http::Credentials;
use hxs_client::{
    CancelToken, Interceptor, InterceptorEntry, Progress, RequestDescriptor, RequestMode, ResponseEnvelope, ResponseType,
    Result,
};
use serde::de::DeserializeOwned;

use crate::builder::core::RequestBuilder;

impl RequestBuilder {
    /// Deadline for the whole transport exchange.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.request.cancel = Some(token);
        self
    }

    /// Call-specific interceptor; runs after the client's own interceptors.
    pub fn interceptor<I: Interceptor + 'static>(self, interceptor: I) -> Self {
        self.interceptor_entry(InterceptorEntry::new(interceptor))
    }

    pub fn interceptor_entry(mut self, entry: InterceptorEntry) -> Self {
        self.request.interceptors.push(entry);
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.request.response_type = Some(response_type);
        self
    }

    pub fn request_mode(mut self, mode: RequestMode) -> Self {
        self.request.request_mode = Some(mode);
        self
    }

    /// Request-level credentials, applied by the transport.
    pub fn basic_auth(mut self, username: impl Into<String>, password: Option<&str>) -> Self {
        self.request.auth = Some(Credentials {
            username: username.into(),
            password: password.map(str::to_string),
        });
        self
    }

    pub fn with_credentials(mut self, enabled: bool) -> Self {
        self.request.with_credentials = Some(enabled);
        self
    }

    pub fn on_progress<F>(mut self, handler: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.request.on_progress = Some(std::sync::Arc::new(handler));
        self
    }

    pub fn on_upload_progress<F>(mut self, handler: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.request.on_upload_progress = Some(std::sync::Arc::new(handler));
        self
    }

    /// Bypass the dispatcher and answer this call with `request`.
    pub fn custom_request<F, Fut>(mut self, request: F) -> Self
    where
        F: Fn(RequestDescriptor) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResponseEnvelope>> + Send + 'static,
    {
        self.request.set_custom_request(request);
        self
    }

    /// Send the request through the client.
    ///
    /// # Errors
    ///
    /// Rejects with the pipeline's typed error: `Cancel`, `Timeout`,
    /// `Network`, `Response` for non-2xx statuses, or `Decode`.
    pub async fn send(self) -> Result<ResponseEnvelope> {
        let RequestBuilder { client, request } = self;
        client.request(request).await
    }

    /// Send and deserialize a JSON response body.
    ///
    /// # Errors
    ///
    /// As [`send`](Self::send), plus `Decode` when the body does not match `T`.
    pub async fn send_json<T: DeserializeOwned>(self) -> Result<T> {
        self.response_type(ResponseType::Json).send().await?.json()
    }

    /// Send and return the response body as text.
    ///
    /// # Errors
    ///
    /// As [`send`](Self::send).
    pub async fn send_text(self) -> Result<String> {
        self.response_type(ResponseType::Text).send().await?.text()
    }
}
