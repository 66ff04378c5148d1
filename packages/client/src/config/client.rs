//! Instance defaults and the per-call overlay
//!
//! A [`ClientConfig`] is frozen once the client is built. Each call copies the
//! pieces it needs into its own descriptor; the shared snapshot is never
//! written to.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::validation::{ConfigError, ConfigResult, ConfigValidator, Validator};
use crate::http::{HeaderMap, RequestDescriptor, RequestMode, ResponseType};
use crate::middleware::InterceptorEntry;
use crate::transform::is_absolute_url;
use crate::transport::{CustomRequest, CustomTransport};

/// Defaults applied to every call made through an instance.
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub headers: HeaderMap,
    pub timeout: Option<Duration>,
    pub interceptors: Vec<InterceptorEntry>,
    pub response_type: Option<ResponseType>,
    pub request_mode: Option<RequestMode>,
    pub custom_request: Option<CustomRequest>,
}

/// Join a base URL and a call URL with exactly one `/`. Absolute call URLs
/// bypass the base.
#[must_use]
pub fn join_url(base: Option<&str>, url: &str) -> String {
    match base {
        Some(base) if !is_absolute_url(url) => {
            let base = base.trim_end_matches(['?', '/']);
            let path = url.trim_start_matches('/');
            if path.is_empty() {
                base.to_string()
            } else {
                format!("{base}/{path}")
            }
        }
        _ => url.to_string(),
    }
}

impl ClientConfig {
    /// Build the private descriptor for one call.
    ///
    /// Call headers override instance headers per name. Interceptors run
    /// instance entries first, then call entries, each in declared order.
    /// Every other call setting wins over its instance default.
    #[must_use]
    pub fn overlay(&self, mut call: RequestDescriptor) -> RequestDescriptor {
        call.url = join_url(self.base_url.as_deref(), &call.url);

        let mut headers = self.headers.clone();
        headers.extend_from(&call.headers);
        call.headers = headers;

        let mut interceptors = self.interceptors.clone();
        interceptors.append(&mut call.interceptors);
        call.interceptors = interceptors;

        call.timeout = call.timeout.or(self.timeout);
        call.response_type = call.response_type.or(self.response_type);
        call.request_mode = call.request_mode.or(self.request_mode);
        if call.custom_transport.is_none()
            && let Some(request) = &self.custom_request
        {
            call.custom_transport = Some(Arc::new(CustomTransport::new(request.clone())));
        }
        call
    }
}

impl Validator for ClientConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(base) = &self.base_url {
            ConfigValidator::validate_base_url(base)?;
        }
        if let Some(timeout) = self.timeout {
            ConfigValidator::validate_timeout(timeout, "timeout")?;
        }
        self.headers
            .to_http()
            .map(drop)
            .map_err(|e| ConfigError::InvalidHeader(e.to_string()))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .field("interceptors", &self.interceptors.len())
            .field("response_type", &self.response_type)
            .field("request_mode", &self.request_mode)
            .field("custom_request", &self.custom_request.is_some())
            .finish()
    }
}
