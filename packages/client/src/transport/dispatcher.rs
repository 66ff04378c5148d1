//! Per-request transport selection

use std::fmt;
use std::sync::Arc;

use super::{
    FetchBackend, FetchTransport, HyperBackend, NativeBackend, NativeTransport, Transport, TransportCapabilities,
    TransportKind, XhrBackend, XhrTransport,
};
use crate::error::{self, Result};
use crate::http::{RequestDescriptor, RequestMode};

/// Picks a transport for each request.
///
/// Priority is custom, then native on non-browser hosts, then XHR when the
/// request needs something only XHR offers, then fetch.
#[derive(Clone)]
pub struct Dispatcher {
    capabilities: TransportCapabilities,
    native: Option<Arc<dyn Transport>>,
    xhr: Option<Arc<dyn Transport>>,
    fetch: Option<Arc<dyn Transport>>,
}

impl Dispatcher {
    /// Dispatcher with no backends; attach them with the `with_*` methods.
    #[must_use]
    pub fn new(capabilities: TransportCapabilities) -> Self {
        Dispatcher {
            capabilities,
            native: None,
            xhr: None,
            fetch: None,
        }
    }

    /// Host dispatcher over a hyper client.
    #[must_use]
    pub fn hyper() -> Self {
        Dispatcher::new(TransportCapabilities::host()).with_native_backend(HyperBackend::new())
    }

    #[must_use]
    pub fn with_native_backend<B: NativeBackend + 'static>(mut self, backend: B) -> Self {
        self.native = Some(Arc::new(NativeTransport::new(backend)));
        self
    }

    #[must_use]
    pub fn with_xhr_backend<B: XhrBackend + 'static>(mut self, backend: B) -> Self {
        self.xhr = Some(Arc::new(XhrTransport::new(backend)));
        self
    }

    #[must_use]
    pub fn with_fetch_backend<B: FetchBackend + 'static>(mut self, backend: B) -> Self {
        self.fetch = Some(Arc::new(FetchTransport::new(backend)));
        self
    }

    pub fn capabilities(&self) -> TransportCapabilities {
        self.capabilities
    }

    fn needs_xhr(&self, request: &RequestDescriptor) -> bool {
        request.request_mode == Some(RequestMode::Xhr)
            || !self.capabilities.fetch
            || (request.cancel.is_some() && !self.capabilities.abort_controller)
            || request.wants_progress()
            || request.timeout.is_some()
            || request.auth.is_some()
    }

    /// Transport kind this request would be routed to.
    pub fn select_kind(&self, request: &RequestDescriptor) -> TransportKind {
        if request.custom_transport.is_some() {
            TransportKind::Custom
        } else if !self.capabilities.browser_like {
            TransportKind::Native
        } else if self.needs_xhr(request) {
            TransportKind::Xhr
        } else {
            TransportKind::Fetch
        }
    }

    /// Resolve the transport for `request`, recording the browser mode picked.
    pub fn select(&self, request: &mut RequestDescriptor) -> Result<Arc<dyn Transport>> {
        let kind = self.select_kind(request);
        tracing::debug!(transport = %kind, method = %request.method, url = %request.url, "selected transport");

        let transport = match kind {
            TransportKind::Custom => request.custom_transport.clone(),
            TransportKind::Native => self.native.clone(),
            TransportKind::Xhr => {
                request.request_mode = Some(RequestMode::Xhr);
                self.xhr.clone()
            }
            TransportKind::Fetch => {
                request.request_mode = Some(RequestMode::Fetch);
                self.fetch.clone()
            }
        };
        transport.ok_or_else(|| error::network(request, format!("no {kind} transport available on this host")))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Dispatcher::hyper()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("capabilities", &self.capabilities)
            .field("native", &self.native.is_some())
            .field("xhr", &self.xhr.is_some())
            .field("fetch", &self.fetch.is_some())
            .finish()
    }
}
