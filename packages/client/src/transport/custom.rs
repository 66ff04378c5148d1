use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::guard;
use super::{Transport, TransportKind};
use crate::cancel::AbortController;
use crate::error::Result;
use crate::http::{RequestDescriptor, ResponseEnvelope};

/// Caller-supplied request function.
pub type CustomRequest = Arc<dyn Fn(RequestDescriptor) -> BoxFuture<'static, Result<ResponseEnvelope>> + Send + Sync>;

/// Wraps a custom request function with the same cancel, deadline and status
/// handling as the built-in transports.
#[derive(Clone)]
pub struct CustomTransport {
    request: CustomRequest,
}

impl CustomTransport {
    pub fn new(request: CustomRequest) -> Self {
        CustomTransport { request }
    }
}

impl fmt::Debug for CustomTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomTransport")
    }
}

impl Transport for CustomTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Custom
    }

    fn send(&self, request: RequestDescriptor) -> BoxFuture<'static, Result<ResponseEnvelope>> {
        let call = self.request.clone();
        Box::pin(async move {
            let controller = AbortController::new();
            let in_flight = call(request.clone());
            let mut envelope = guard::settle(&request, &controller, in_flight).await?;
            envelope.transport = TransportKind::Custom;
            guard::validate_envelope(envelope)
        })
    }
}
