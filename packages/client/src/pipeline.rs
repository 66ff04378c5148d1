//! Pipeline entry point
//!
//! `execute` composes the request's interceptors around the terminal stage.
//! The terminal stage runs strictly in order: URL resolution (templating and
//! query), header materialisation, body encoding, transport dispatch and the
//! response transform.

use std::sync::Arc;

use crate::error::{self, Result};
use crate::http::{RequestDescriptor, ResponseEnvelope};
use crate::middleware::{compose, flatten};
use crate::transform::{encode_body, resolve_url, transform_response};
use crate::transport::Dispatcher;

/// Run one request through its interceptors and a transport.
pub async fn execute(dispatcher: &Arc<Dispatcher>, request: RequestDescriptor) -> Result<ResponseEnvelope> {
    let chain = compose(flatten(&request.interceptors));
    tracing::trace!(interceptors = chain.len(), method = %request.method, url = %request.url, "executing request");

    let dispatcher = Arc::clone(dispatcher);
    chain
        .call(request, move |request: RequestDescriptor| {
            let dispatcher = Arc::clone(&dispatcher);
            async move { terminal(&dispatcher, request).await }
        })
        .await
}

async fn terminal(dispatcher: &Dispatcher, mut request: RequestDescriptor) -> Result<ResponseEnvelope> {
    if request.is_cancelled() {
        let reason = request.cancel.as_ref().and_then(|token| token.signal().reason());
        return Err(error::cancelled(&request, reason.as_deref()));
    }

    request.url = resolve_url(&request);
    request.query = None;
    request.path_params = None;
    tracing::trace!(url = %request.url, "resolved url");

    tracing::trace!(headers = request.headers.len(), "materialised headers");

    if request.body.is_some() {
        encode_body(&mut request);
        tracing::trace!(content_type = ?request.headers.content_type(), "encoded body");
    }

    let transport = dispatcher.select(&mut request)?;
    let response_type = request.response_type;
    let envelope = transport.send(request).await?;
    tracing::trace!(status = %envelope.status, transport = %envelope.transport, "transport settled");

    transform_response(envelope, response_type)
}
