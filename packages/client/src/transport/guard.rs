//! Cancellation, deadline and status handling shared by every adapter
//!
//! [`settle`] races the transport operation against the request's cancel
//! token and its deadline. Whichever finishes first decides the outcome. The
//! losers are dropped before `settle` returns; dropping the pending
//! `cancelled()` future is what detaches the caller's token from the request.

use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;

use super::{TransportFailure, TransportKind};
use crate::cancel::{AbortController, CancelToken};
use crate::error::{self, Error, Result};
use crate::http::{HeaderMap, RequestDescriptor, ResponseBody, ResponseEnvelope};
use crate::transform::decode_lossy;

/// Normalised reply from a host primitive, before status validation.
#[derive(Debug)]
pub(crate) struct RawReply {
    pub status: StatusCode,
    pub status_text: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub(crate) fn parse_status(status: u16) -> std::result::Result<StatusCode, TransportFailure> {
    StatusCode::from_u16(status).map_err(|_| TransportFailure::network(format!("invalid status code {status}")))
}

pub(crate) fn classify(request: &RequestDescriptor, failure: TransportFailure) -> Error {
    match failure {
        TransportFailure::Aborted => error::cancelled(request, abort_reason(request).as_deref()),
        TransportFailure::TimedOut => error::timed_out(request, request.timeout),
        TransportFailure::Network(message) => error::network(request, message),
    }
}

fn abort_reason(request: &RequestDescriptor) -> Option<String> {
    request.cancel.as_ref().and_then(|token| token.signal().reason())
}

async fn deadline(timeout: Option<Duration>) {
    match timeout {
        Some(timeout) => tokio::time::sleep(timeout).await,
        None => std::future::pending::<()>().await,
    }
}

/// Run `operation` under the request's cancel token and deadline.
///
/// A cancel on the caller's token aborts `controller`, the per-request native
/// abort primitive handed to the host backend, with the same reason.
pub(crate) async fn settle<T, F>(request: &RequestDescriptor, controller: &AbortController, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if request.is_cancelled() {
        return Err(error::cancelled(request, abort_reason(request).as_deref()));
    }

    let user = request.cancel.as_ref().map(CancelToken::signal);
    let user_cancelled = async {
        match &user {
            Some(signal) => signal.cancelled().await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        () = user_cancelled => {
            let reason = abort_reason(request);
            tracing::debug!(url = %request.url, reason = ?reason, "request aborted");
            match &reason {
                Some(reason) => controller.abort_with(reason.clone()),
                None => controller.abort(),
            };
            Err(error::cancelled(request, reason.as_deref()))
        }
        () = deadline(request.timeout) => {
            tracing::debug!(url = %request.url, timeout = ?request.timeout, "request deadline elapsed");
            controller.abort_with("timeout");
            Err(error::timed_out(request, request.timeout))
        }
        outcome = operation => outcome,
    }
}

/// Apply the status validator: 2xx resolves, anything else rejects with the
/// best-effort decoded body.
pub(crate) fn into_envelope(request: RequestDescriptor, reply: RawReply, kind: TransportKind) -> Result<ResponseEnvelope> {
    if !reply.status.is_success() {
        let body = decode_lossy(ResponseBody::Bytes(reply.body), &reply.headers);
        return Err(error::status(&request, reply.status, reply.headers, body));
    }

    let response = if reply.body.is_empty() {
        ResponseBody::Empty
    } else {
        ResponseBody::Bytes(reply.body)
    };
    Ok(ResponseEnvelope {
        status: reply.status,
        status_text: reply.status_text,
        headers: reply.headers,
        response,
        request,
        transport: kind,
    })
}

/// Status validation for envelopes built outside the adapters.
pub(crate) fn validate_envelope(mut envelope: ResponseEnvelope) -> Result<ResponseEnvelope> {
    if envelope.status.is_success() {
        return Ok(envelope);
    }
    let body = decode_lossy(std::mem::take(&mut envelope.response), &envelope.headers);
    Err(error::status(&envelope.request, envelope.status, envelope.headers, body))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn reply(status: u16, body: &'static [u8]) -> RawReply {
        RawReply {
            status: StatusCode::from_u16(status).unwrap(),
            status_text: String::new(),
            headers: HeaderMap::json(),
            body: Bytes::from_static(body),
        }
    }

    #[test]
    fn validator_splits_on_2xx() {
        let ok = into_envelope(RequestDescriptor::get("/"), reply(204, b""), TransportKind::Fetch).unwrap();
        assert_eq!(ok.response, ResponseBody::Empty);
        assert_eq!(ok.transport, TransportKind::Fetch);

        let err = into_envelope(RequestDescriptor::get("/"), reply(404, b"{\"e\":1}"), TransportKind::Xhr).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.body(), Some(&ResponseBody::Json(serde_json::json!({"e": 1}))));
    }

    #[tokio::test]
    async fn deadline_wins_over_slow_operation() {
        let mut request = RequestDescriptor::get("/slow");
        request.timeout = Some(Duration::from_millis(10));
        let controller = AbortController::new();
        let result: Result<()> = settle(&request, &controller, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert!(result.unwrap_err().is_timeout());
        assert!(controller.signal().aborted());
    }

    #[tokio::test]
    async fn cancel_aborts_the_request_controller() {
        let token = CancelToken::new();
        let mut request = RequestDescriptor::get("/");
        request.cancel = Some(token.clone());
        let controller = AbortController::new();

        let canceller = token.clone();
        let result: Result<()> = settle(&request, &controller, async move {
            canceller.cancel_with("user left");
            std::future::pending::<Result<()>>().await
        })
        .await;

        let err = result.unwrap_err();
        assert!(err.is_cancel());
        assert!(controller.signal().aborted());
        assert_eq!(controller.signal().reason().as_deref(), Some("user left"));
    }

    #[tokio::test]
    async fn settled_request_ignores_later_cancel() {
        let token = CancelToken::new();
        let mut request = RequestDescriptor::get("/");
        request.cancel = Some(token.clone());
        let controller = AbortController::new();

        let value = settle(&request, &controller, async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);

        token.cancel();
        assert!(!controller.signal().aborted());
    }

    #[tokio::test]
    async fn cancelled_before_start_skips_the_operation() {
        let token = CancelToken::new();
        token.cancel();
        let mut request = RequestDescriptor::get("/");
        request.cancel = Some(token);
        let controller = AbortController::new();

        let result: Result<()> = settle(&request, &controller, async { Ok(()) }).await;
        assert!(result.unwrap_err().is_cancel());
    }
}
