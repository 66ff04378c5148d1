use std::time::Duration;

use http::StatusCode;

use super::types::{Error, Kind, Phase};
use crate::http::headers::HeaderMap;
use crate::http::request::RequestDescriptor;
use crate::http::response::ResponseBody;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Creates a `Cancel` error for an aborted request.
pub fn cancelled(request: &RequestDescriptor, reason: Option<&str>) -> Error {
    let message = match reason {
        Some(reason) => format!("client aborted: {reason}"),
        None => "client aborted".to_string(),
    };
    Error::new(Kind::Cancel, Phase::Abort, message).with_request(request.clone())
}

/// Creates a `Timeout` error for an elapsed deadline.
pub fn timed_out(request: &RequestDescriptor, timeout: Option<Duration>) -> Error {
    let message = match timeout {
        Some(timeout) => format!("network timeout of {}ms", timeout.as_millis()),
        None => "network timeout".to_string(),
    };
    Error::new(Kind::Timeout, Phase::Timeout, message).with_request(request.clone())
}

/// Creates a `Network` error wrapping a transport failure.
pub fn network<E: Into<BoxError>>(request: &RequestDescriptor, e: E) -> Error {
    let source = e.into();
    Error::new(Kind::Network, Phase::Transport, source.to_string())
        .with(source)
        .with_request(request.clone())
}

/// Creates a `Response` error for an out-of-range status.
pub fn status(
    request: &RequestDescriptor,
    status: StatusCode,
    headers: HeaderMap,
    body: ResponseBody,
) -> Error {
    Error::new(
        Kind::Response(status),
        Phase::Response,
        format!("request failed with status {status}"),
    )
    .with_request(request.clone())
    .with_headers(headers)
    .with_body(body)
}

/// Creates a `Decode` error for a body that does not match its response type.
pub fn decode<E: Into<BoxError>>(e: E) -> Error {
    let source = e.into();
    Error::new(Kind::Decode, Phase::Decode, source.to_string()).with(source)
}
