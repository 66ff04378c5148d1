//! Response payload decoding
//!
//! Dispatches on the declared response type. With none declared, a JSON
//! content type selects JSON parsing; anything else is text when it is valid
//! UTF-8 and bytes otherwise. Binary response types are never touched.

use bytes::Bytes;
use serde_json::Value;

use crate::error::{self, Result};
use crate::http::{HeaderMap, ResponseBody, ResponseEnvelope, ResponseType, is_json};

fn raw_bytes(body: ResponseBody) -> Bytes {
    match body {
        ResponseBody::Empty => Bytes::new(),
        ResponseBody::Bytes(bytes) => bytes,
        ResponseBody::Text(text) => Bytes::from(text),
        ResponseBody::Json(value) => Bytes::from(value.to_string()),
    }
}

fn parse_json(bytes: &[u8]) -> Result<ResponseBody> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResponseBody::Empty);
    }
    serde_json::from_slice::<Value>(bytes)
        .map(ResponseBody::Json)
        .map_err(error::decode)
}

fn parse_text(bytes: Bytes) -> Result<ResponseBody> {
    if bytes.is_empty() {
        return Ok(ResponseBody::Empty);
    }
    String::from_utf8(bytes.to_vec())
        .map(ResponseBody::Text)
        .map_err(error::decode)
}

/// Decode a payload against a declared type and the response headers.
pub fn decode_body(body: ResponseBody, response_type: Option<ResponseType>, headers: &HeaderMap) -> Result<ResponseBody> {
    if let ResponseBody::Json(_) = body {
        return Ok(body);
    }
    match response_type {
        Some(kind) if kind.is_binary() => Ok(body),
        Some(ResponseType::Json) => parse_json(&raw_bytes(body)),
        Some(_) => match body {
            ResponseBody::Text(_) | ResponseBody::Empty => Ok(body),
            other => parse_text(raw_bytes(other)),
        },
        None => {
            let bytes = raw_bytes(body);
            if bytes.is_empty() {
                Ok(ResponseBody::Empty)
            } else if is_json(headers.content_type()) {
                parse_json(&bytes)
            } else {
                Ok(parse_text(bytes.clone()).unwrap_or(ResponseBody::Bytes(bytes)))
            }
        }
    }
}

/// Best-effort decode for error bodies: never fails, falls back to the raw
/// payload.
pub fn decode_lossy(body: ResponseBody, headers: &HeaderMap) -> ResponseBody {
    match decode_body(body.clone(), None, headers) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::warn!(error = %err, "undecodable error body, keeping raw payload");
            body
        }
    }
}

/// Response transform stage: decode the envelope payload in place.
pub fn transform_response(mut envelope: ResponseEnvelope, response_type: Option<ResponseType>) -> Result<ResponseEnvelope> {
    let body = std::mem::take(&mut envelope.response);
    match decode_body(body, response_type, &envelope.headers) {
        Ok(decoded) => {
            envelope.response = decoded;
            Ok(envelope)
        }
        Err(err) => Err(err
            .with_request(envelope.request)
            .with_headers(envelope.headers)),
    }
}
