//! Transport-agnostic response envelope

use bytes::Bytes;
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::headers::HeaderMap;
use super::request::RequestDescriptor;
use crate::error::{self, Result};
use crate::transport::TransportKind;

/// Response payload, raw as delivered by a transport or decoded by the
/// response transform.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResponseBody {
    #[default]
    Empty,
    Json(Value),
    Text(String),
    Bytes(Bytes),
}

impl ResponseBody {
    pub fn is_empty(&self) -> bool {
        match self {
            ResponseBody::Empty => true,
            ResponseBody::Text(text) => text.is_empty(),
            ResponseBody::Bytes(bytes) => bytes.is_empty(),
            ResponseBody::Json(_) => false,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            ResponseBody::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Terminal value of every successful pipeline run.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub status: StatusCode,
    pub status_text: String,
    pub headers: HeaderMap,
    pub response: ResponseBody,
    pub request: RequestDescriptor,
    pub transport: TransportKind,
}

impl ResponseEnvelope {
    /// Envelope with an empty body, for custom transports and tests.
    pub fn new(status: StatusCode, request: RequestDescriptor) -> Self {
        ResponseEnvelope {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers: HeaderMap::new(),
            response: ResponseBody::Empty,
            request,
            transport: TransportKind::Custom,
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: ResponseBody) -> Self {
        self.response = body;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the payload into `T`, whatever shape it was decoded to.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        match &self.response {
            ResponseBody::Json(value) => T::deserialize(value).map_err(error::decode),
            ResponseBody::Text(text) => serde_json::from_str(text).map_err(error::decode),
            ResponseBody::Bytes(bytes) => serde_json::from_slice(bytes).map_err(error::decode),
            ResponseBody::Empty => serde_json::from_value(Value::Null).map_err(error::decode),
        }
    }

    /// Payload as text; JSON payloads are re-serialised.
    pub fn text(&self) -> Result<String> {
        match &self.response {
            ResponseBody::Text(text) => Ok(text.clone()),
            ResponseBody::Json(value) => Ok(value.to_string()),
            ResponseBody::Bytes(bytes) => String::from_utf8(bytes.to_vec()).map_err(error::decode),
            ResponseBody::Empty => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Point {
        x: i32,
    }

    #[test]
    fn json_accessor_handles_every_shape() {
        let request = RequestDescriptor::get("/");
        let envelope = ResponseEnvelope::new(StatusCode::OK, request.clone())
            .with_body(ResponseBody::Json(serde_json::json!({"x": 1})));
        assert_eq!(envelope.json::<Point>().ok(), Some(Point { x: 1 }));

        let envelope = ResponseEnvelope::new(StatusCode::OK, request.clone())
            .with_body(ResponseBody::Bytes(Bytes::from_static(b"{\"x\":2}")));
        assert_eq!(envelope.json::<Point>().ok(), Some(Point { x: 2 }));

        let envelope = ResponseEnvelope::new(StatusCode::OK, request)
            .with_body(ResponseBody::Text("not json".into()));
        assert!(envelope.json::<Point>().is_err_and(|e| e.is_decode()));
    }

    #[test]
    fn empty_body_reads_as_empty_text() {
        let envelope = ResponseEnvelope::new(StatusCode::NO_CONTENT, RequestDescriptor::get("/"));
        assert_eq!(envelope.text().ok().as_deref(), Some(""));
        assert!(envelope.response.is_empty());
        assert_eq!(envelope.status_text, "No Content");
    }
}
