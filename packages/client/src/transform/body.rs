//! Request body encoding with content negotiation
//!
//! Structured bodies become JSON when the request's content type selects JSON
//! (or names none), otherwise a form-urlencoded string. Text and binary pass
//! through. Multipart bodies have their content type removed so the transport
//! can emit one carrying its own boundary. A caller-supplied content type is
//! never overridden.
//!
//! Form bodies use strict `application/x-www-form-urlencoded` escaping; the
//! readable characters kept by the query encoder are escaped here.

use serde_json::Value;
use url::form_urlencoded;

use super::query::flatten_pairs;
use crate::http::{RequestBody, RequestDescriptor, content_type, is_json};

/// Form-urlencode a structured value, flattening nested keys the way queries
/// do. Scalars at the top level have no key and encode to nothing.
#[must_use]
pub fn form_encode(value: &Value) -> String {
    let pairs = match value {
        Value::Object(map) => flatten_pairs(map.iter().map(|(k, v)| (k.as_str(), v))),
        Value::Array(items) => {
            let keys: Vec<String> = (0..items.len()).map(|i| i.to_string()).collect();
            flatten_pairs(keys.iter().map(String::as_str).zip(items.iter()))
        }
        _ => return String::new(),
    };
    encode_params(&pairs)
}

fn encode_params(params: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

/// Encode `request.body` in place and settle its content type.
pub fn encode_body(request: &mut RequestDescriptor) {
    let Some(body) = request.body.take() else {
        return;
    };

    let declared = request.headers.content_type().map(str::to_string);
    let (encoded, default_type) = match body {
        RequestBody::Structured(value) => {
            if declared.is_none() || is_json(declared.as_deref()) {
                (RequestBody::Text(value.to_string()), Some(content_type::JSON))
            } else {
                (RequestBody::Text(form_encode(&value)), Some(content_type::FORM))
            }
        }
        RequestBody::Params(params) => (RequestBody::Text(encode_params(&params)), Some(content_type::FORM)),
        RequestBody::Text(text) => (RequestBody::Text(text), Some(content_type::TEXT)),
        RequestBody::Binary(bytes) => (RequestBody::Binary(bytes), None),
        RequestBody::Multipart(form) => {
            request.headers.delete(content_type::NAME);
            request.body = Some(RequestBody::Multipart(form));
            return;
        }
    };

    if declared.is_none()
        && let Some(default_type) = default_type
    {
        request.headers.set(content_type::NAME, default_type);
    }
    request.body = Some(encoded);
}
