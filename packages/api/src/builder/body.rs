//! Request payload, query and path parameters
//!
//! Structured payloads are encoded by the pipeline, so `json` and `form`
//! differ only in the content type they declare. A content type the caller
//! already set is kept.

use bytes::Bytes;
use hxs_client::http::content_type;
use hxs_client::transform::serialize;
use hxs_client::{FormData, Query, RequestBody};
use serde::Serialize;

use crate::builder::core::RequestBuilder;

impl RequestBuilder {
    /// Append query entries; nested values flatten into bracket paths.
    ///
    /// Accepts anything serializing to an object, a sequence of key/value
    /// tuples or a literal query string.
    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Self {
        match serde_json::to_value(query) {
            Ok(value) => {
                let next = Query::from_value(value);
                self.request.query = Some(match self.request.query.take() {
                    Some(current) => merge_query(current, next),
                    None => next,
                });
            }
            Err(err) => tracing::warn!(error = %err, "query is not serializable, ignoring"),
        }
        self
    }

    /// Values substituted left to right into `{name}` placeholders.
    pub fn path_params<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.request.path_params = Some(values.into_iter().map(|v| v.to_string()).collect());
        self
    }

    /// JSON body. Serialization failures leave the body unset and are logged.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => {
                self.request.body = Some(RequestBody::Structured(value));
                if !self.request.headers.has(content_type::NAME) {
                    self.request.headers.set(content_type::NAME, content_type::JSON);
                }
            }
            Err(err) => tracing::warn!(error = %err, "json body is not serializable, ignoring"),
        }
        self
    }

    /// Form-urlencoded body.
    pub fn form<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => {
                self.request.body = Some(RequestBody::Structured(value));
                if !self.request.headers.has(content_type::NAME) {
                    self.request.headers.set(content_type::NAME, content_type::FORM);
                }
            }
            Err(err) => tracing::warn!(error = %err, "form body is not serializable, ignoring"),
        }
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.request.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.request.body = Some(RequestBody::Binary(body.into()));
        self
    }

    pub fn multipart(mut self, form: FormData) -> Self {
        self.request.body = Some(RequestBody::Multipart(form));
        self
    }
}

/// Literal query strings are joined textually; keyed entries concatenate in
/// call order.
fn merge_query(current: Query, next: Query) -> Query {
    match (current, next) {
        (current @ Query::Raw(_), next) | (current, next @ Query::Raw(_)) => {
            let joined: Vec<String> = [serialize(&current), serialize(&next)]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect();
            Query::Raw(joined.join("&"))
        }
        (current, next) => {
            let mut pairs = current.into_pairs();
            pairs.extend(next.into_pairs());
            Query::Pairs(pairs)
        }
    }
}
