//! Request descriptor threaded through the pipeline
//!
//! A fresh descriptor is materialised for each call. Interceptors receive it by
//! value, may rewrite any field and hand it on to `Next::run`; the final
//! version travels back inside the response envelope (or the error).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::future::BoxFuture;
use http::Method;
use serde_json::{Map, Value};

use super::headers::HeaderMap;
use super::multipart::FormData;
use super::response::ResponseEnvelope;
use crate::cancel::CancelToken;
use crate::error::Result;
use crate::middleware::InterceptorEntry;
use crate::transport::Transport;
use crate::transport::custom::CustomTransport;

/// Structured query input.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Literal query string, with or without a leading `?`
    Raw(String),
    /// Keyed container; nested objects and arrays flatten into bracket paths
    Structured(Map<String, Value>),
    /// Ordered key/value sequence
    Pairs(Vec<(String, Value)>),
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Query::Raw(raw.to_string())
    }
}

impl From<String> for Query {
    fn from(raw: String) -> Self {
        Query::Raw(raw)
    }
}

impl From<Map<String, Value>> for Query {
    fn from(map: Map<String, Value>) -> Self {
        Query::Structured(map)
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for Query {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Query::Pairs(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Query {
    /// Objects become `Structured`, strings `Raw` and arrays of
    /// `[key, value]` pairs `Pairs`. Anything else is an empty pair list.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Query::Structured(map),
            Value::String(raw) => Query::Raw(raw),
            Value::Array(items) => Query::Pairs(items.into_iter().filter_map(pair_entry).collect()),
            _ => Query::Pairs(Vec::new()),
        }
    }

    /// Key/value entries in order; `Raw` queries have none.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, Value)> {
        match self {
            Query::Raw(_) => Vec::new(),
            Query::Structured(map) => map.into_iter().collect(),
            Query::Pairs(pairs) => pairs,
        }
    }
}

fn pair_entry(item: Value) -> Option<(String, Value)> {
    let Value::Array(mut pair) = item else {
        return None;
    };
    if pair.len() != 2 {
        return None;
    }
    let value = pair.pop()?;
    match pair.pop()? {
        Value::String(key) => Some((key, value)),
        _ => None,
    }
}

/// Request payload before and after body encoding.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Plain object or array; JSON or form encoded by content negotiation
    Structured(Value),
    /// Query-params-like sequence; always form encoded
    Params(Vec<(String, String)>),
    Text(String),
    Binary(Bytes),
    /// Multipart container; the transport picks the boundary
    Multipart(FormData),
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => RequestBody::Text(text),
            other => RequestBody::Structured(other),
        }
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        RequestBody::Binary(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Binary(Bytes::from(bytes))
    }
}

impl From<FormData> for RequestBody {
    fn from(form: FormData) -> Self {
        RequestBody::Multipart(form)
    }
}

/// Declared shape of the response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    Json,
    Text,
    Blob,
    Stream,
    Buffer,
    ArrayBuffer,
    U8Array,
}

impl ResponseType {
    /// Binary shapes are handed back untouched.
    #[must_use]
    pub fn is_binary(self) -> bool {
        !matches!(self, ResponseType::Json | ResponseType::Text)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseType::Json => "json",
            ResponseType::Text => "text",
            ResponseType::Blob => "blob",
            ResponseType::Stream => "stream",
            ResponseType::Buffer => "buffer",
            ResponseType::ArrayBuffer => "arraybuffer",
            ResponseType::U8Array => "u8array",
        }
    }
}

impl FromStr for ResponseType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseType::Json),
            "text" | "utf8" => Ok(ResponseType::Text),
            "blob" => Ok(ResponseType::Blob),
            "stream" => Ok(ResponseType::Stream),
            "buffer" => Ok(ResponseType::Buffer),
            "arraybuffer" => Ok(ResponseType::ArrayBuffer),
            "u8array" => Ok(ResponseType::U8Array),
            other => Err(format!("unsupported response type: {other}")),
        }
    }
}

/// Browser transport preference. `Xhr` is the explicit legacy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Fetch,
    Xhr,
}

/// Request-level auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Transfer progress reported by transports that support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub loaded: u64,
    pub total: Option<u64>,
}

pub type ProgressHandler = Arc<dyn Fn(Progress) + Send + Sync>;

/// Everything the pipeline needs to run one request.
#[derive(Clone)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    pub headers: HeaderMap,
    pub query: Option<Query>,
    /// Ordered values for `{name}` placeholders in `url`
    pub path_params: Option<Vec<String>>,
    pub body: Option<RequestBody>,
    pub response_type: Option<ResponseType>,
    pub request_mode: Option<RequestMode>,
    pub timeout: Option<Duration>,
    pub cancel: Option<CancelToken>,
    pub interceptors: Vec<InterceptorEntry>,
    pub custom_transport: Option<Arc<dyn Transport>>,
    pub auth: Option<Credentials>,
    pub with_credentials: Option<bool>,
    pub on_progress: Option<ProgressHandler>,
    pub on_upload_progress: Option<ProgressHandler>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        RequestDescriptor {
            url: url.into(),
            method,
            headers: HeaderMap::new(),
            query: None,
            path_params: None,
            body: None,
            response_type: None,
            request_mode: None,
            timeout: None,
            cancel: None,
            interceptors: Vec::new(),
            custom_transport: None,
            auth: None,
            with_credentials: None,
            on_progress: None,
            on_upload_progress: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Route this request through a caller-supplied transport function.
    pub fn set_custom_request<F, Fut>(&mut self, request: F)
    where
        F: Fn(RequestDescriptor) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResponseEnvelope>> + Send + 'static,
    {
        let request = Arc::new(move |req: RequestDescriptor| -> BoxFuture<'static, Result<ResponseEnvelope>> {
            Box::pin(request(req))
        });
        self.custom_transport = Some(Arc::new(CustomTransport::new(request)));
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    pub(crate) fn wants_progress(&self) -> bool {
        self.on_progress.is_some() || self.on_upload_progress.is_some()
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("path_params", &self.path_params)
            .field("body", &self.body)
            .field("response_type", &self.response_type)
            .field("request_mode", &self.request_mode)
            .field("timeout", &self.timeout)
            .field("cancelled", &self.is_cancelled())
            .field("interceptors", &self.interceptors.len())
            .field("custom_transport", &self.custom_transport.is_some())
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}
