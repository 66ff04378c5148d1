//! hxs prelude
//!
//! The types most callers touch: the client, the request/response model,
//! cancellation, interceptors and the batch/retry helpers.

// Request/response model
pub use crate::http::{
    Credentials, FormData, HeaderMap, Part, Progress, Query, RequestBody, RequestDescriptor, RequestMode,
    ResponseBody, ResponseEnvelope, ResponseType,
};

// Error types
pub use crate::error::{Error, Kind, Phase, Result};

// Client and configuration
pub use crate::client::{ClientBuilder, ClientStats, ClientStatsSnapshot, HttpClient};
pub use crate::config::{ClientConfig, ConfigError};

// Cancellation
pub use crate::cancel::{AbortController, AbortSignal, CancelToken};

// Middleware
pub use crate::middleware::{Interceptor, InterceptorEntry, Next, compose};

// Transports
pub use crate::transport::{Dispatcher, Transport, TransportCapabilities, TransportFailure, TransportKind};

// Pipeline and helpers
pub use crate::concurrent::{Ordered, concurrent, concurrent_with};
pub use crate::pipeline::execute;
pub use crate::retry::{RetryPolicy, retry};

// HTTP standard types from http crate
pub use ::http::{Method, StatusCode};
