//! Request/response interceptors
//!
//! An interceptor receives the request and a single-use [`Next`] continuation.
//! It may rewrite the request before calling [`Next::run`], rewrite the
//! envelope after it resolves, or short-circuit by returning without calling
//! it at all. `Next` is consumed by `run`, so a downstream continuation can
//! never be invoked twice.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::Result;
use crate::http::{RequestDescriptor, ResponseEnvelope};

pub mod compose;

pub use compose::{Composed, Next, Terminal, compose};

/// HTTP interceptor trait for hxs
pub trait Interceptor: Send + Sync {
    fn handle(&self, request: RequestDescriptor, next: Next) -> BoxFuture<'static, Result<ResponseEnvelope>>;
}

impl<F, Fut> Interceptor for F
where
    F: Fn(RequestDescriptor, Next) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ResponseEnvelope>> + Send + 'static,
{
    fn handle(&self, request: RequestDescriptor, next: Next) -> BoxFuture<'static, Result<ResponseEnvelope>> {
        Box::pin(self(request, next))
    }
}

/// One slot of a request's interceptor field.
///
/// Groups nest arbitrarily and `Disabled` slots are skipped, so callers can
/// splice optional or pre-assembled stacks in without rebuilding the list.
#[derive(Clone)]
pub enum InterceptorEntry {
    Single(Arc<dyn Interceptor>),
    Nested(Vec<InterceptorEntry>),
    Disabled,
}

impl InterceptorEntry {
    pub fn new<I: Interceptor + 'static>(interceptor: I) -> Self {
        InterceptorEntry::Single(Arc::new(interceptor))
    }

    pub fn nested(entries: impl IntoIterator<Item = InterceptorEntry>) -> Self {
        InterceptorEntry::Nested(entries.into_iter().collect())
    }

    pub fn optional<I: Interceptor + 'static>(interceptor: Option<I>) -> Self {
        interceptor.map_or(InterceptorEntry::Disabled, InterceptorEntry::new)
    }

    fn collect_into(&self, out: &mut Vec<Arc<dyn Interceptor>>) {
        match self {
            InterceptorEntry::Single(interceptor) => out.push(Arc::clone(interceptor)),
            InterceptorEntry::Nested(entries) => {
                for entry in entries {
                    entry.collect_into(out);
                }
            }
            InterceptorEntry::Disabled => {}
        }
    }
}

impl From<Arc<dyn Interceptor>> for InterceptorEntry {
    fn from(interceptor: Arc<dyn Interceptor>) -> Self {
        InterceptorEntry::Single(interceptor)
    }
}

impl fmt::Debug for InterceptorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterceptorEntry::Single(_) => f.write_str("Single(..)"),
            InterceptorEntry::Nested(entries) => f.debug_tuple("Nested").field(entries).finish(),
            InterceptorEntry::Disabled => f.write_str("Disabled"),
        }
    }
}

/// Collapse nested groups and drop disabled slots, preserving declared order.
pub fn flatten(entries: &[InterceptorEntry]) -> Vec<Arc<dyn Interceptor>> {
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        entry.collect_into(&mut out);
    }
    out
}
