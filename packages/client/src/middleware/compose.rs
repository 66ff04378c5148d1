//! Onion-model interceptor composition
//!
//! The interceptor at index `i` runs its pre-`next` logic before index `i + 1`
//! and its post-`next` logic after index `i + 1`'s entire subtree resolves.
//! The innermost continuation is always the terminal stage.

use std::sync::Arc;

use futures::future::BoxFuture;

use super::Interceptor;
use crate::error::Result;
use crate::http::{RequestDescriptor, ResponseEnvelope};

/// Innermost stage of a composed chain.
pub trait Terminal: Send + Sync {
    fn call(&self, request: RequestDescriptor) -> BoxFuture<'static, Result<ResponseEnvelope>>;
}

impl<F, Fut> Terminal for F
where
    F: Fn(RequestDescriptor) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ResponseEnvelope>> + Send + 'static,
{
    fn call(&self, request: RequestDescriptor) -> BoxFuture<'static, Result<ResponseEnvelope>> {
        Box::pin(self(request))
    }
}

/// Single-use continuation handed to each interceptor.
pub struct Next {
    chain: Arc<[Arc<dyn Interceptor>]>,
    index: usize,
    terminal: Arc<dyn Terminal>,
}

impl Next {
    /// Continue the chain with `request`. Consumes the continuation.
    pub fn run(self, request: RequestDescriptor) -> BoxFuture<'static, Result<ResponseEnvelope>> {
        match self.chain.get(self.index).cloned() {
            Some(interceptor) => {
                let next = Next {
                    chain: self.chain,
                    index: self.index + 1,
                    terminal: self.terminal,
                };
                interceptor.handle(request, next)
            }
            None => self.terminal.call(request),
        }
    }
}

/// A composed interceptor chain, reusable across calls.
#[derive(Clone)]
pub struct Composed {
    chain: Arc<[Arc<dyn Interceptor>]>,
}

impl Composed {
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn call<T: Terminal + 'static>(
        &self,
        request: RequestDescriptor,
        terminal: T,
    ) -> BoxFuture<'static, Result<ResponseEnvelope>> {
        self.call_arc(request, Arc::new(terminal))
    }

    pub fn call_arc(
        &self,
        request: RequestDescriptor,
        terminal: Arc<dyn Terminal>,
    ) -> BoxFuture<'static, Result<ResponseEnvelope>> {
        Next {
            chain: Arc::clone(&self.chain),
            index: 0,
            terminal,
        }
        .run(request)
    }
}

/// Build one callable from an ordered interceptor list.
pub fn compose(middlewares: Vec<Arc<dyn Interceptor>>) -> Composed {
    Composed {
        chain: Arc::from(middlewares),
    }
}
