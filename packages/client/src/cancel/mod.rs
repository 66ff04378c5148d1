//! Cooperative cancellation primitives
//!
//! [`AbortController`] owns the right to abort; its [`AbortSignal`] exposes the
//! `aborted` flag, the abort reason and a [`cancelled`](AbortSignal::cancelled)
//! future. Both sit on a [`CancellationToken`]: awaiting the signal is the
//! one-shot abort subscription, and dropping the future deregisters it.
//!
//! [`CancelToken`] is the user-facing handle stored on a request. It wraps
//! either its own controller or a native one supplied by the caller.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

fn lock(reason: &Mutex<Option<String>>) -> MutexGuard<'_, Option<String>> {
    reason.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Default)]
pub struct AbortSignal {
    token: CancellationToken,
    reason: Arc<Mutex<Option<String>>>,
}

impl AbortSignal {
    pub fn aborted(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn reason(&self) -> Option<String> {
        lock(&self.reason).clone()
    }

    /// Resolves once the signal is aborted; immediately if it already is.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// The underlying token, for racing against other tokio work.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    fn abort(&self, reason: Option<String>) -> bool {
        // Reason lands before the token flips.
        let mut slot = lock(&self.reason);
        if self.token.is_cancelled() {
            return false;
        }
        *slot = reason;
        self.token.cancel();
        true
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.aborted())
            .field("reason", &self.reason())
            .finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    #[must_use]
    pub fn new() -> Self {
        AbortController::default()
    }

    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Abort the signal; returns false if it was already aborted.
    pub fn abort(&self) -> bool {
        self.signal.abort(None)
    }

    pub fn abort_with(&self, reason: impl Into<String>) -> bool {
        self.signal.abort(Some(reason.into()))
    }
}

impl From<CancellationToken> for AbortController {
    fn from(token: CancellationToken) -> Self {
        AbortController {
            signal: AbortSignal {
                token,
                reason: Arc::default(),
            },
        }
    }
}

/// Cancellation handle attached to a request.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    controller: AbortController,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.controller.abort();
    }

    pub fn cancel_with(&self, reason: impl Into<String>) {
        self.controller.abort_with(reason);
    }

    pub fn is_cancelled(&self) -> bool {
        self.controller.signal.aborted()
    }

    pub fn signal(&self) -> AbortSignal {
        self.controller.signal()
    }
}

impl From<AbortController> for CancelToken {
    fn from(controller: AbortController) -> Self {
        CancelToken { controller }
    }
}

impl From<CancellationToken> for CancelToken {
    fn from(token: CancellationToken) -> Self {
        CancelToken::from(AbortController::from(token))
    }
}
