use super::RetryPolicy;
use crate::client::HttpClient;
use crate::error::Result;
use crate::http::{RequestDescriptor, ResponseEnvelope};

/// Invoke `operation` until it succeeds or `policy` gives up.
///
/// Intermediate failures are swallowed; the last one is returned once the
/// attempts run out, `should_retry` declines, or an attempt is cancelled.
pub async fn retry<T, F, Fut>(mut operation: F, policy: &RetryPolicy) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if attempt >= policy.attempts || !policy.is_retryable(&err, attempt) {
            tracing::debug!(attempt, kind = err.kind().as_str(), "giving up");
            return Err(err);
        }

        let delay = policy.delay_for(attempt);
        tracing::debug!(attempt, ?delay, error = %err, "attempt failed, retrying");
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        attempt += 1;
    }
}

impl HttpClient {
    /// Re-send a fresh copy of `call` under `policy`.
    pub async fn request_with_retry(&self, call: RequestDescriptor, policy: &RetryPolicy) -> Result<ResponseEnvelope> {
        retry(|| self.request(call.clone()), policy).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::error::{cancelled, network};

    fn flaky(calls: Arc<AtomicU32>, failures: u32) -> impl FnMut() -> std::future::Ready<Result<&'static str>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if n <= failures {
                Err(network(&RequestDescriptor::get("/"), format!("failure {n}")))
            } else {
                Ok("done")
            })
        }
    }

    #[tokio::test]
    async fn succeeds_on_third_invocation() {
        let calls = Arc::new(AtomicU32::new(0));
        let value = retry(flaky(calls.clone(), 2), &RetryPolicy::new(3)).await.unwrap();
        assert_eq!(value, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_surfaces_last_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let err = retry(flaky(calls.clone(), 5), &RetryPolicy::new(3)).await.unwrap_err();
        assert_eq!(err.message(), "failure 3");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn cancel_stops_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let err = retry(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                std::future::ready(Err::<(), _>(cancelled(&RequestDescriptor::get("/"), None)))
            },
            &RetryPolicy::new(5),
        )
        .await
        .unwrap_err();
        assert!(err.is_cancel());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();
        let policy = RetryPolicy::new(3).with_delay(Duration::from_millis(100)).with_backoff(2.0);
        retry(flaky(calls, 2), &policy).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}
