//! Batch helper: run request thunks in parallel and keep every outcome
//!
//! Every thunk is invoked up front and all resulting futures are polled
//! together; there is no concurrency cap. Each outcome, success or failure,
//! lands in the slot of the output container matching its input key. The
//! aggregate future resolves once every input has settled and never fails on
//! an individual rejection.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use futures::future::join_all;

use crate::error::Result;

/// Ordered key/value batch; the output keeps input order and duplicate keys.
#[derive(Debug, Clone, Default)]
pub struct Ordered<K, F>(pub Vec<(K, F)>);

impl<K, F> FromIterator<(K, F)> for Ordered<K, F> {
    fn from_iter<I: IntoIterator<Item = (K, F)>>(iter: I) -> Self {
        Ordered(iter.into_iter().collect())
    }
}

/// A container of thunks that can be rebuilt with the same shape.
pub trait Batch {
    type Key;
    type Thunk;
    type Output<V>;

    fn into_entries(self) -> Vec<(Self::Key, Self::Thunk)>;

    fn from_entries<V>(entries: Vec<(Self::Key, V)>) -> Self::Output<V>;
}

impl<F> Batch for Vec<F> {
    type Key = usize;
    type Thunk = F;
    type Output<V> = Vec<V>;

    fn into_entries(self) -> Vec<(usize, F)> {
        self.into_iter().enumerate().collect()
    }

    fn from_entries<V>(entries: Vec<(usize, V)>) -> Vec<V> {
        entries.into_iter().map(|(_, value)| value).collect()
    }
}

impl<K, F> Batch for Ordered<K, F> {
    type Key = K;
    type Thunk = F;
    type Output<V> = Vec<(K, V)>;

    fn into_entries(self) -> Vec<(K, F)> {
        self.0
    }

    fn from_entries<V>(entries: Vec<(K, V)>) -> Vec<(K, V)> {
        entries
    }
}

impl<K: Eq + Hash, F> Batch for HashMap<K, F> {
    type Key = K;
    type Thunk = F;
    type Output<V> = HashMap<K, V>;

    fn into_entries(self) -> Vec<(K, F)> {
        self.into_iter().collect()
    }

    fn from_entries<V>(entries: Vec<(K, V)>) -> HashMap<K, V> {
        entries.into_iter().collect()
    }
}

impl<K: Ord, F> Batch for BTreeMap<K, F> {
    type Key = K;
    type Thunk = F;
    type Output<V> = BTreeMap<K, V>;

    fn into_entries(self) -> Vec<(K, F)> {
        self.into_iter().collect()
    }

    fn from_entries<V>(entries: Vec<(K, V)>) -> BTreeMap<K, V> {
        entries.into_iter().collect()
    }
}

/// Run every thunk and collect the raw outcomes.
pub async fn concurrent<C, F, Fut, T>(batch: C) -> C::Output<Result<T>>
where
    C: Batch<Thunk = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    concurrent_with(batch, |outcome| outcome).await
}

/// Run every thunk and pass each outcome through `mapper` before storing it.
pub async fn concurrent_with<C, F, Fut, T, M, V>(batch: C, mapper: M) -> C::Output<V>
where
    C: Batch<Thunk = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
    M: Fn(Result<T>) -> V,
{
    let (keys, in_flight): (Vec<_>, Vec<_>) = batch
        .into_entries()
        .into_iter()
        .map(|(key, thunk)| (key, thunk()))
        .unzip();
    tracing::debug!(count = keys.len(), "running batch");

    let settled = join_all(in_flight).await;
    C::from_entries(keys.into_iter().zip(settled.into_iter().map(mapper)).collect())
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::time::Duration;

    use super::*;
    use crate::error::network;
    use crate::http::RequestDescriptor;

    type Pending = Pin<Box<dyn Future<Output = Result<u32>> + Send>>;
    type Thunk = Box<dyn FnOnce() -> Pending + Send>;

    fn ok_after(value: u32, millis: u64) -> Thunk {
        Box::new(move || -> Pending {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(millis)).await;
                Ok(value)
            })
        })
    }

    fn fails(message: &'static str) -> Thunk {
        Box::new(move || -> Pending { Box::pin(async move { Err(network(&RequestDescriptor::get("/"), message)) }) })
    }

    #[tokio::test]
    async fn keyed_batch_never_rejects() {
        let mut batch = HashMap::new();
        batch.insert("a", ok_after(1, 5));
        batch.insert("b", fails("boom"));

        let results = concurrent(batch).await;
        assert_eq!(results["a"].as_ref().ok(), Some(&1));
        assert!(results["b"].as_ref().is_err_and(|e| e.message() == "boom"));
    }

    #[tokio::test]
    async fn list_keeps_positions_regardless_of_finish_order() {
        let results = concurrent_with(vec![ok_after(1, 20), ok_after(2, 1), fails("x")], |outcome| {
            outcome.map_or(0, |value| value * 10)
        })
        .await;
        assert_eq!(results, vec![10, 20, 0]);
    }

    #[tokio::test]
    async fn ordered_and_sorted_shapes() {
        let ordered: Ordered<&str, Thunk> = [("z", ok_after(1, 0)), ("a", ok_after(2, 0))].into_iter().collect();
        let results = concurrent_with(ordered, |outcome| outcome.ok()).await;
        assert_eq!(results, vec![("z", Some(1)), ("a", Some(2))]);

        let sorted: BTreeMap<u8, Thunk> = [(2, ok_after(2, 0)), (1, fails("no"))].into_iter().collect();
        let results = concurrent_with(sorted, |outcome| outcome.is_ok()).await;
        assert_eq!(results.into_iter().collect::<Vec<_>>(), vec![(1, false), (2, true)]);
    }

    #[tokio::test(start_paused = true)]
    async fn thunks_run_in_parallel() {
        let started = tokio::time::Instant::now();
        let results = concurrent(vec![ok_after(1, 100), ok_after(2, 100), ok_after(3, 100)]).await;
        assert!(results.iter().all(|outcome| outcome.is_ok()));
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn empty_batch_resolves() {
        let results = concurrent(Vec::<Thunk>::new()).await;
        assert!(results.is_empty());
    }
}
