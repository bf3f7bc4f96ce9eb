//! Coalescing of identical in-flight feedback requests.
//!
//! The first caller for a key spawns the call onto the runtime; concurrent
//! callers with the same key await that one shared task. The task removes
//! its own entry when it finishes, so a later request with the same key
//! triggers a fresh model call, and a caller that goes away (client
//! disconnect) neither cancels the call nor leaks the entry.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use sha2::{Digest, Sha256};

type SharedCall<T> = Shared<BoxFuture<'static, Option<T>>>;
type CallTable<T> = Arc<Mutex<HashMap<String, InFlightCall<T>>>>;

struct InFlightCall<T> {
    id: u64,
    call: SharedCall<T>,
}

/// Keyed table of in-flight calls producing `T`.
pub struct InFlightRequests<T: Clone + Send + Sync + 'static> {
    calls: CallTable<T>,
    next_id: AtomicU64,
}

impl<T: Clone + Send + Sync + 'static> InFlightRequests<T> {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Derives a stable key from the given parts.
    pub fn key<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part.as_bytes());
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// Runs `make()` unless a call with the same key is already in flight,
    /// in which case its result is awaited instead.
    ///
    /// Returns `None` only if the spawned call panicked or was aborted.
    pub async fn run<F, Fut>(&self, key: String, make: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let call = {
            let mut calls = lock(&self.calls);
            match calls.get(&key) {
                Some(existing) => {
                    tracing::debug!(key = %short(&key), "Joining in-flight feedback request");
                    existing.call.clone()
                }
                None => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let call = spawn_call(self.calls.clone(), key.clone(), id, make());
                    calls.insert(key, InFlightCall { id, call: call.clone() });
                    call
                }
            }
        };

        call.await
    }

    /// Number of tracked calls.
    pub fn len(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync + 'static> Default for InFlightRequests<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_call<T, Fut>(calls: CallTable<T>, key: String, id: u64, call: Fut) -> SharedCall<T>
where
    T: Clone + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let _entry = EntryGuard { calls, key, id };
        call.await
    });

    task.map(|joined| match joined {
        Ok(output) => Some(output),
        Err(e) => {
            tracing::error!(error = %e, "In-flight feedback call did not complete");
            None
        }
    })
    .boxed()
    .shared()
}

/// Removes its table entry when the spawned call finishes, panics or is
/// aborted.
struct EntryGuard<T> {
    calls: CallTable<T>,
    key: String,
    id: u64,
}

impl<T> Drop for EntryGuard<T> {
    fn drop(&mut self) {
        let mut calls = lock(&self.calls);
        if calls.get(&self.key).is_some_and(|entry| entry.id == self.id) {
            calls.remove(&self.key);
        }
    }
}

fn lock<T>(
    calls: &Mutex<HashMap<String, InFlightCall<T>>>,
) -> MutexGuard<'_, HashMap<String, InFlightCall<T>>> {
    calls.lock().unwrap_or_else(PoisonError::into_inner)
}

fn short(key: &str) -> &str {
    key.get(..12).unwrap_or(key)
}
