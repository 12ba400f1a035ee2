//! Per-key single-flight
//!
//! Concurrent requests for one key share a single generation. The generation
//! runs as its own task: callers that stop waiting do not cancel it, and it
//! removes its registry entry when it finishes. The registry mutex is only
//! held to look up or insert a flight, never across an `.await`.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::error::{Error, Result};

type Flight<T> = Shared<BoxFuture<'static, Result<T>>>;
type Registry<T> = Arc<Mutex<HashMap<String, Flight<T>>>>;

pub struct FlightGroup<T> {
    inflight: Registry<T>,
}

impl<T> Clone for FlightGroup<T> {
    fn clone(&self) -> Self {
        Self {
            inflight: Arc::clone(&self.inflight),
        }
    }
}

impl<T> Default for FlightGroup<T> {
    fn default() -> Self {
        Self {
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

fn lock<T>(registry: &Mutex<HashMap<String, Flight<T>>>) -> MutexGuard<'_, HashMap<String, Flight<T>>> {
    // A panic while holding the lock cannot leave the map half-updated
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Removes a finished flight from the registry, including when it panics
struct Deregister<T> {
    registry: Registry<T>,
    key: String,
}

impl<T> Drop for Deregister<T> {
    fn drop(&mut self) {
        lock(&self.registry).remove(&self.key);
    }
}

impl<T> FlightGroup<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the flight for `key`, starting it with `start` if none is running
    ///
    /// `start` is only called when this caller creates the flight.
    pub async fn run<F, Fut>(&self, key: &str, start: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let flight = {
            let mut inflight = lock(&self.inflight);
            match inflight.get(key) {
                Some(existing) => {
                    debug!(key, "Joining in-flight generation");
                    existing.clone()
                }
                None => {
                    let flight = self.spawn(key.to_string(), start());
                    inflight.insert(key.to_string(), flight.clone());
                    flight
                }
            }
        };

        flight.await
    }

    /// Number of keys currently generating
    pub fn in_flight(&self) -> usize {
        lock(&self.inflight).len()
    }

    fn spawn<Fut>(&self, key: String, generation: Fut) -> Flight<T>
    where
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        // The caller holds the registry lock until the flight is inserted, so
        // the removal always runs after the insert
        let deregister = Deregister {
            registry: Arc::clone(&self.inflight),
            key,
        };
        let handle = tokio::spawn(async move {
            let _deregister = deregister;
            generation.await
        });

        async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(Error::Internal(format!("generation task failed: {}", e))),
            }
        }
        .boxed()
        .shared()
    }
}
