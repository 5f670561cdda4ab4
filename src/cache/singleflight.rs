// Single-flight registry for cache misses
//
// Deduplicates concurrent misses for the same cache key.
// When multiple requests miss on the same key simultaneously:
// - First caller (leader): Runs the producer, writes the cache, signals completion
// - Subsequent callers (followers): Wait for the leader to complete, then read from cache
// - A follower that still misses after waiting runs the producer itself
//   (cache disabled, or the leader's cache write failed)

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;

/// Per-key in-flight registry
/// Tracks keys whose producer is currently running and lets concurrent
/// callers for the same key await that run instead of starting their own
#[derive(Debug, Clone, Default)]
pub struct Singleflight {
    /// Map of in-flight keys: key -> watch sender
    /// When a producer completes, its guard sends on the channel to notify all waiters
    in_flight: Arc<tokio::sync::Mutex<HashMap<String, watch::Sender<bool>>>>,
}

impl Singleflight {
    /// Create a new single-flight registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a slot for a key
    ///
    /// Returns `FlightSlot::Leader` if this is the first in-flight call for
    /// the key. The leader runs the producer, writes the cache, then drops the
    /// guard (or calls `complete()`).
    ///
    /// Returns `FlightSlot::Follower` after waiting for the leader to finish.
    /// The follower re-reads the cache, which the leader normally populated.
    pub async fn acquire(&self, key: &str) -> FlightSlot {
        // Check if there's already an in-flight call
        let receiver = {
            let in_flight = self.in_flight.lock().await;
            in_flight.get(key).map(|sender| sender.subscribe())
        };

        if let Some(mut rx) = receiver {
            // Another call is in-flight - wait for it to complete
            // The leader's guard sends `true` when done
            let _ = rx.wait_for(|&completed| completed).await;
            FlightSlot::Follower
        } else {
            let (tx, _rx) = watch::channel(false);

            {
                let mut in_flight = self.in_flight.lock().await;
                // Double-check: another call might have started while we weren't holding the lock
                if in_flight.contains_key(key) {
                    drop(in_flight);
                    return Box::pin(self.acquire(key)).await;
                }
                in_flight.insert(key.to_string(), tx.clone());
            }

            FlightSlot::Leader(FlightGuard {
                key: key.to_string(),
                registry: self.clone(),
                sender: tx,
            })
        }
    }

    /// Get current number of in-flight keys
    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    /// Remove a key from the in-flight map (called when a leader completes)
    async fn remove_in_flight(&self, key: &str) {
        let mut in_flight = self.in_flight.lock().await;
        in_flight.remove(key);
    }
}

/// Result of acquiring a single-flight slot
#[derive(Debug)]
pub enum FlightSlot {
    /// This is the first call for the key - run the producer and cache the result.
    /// When the guard is dropped, all waiting followers will be notified.
    Leader(FlightGuard),

    /// Another call was in-flight and has now completed.
    /// The result should be available in cache - read from there.
    Follower,
}

impl FlightSlot {
    /// Check if this is the leader (first caller that runs the producer)
    pub fn is_leader(&self) -> bool {
        matches!(self, FlightSlot::Leader(_))
    }

    /// Check if this is a follower (waited for leader, should read from cache)
    pub fn is_follower(&self) -> bool {
        matches!(self, FlightSlot::Follower)
    }
}

/// Guard held by the leader
/// When dropped, notifies all waiting followers that the run is complete
#[derive(Debug)]
pub struct FlightGuard {
    key: String,
    registry: Singleflight,
    sender: watch::Sender<bool>,
}

impl FlightGuard {
    /// Explicitly mark the run as complete and notify all followers.
    /// This is called automatically when the guard is dropped, but can be
    /// called explicitly if needed.
    pub async fn complete(self) {
        // Send completion signal to all waiting followers
        let _ = self.sender.send(true);
        // Remove from in-flight map
        self.registry.remove_in_flight(&self.key).await;
        // Prevent Drop from running (we've already cleaned up)
        std::mem::forget(self);
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        // Send completion signal to all waiting followers
        let _ = self.sender.send(true);

        // Spawn a task to clean up the in-flight map
        // We must spawn because Drop is not async
        let registry = self.registry.clone();
        let key = self.key.clone();
        tokio::spawn(async move {
            registry.remove_in_flight(&key).await;
        });
    }
}
