//! Pending Store Queue
//!
//! Core implementation of the store-and-forward queue.
//! Provides deduplicated enqueue and atomic drain-all.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

use crate::domain::Donation;

/// Result of submitting a webhook payload
#[derive(Debug, Clone)]
pub struct Submission {
    /// The donation built from the payload
    pub donation: Donation,
    /// `false` when a donation with the same id was already pending
    pub inserted: bool,
}

/// Pending donations, oldest first.
///
/// # Invariants
/// - No two pending donations share an id
/// - Draining returns everything and leaves the queue empty
///
/// Every operation holds the lock for its whole read-modify-write, so a
/// dedup check can never race with a concurrent insert of the same id.
#[derive(Debug, Default)]
pub struct PendingStore {
    queue: Mutex<Vec<Donation>>,
}

impl PendingStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the queue.
    ///
    /// A panic while holding the lock cannot leave the vector half-written
    /// (pushes and takes are single calls), so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Vec<Donation>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Submit
    // =========================================================================

    /// Queue a donation from a webhook payload.
    ///
    /// A payload whose resolved id is already pending is discarded silently;
    /// the constructed donation is still returned for acknowledgment.
    pub fn submit(&self, payload: &Map<String, Value>) -> Submission {
        let donation = Donation::from_webhook(payload);

        let mut queue = self.lock();
        if queue.iter().any(|pending| pending.id == donation.id) {
            let pending = queue.len();
            drop(queue);

            tracing::debug!(
                id = %donation.id,
                pending,
                "Duplicate donation discarded"
            );
            return Submission {
                donation,
                inserted: false,
            };
        }

        queue.push(donation.clone());
        let pending = queue.len();
        drop(queue);

        tracing::info!(
            id = %donation.id,
            name = %donation.name,
            amount = %donation.amount,
            pending,
            "Donation queued"
        );

        Submission {
            donation,
            inserted: true,
        }
    }

    // =========================================================================
    // Test injection
    // =========================================================================

    /// Queue a manual test donation, bypassing deduplication.
    pub fn inject_test(&self, fields: &Map<String, Value>) -> Donation {
        let donation = Donation::for_test(fields);

        let pending = {
            let mut queue = self.lock();
            queue.push(donation.clone());
            queue.len()
        };

        tracing::info!(
            id = %donation.id,
            name = %donation.name,
            amount = %donation.amount,
            pending,
            "Test donation queued"
        );

        donation
    }

    // =========================================================================
    // Drain
    // =========================================================================

    /// Take every pending donation, leaving the store empty.
    pub fn drain_all(&self) -> Vec<Donation> {
        let drained = std::mem::take(&mut *self.lock());

        if !drained.is_empty() {
            tracing::info!(count = drained.len(), "Pending donations drained");
        }

        drained
    }

    /// Number of pending donations
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = PendingStore::new();
        assert!(store.is_empty());
        assert!(store.drain_all().is_empty());
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let store = PendingStore::new();

        let first = store.submit(&object(json!({"id": "x", "donator_name": "Budi"})));
        let second = store.submit(&object(json!({"id": "x", "donator_name": "Sari"})));

        assert!(first.inserted);
        assert!(!second.inserted);
        assert_eq!(second.donation.name, "Sari");

        let drained = store.drain_all();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].name, "Budi");
    }

    #[test]
    fn test_drain_returns_everything_then_nothing() {
        let store = PendingStore::new();
        store.submit(&object(json!({"id": "a"})));
        store.submit(&object(json!({"id": "b"})));
        store.inject_test(&Map::new());

        assert_eq!(store.drain_all().len(), 3);
        assert!(store.drain_all().is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_drain_preserves_order() {
        let store = PendingStore::new();
        store.submit(&object(json!({"id": "a", "name": "A"})));
        store.submit(&object(json!({"id": "b", "name": "B"})));

        let names: Vec<_> = store.drain_all().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_drained_id_is_accepted_again() {
        let store = PendingStore::new();
        store.submit(&object(json!({"id": "x"})));
        store.drain_all();

        assert!(store.submit(&object(json!({"id": "x"}))).inserted);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_inject_test_skips_dedup() {
        let store = PendingStore::new();
        let fields = object(json!({"name": "Rina"}));

        let a = store.inject_test(&fields);
        let b = store.inject_test(&fields);

        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_concurrent_duplicates_insert_once() {
        let store = Arc::new(PendingStore::new());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..100)
                        .filter(|i| {
                            let payload =
                                object(json!({"id": format!("donation-{i}"), "name": worker}));
                            store.submit(&payload).inserted
                        })
                        .count()
                })
            })
            .collect();

        let inserted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(inserted, 100);
        assert_eq!(store.drain_all().len(), 100);
    }

    #[test]
    fn test_concurrent_drains_never_repeat() {
        let store = Arc::new(PendingStore::new());
        for i in 0..500 {
            store.submit(&object(json!({"id": i + 1})));
        }

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.drain_all())
            })
            .collect();

        let mut ids: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .map(|d| d.id)
            .collect();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 500);
    }
}
