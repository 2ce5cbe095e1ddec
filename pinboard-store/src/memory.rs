// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};

use pinboard_core::{NewRecord, Patch, Payload, Record, RecordId, UserId, access};
use tokio::sync::broadcast;
use tracing::debug;

use crate::subscription::{Change, Subscription};
use crate::traits::{RecordStore, WriteOutcome};

/// Events a subscriber can fall behind before the feed starts dropping
/// the oldest ones.
const CHANGE_FEED_CAPACITY: usize = 256;

/// In-memory record store with live change feeds.
///
/// Clones share the same underlying collection, so one store instance can
/// serve any number of writers and subscribers within a process. All
/// writes take the single writer lock and publish their change before
/// releasing it, which serializes mutations per record and delivers events
/// to every subscriber in apply order.
#[derive(Clone, Debug)]
pub struct MemoryStore<P: Payload> {
    inner: Arc<RwLock<Inner<P>>>,
    changes: broadcast::Sender<Change<P>>,
}

#[derive(Debug)]
struct Inner<P: Payload> {
    records: BTreeMap<RecordId, Record<P>>,
    last_id: u64,
}

impl<P: Payload> MemoryStore<P> {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(Inner {
                records: BTreeMap::new(),
                last_id: 0,
            })),
            changes,
        }
    }

    /// Publishes a change to all current subscribers.
    ///
    /// Must be called while still holding the writer lock so events leave
    /// in the same order the writes were applied.
    fn publish(&self, change: Change<P>) {
        // Send only fails when no subscriber exists, which is fine.
        let _ = self.changes.send(change);
    }
}

impl<P: Payload> Default for MemoryStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload> RecordStore<P> for MemoryStore<P> {
    type Error = Infallible;

    async fn insert(&self, new: NewRecord<P>) -> Result<Record<P>, Self::Error> {
        let mut inner = self.inner.write().expect("store lock poisoned");

        inner.last_id += 1;
        let record = Record {
            id: RecordId::new(inner.last_id),
            payload: new.payload,
            created_at: new.created_at,
            owner: new.owner,
            owner_display_name: new.owner_display_name,
            checked: false,
            private: false,
        };

        inner.records.insert(record.id, record.clone());
        self.publish(Change::Inserted(record.clone()));

        Ok(record)
    }

    async fn update<F>(
        &self,
        id: &RecordId,
        patch: Patch,
        condition: F,
    ) -> Result<WriteOutcome, Self::Error>
    where
        F: FnOnce(&Record<P>) -> bool + Send,
    {
        let mut inner = self.inner.write().expect("store lock poisoned");

        let Some(record) = inner.records.get_mut(id) else {
            return Ok(WriteOutcome::NotFound);
        };
        if !condition(record) {
            return Ok(WriteOutcome::Rejected);
        }

        let old = record.clone();
        record.apply(patch);
        let new = record.clone();
        self.publish(Change::Updated { old, new });

        Ok(WriteOutcome::Applied)
    }

    async fn remove<F>(&self, id: &RecordId, condition: F) -> Result<WriteOutcome, Self::Error>
    where
        F: FnOnce(&Record<P>) -> bool + Send,
    {
        let mut inner = self.inner.write().expect("store lock poisoned");

        let Some(record) = inner.records.get(id) else {
            return Ok(WriteOutcome::NotFound);
        };
        if !condition(record) {
            return Ok(WriteOutcome::Rejected);
        }

        let record = inner
            .records
            .remove(id)
            .expect("record exists while lock is held");
        self.publish(Change::Removed(record));

        Ok(WriteOutcome::Applied)
    }

    async fn find_one(&self, id: &RecordId) -> Result<Option<Record<P>>, Self::Error> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.records.get(id).cloned())
    }

    async fn subscribe(&self, viewer: Option<UserId>) -> Result<Subscription<P>, Self::Error> {
        // Holding the read lock across both steps keeps snapshot and feed
        // consistent: writers publish while holding the writer lock, so no
        // change can slip between receiver creation and the snapshot.
        let inner = self.inner.read().expect("store lock poisoned");

        let feed = self.changes.subscribe();
        let mut records: Vec<Record<P>> = inner
            .records
            .values()
            .filter(|record| access::visible_to(record, viewer.as_ref()))
            .cloned()
            .collect();
        records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        debug!(viewer = ?viewer, snapshot_len = records.len(), "subscription opened");

        Ok(Subscription::new(viewer, records, feed))
    }
}
