// SPDX-License-Identifier: MIT OR Apache-2.0

use pinboard_core::{Payload, Record, RecordId, UserId, access};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

/// A write as applied by the store, before any per-viewer filtering.
///
/// Updates carry the record state from before and after the write so a
/// subscription can detect when a record enters or leaves its viewer's
/// visible set.
#[derive(Clone, Debug)]
pub enum Change<P: Payload> {
    Inserted(Record<P>),
    Updated { old: Record<P>, new: Record<P> },
    Removed(Record<P>),
}

/// A change to the set of records visible to one subscriber.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordEvent<P: Payload> {
    /// A record entered the visible set, by insertion or by starting to
    /// match the viewer's predicate.
    Added(Record<P>),

    /// A visible record was updated and remains visible.
    Changed(Record<P>),

    /// A record left the visible set, by removal or by ceasing to match
    /// the viewer's predicate.
    Removed(RecordId),
}

/// Live feed of one record collection, narrowed to what a viewer may see.
///
/// Constructed by a [`RecordStore`](crate::RecordStore) implementation
/// from the viewer's identity, a snapshot of the currently visible records
/// and the store's raw change feed. Dropping the subscription tears it
/// down; there is no explicit cancellation.
#[derive(Debug)]
pub struct Subscription<P: Payload> {
    viewer: Option<UserId>,
    records: Vec<Record<P>>,
    feed: broadcast::Receiver<Change<P>>,
}

impl<P: Payload> Subscription<P> {
    pub fn new(
        viewer: Option<UserId>,
        records: Vec<Record<P>>,
        feed: broadcast::Receiver<Change<P>>,
    ) -> Self {
        Self {
            viewer,
            records,
            feed,
        }
    }

    /// The viewer this subscription was narrowed for.
    pub fn viewer(&self) -> Option<&UserId> {
        self.viewer.as_ref()
    }

    /// Records visible at subscription time, newest first.
    pub fn records(&self) -> &[Record<P>] {
        &self.records
    }

    /// Next visible change, or `None` once the store has gone away.
    ///
    /// A subscriber that lags behind the store's change feed loses the
    /// oldest pending events and continues from there.
    pub async fn next(&mut self) -> Option<RecordEvent<P>> {
        loop {
            match self.feed.recv().await {
                Ok(change) => {
                    if let Some(event) = self.translate(change) {
                        return Some(event);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "subscriber lagging behind change feed");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Maps a raw store change onto this viewer's visible set.
    ///
    /// A record crossing the visibility boundary turns into an add or
    /// remove; changes entirely outside the visible set are dropped.
    fn translate(&self, change: Change<P>) -> Option<RecordEvent<P>> {
        let visible = |record: &Record<P>| access::visible_to(record, self.viewer.as_ref());

        match change {
            Change::Inserted(record) if visible(&record) => Some(RecordEvent::Added(record)),
            Change::Updated { old, new } => match (visible(&old), visible(&new)) {
                (false, true) => Some(RecordEvent::Added(new)),
                (true, true) => Some(RecordEvent::Changed(new)),
                (true, false) => Some(RecordEvent::Removed(new.id)),
                (false, false) => None,
            },
            Change::Removed(record) if visible(&record) => Some(RecordEvent::Removed(record.id)),
            _ => None,
        }
    }
}
