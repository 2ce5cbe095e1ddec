// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use pinboard_core::{Payload, Record, RecordId};
use pinboard_store::RecordEvent;

/// Client-local display preferences.
///
/// Owned by the viewer and passed into the projection explicitly; there is
/// no process-wide toggle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    pub hide_completed: bool,
}

/// Client-side mirror of one subscription's visible record set.
///
/// Seeded from the subscription snapshot and kept current by applying feed
/// events. The projection can only narrow what the subscription already
/// delivered; confidentiality is enforced upstream at the store.
#[derive(Clone, Debug)]
pub struct ClientView<P: Payload> {
    records: BTreeMap<RecordId, Record<P>>,
}

impl<P: Payload> ClientView<P> {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Mirror seeded from a subscription's initial snapshot.
    pub fn from_snapshot(records: impl IntoIterator<Item = Record<P>>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.id, record))
                .collect(),
        }
    }

    /// Fold one feed event into the mirror.
    pub fn apply(&mut self, event: RecordEvent<P>) {
        match event {
            RecordEvent::Added(record) | RecordEvent::Changed(record) => {
                self.records.insert(record.id, record);
            }
            RecordEvent::Removed(id) => {
                self.records.remove(&id);
            }
        }
    }

    /// Records to display, newest first.
    ///
    /// With `hide_completed` set, checked records are excluded. Ties on
    /// creation time are broken by id, so two records created within the
    /// same millisecond still display in insertion order.
    pub fn display(&self, state: ViewState) -> Vec<&Record<P>> {
        let mut rows: Vec<&Record<P>> = self
            .records
            .values()
            .filter(|record| !(state.hide_completed && record.checked))
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        rows
    }

    /// Number of records not yet completed, regardless of the
    /// hide-completed toggle.
    pub fn incomplete_count(&self) -> usize {
        self.records
            .values()
            .filter(|record| !record.checked)
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.contains_key(id)
    }
}

impl<P: Payload> Default for ClientView<P> {
    fn default() -> Self {
        Self::new()
    }
}
