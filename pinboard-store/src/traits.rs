// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use pinboard_core::{NewRecord, Patch, Payload, Record, RecordId, UserId};

use crate::subscription::Subscription;

/// Result of a conditional write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The condition held and the write was applied.
    Applied,

    /// The record exists but the condition did not hold; nothing was
    /// written.
    Rejected,

    /// No record with the given id exists.
    NotFound,
}

/// Interface for storing, mutating and observing one record collection.
///
/// Implementations serialize concurrent mutations to the same record and
/// apply field updates last-write-wins. `update` and `remove` take the
/// caller's authorization predicate as a condition and must evaluate it
/// against the current record state atomically with the write, closing the
/// gap a separate read-then-check-then-write sequence would leave open.
pub trait RecordStore<P: Payload> {
    type Error: Error;

    /// Insert a new record.
    ///
    /// The store assigns the id and returns the record as stored, with
    /// both flags unset.
    fn insert(
        &self,
        new: NewRecord<P>,
    ) -> impl Future<Output = Result<Record<P>, Self::Error>>;

    /// Apply a partial update to a record when `condition` holds for its
    /// current state.
    ///
    /// The write is re-issued even when the patch matches the current
    /// field values; subscribers then observe a change event carrying an
    /// unchanged record.
    fn update<F>(
        &self,
        id: &RecordId,
        patch: Patch,
        condition: F,
    ) -> impl Future<Output = Result<WriteOutcome, Self::Error>>
    where
        F: FnOnce(&Record<P>) -> bool + Send;

    /// Remove a record when `condition` holds for its current state.
    ///
    /// Removal is a hard delete; there is no tombstone.
    fn remove<F>(
        &self,
        id: &RecordId,
        condition: F,
    ) -> impl Future<Output = Result<WriteOutcome, Self::Error>>
    where
        F: FnOnce(&Record<P>) -> bool + Send;

    /// Get a record by id.
    ///
    /// Returns `None` when no record with this id exists.
    fn find_one(
        &self,
        id: &RecordId,
    ) -> impl Future<Output = Result<Option<Record<P>>, Self::Error>>;

    /// Open a live subscription over the records visible to `viewer`.
    ///
    /// The subscription starts with a snapshot of all currently matching
    /// records, sorted by creation time descending, and then delivers an
    /// event for every write that changes a record's match against the
    /// viewer's visibility predicate.
    fn subscribe(
        &self,
        viewer: Option<UserId>,
    ) -> impl Future<Output = Result<Subscription<P>, Self::Error>>;
}
