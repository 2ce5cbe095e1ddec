// SPDX-License-Identifier: MIT OR Apache-2.0

use std::marker::PhantomData;

use pinboard_core::{
    Actor, IdentityProvider, NewRecord, Patch, Payload, Record, RecordId, access,
};
use pinboard_store::{RecordStore, Subscription, WriteOutcome};
use thiserror::Error;
use tracing::debug;

/// Failure of a mutation operation.
#[derive(Error, Debug)]
pub enum MethodError<E: std::error::Error> {
    /// The caller may not perform this operation.
    ///
    /// Also covers mutations targeting a record that does not exist, so a
    /// caller cannot distinguish "not yours" from "not there" and probe
    /// for private record ids.
    #[error("not authorized")]
    NotAuthorized,

    /// The record store failed; nothing is known about the write.
    #[error(transparent)]
    Store(#[from] E),
}

/// One record collection and its named operations.
///
/// Every mutation resolves the caller through the identity collaborator
/// and hands the resulting authorization predicate to the store as a write
/// condition; guard and write are evaluated in one atomic step. Anonymous
/// callers fail every mutation before any store access.
#[derive(Debug)]
pub struct Collection<P, S, I> {
    store: S,
    identity: I,
    _payload: PhantomData<P>,
}

impl<P, S, I> Collection<P, S, I>
where
    P: Payload,
    S: RecordStore<P>,
    I: IdentityProvider,
{
    pub fn new(store: S, identity: I) -> Self {
        Self {
            store,
            identity,
            _payload: PhantomData,
        }
    }

    /// Create a record owned by the current user.
    ///
    /// Requires a caller with a resolvable identity and display name; the
    /// name is denormalized onto the record at creation time.
    pub async fn add(&self, payload: P) -> Result<Record<P>, MethodError<S::Error>> {
        let actor = self.actor()?;
        let Some(display_name) = actor.display_name else {
            return Err(MethodError::NotAuthorized);
        };

        let record = self
            .store
            .insert(NewRecord::new(payload, actor.id, display_name))
            .await?;

        debug!(
            collection = ?P::KIND,
            id = %record.id,
            owner = %record.owner,
            "record added"
        );

        Ok(record)
    }

    /// Delete a record.
    ///
    /// Allowed on non-private records, on own records, and on any record
    /// of the task collection when the caller is the super-user.
    pub async fn delete(&self, id: &RecordId) -> Result<(), MethodError<S::Error>> {
        let actor = self.actor()?;
        let outcome = self
            .store
            .remove(id, |record| access::can_edit(record, &actor))
            .await?;

        self.conclude(outcome, id, &actor, "record deleted")
    }

    /// Set the completion flag. Same guard as [`delete`](Self::delete).
    pub async fn set_checked(
        &self,
        id: &RecordId,
        checked: bool,
    ) -> Result<(), MethodError<S::Error>> {
        let actor = self.actor()?;
        let outcome = self
            .store
            .update(id, Patch::checked(checked), |record| {
                access::can_edit(record, &actor)
            })
            .await?;

        self.conclude(outcome, id, &actor, "completion flag set")
    }

    /// Set the privacy flag. Owner only, no exceptions.
    pub async fn set_private(
        &self,
        id: &RecordId,
        private: bool,
    ) -> Result<(), MethodError<S::Error>> {
        let actor = self.actor()?;
        let outcome = self
            .store
            .update(id, Patch::private(private), |record| {
                access::can_set_private(record, &actor)
            })
            .await?;

        self.conclude(outcome, id, &actor, "privacy flag set")
    }

    /// Open the live feed of this collection for the current user.
    ///
    /// Takes no further parameters; the visibility filter derived from the
    /// caller's identity is the only narrowing applied at the store.
    pub async fn subscribe(&self) -> Result<Subscription<P>, MethodError<S::Error>> {
        let viewer = self.identity.current_user_id();
        Ok(self.store.subscribe(viewer).await?)
    }

    /// Resolve the acting caller, rejecting anonymous mutation.
    fn actor(&self) -> Result<Actor, MethodError<S::Error>> {
        let id = self
            .identity
            .current_user_id()
            .ok_or(MethodError::NotAuthorized)?;
        let display_name = self.identity.display_name_of(&id);

        Ok(Actor { id, display_name })
    }

    fn conclude(
        &self,
        outcome: WriteOutcome,
        id: &RecordId,
        actor: &Actor,
        action: &'static str,
    ) -> Result<(), MethodError<S::Error>> {
        match outcome {
            WriteOutcome::Applied => {
                debug!(collection = ?P::KIND, id = %id, user = %actor.id, "{action}");
                Ok(())
            }
            WriteOutcome::Rejected | WriteOutcome::NotFound => Err(MethodError::NotAuthorized),
        }
    }
}
