// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stored entities of the tracker.
//!
//! [`Record`] is the envelope shared by both collections; the payload type
//! carries the only field that differs between them. [`NewRecord`] and
//! [`Patch`] are the write shapes: a record can only ever be created with
//! `checked`/`private` absent, and only those two flags can change after
//! creation. Owner, payload and creation time are immutable by
//! construction.

use std::fmt::{self, Debug};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::identity::UserId;

/// The two record collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Task,
    Project,
}

/// Collection-specific part of a record.
///
/// Implementations are plain field structs; the associated [`Kind`] is what
/// the access policy consults for collection-scoped rules.
pub trait Payload: Clone + Debug + PartialEq + Send + Sync + 'static {
    const KIND: Kind;
}

/// Payload of a task record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub label: String,
    pub link: String,
}

impl Task {
    pub fn new(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            link: link.into(),
        }
    }
}

impl Payload for Task {
    const KIND: Kind = Kind::Task;
}

/// Payload of a project record. Identical to [`Task`] up to the field name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project: String,
    pub link: String,
}

impl Project {
    pub fn new(project: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            link: link.into(),
        }
    }
}

impl Payload for Project {
    const KIND: Kind = Kind::Project;
}

/// Opaque unique id of a stored record, assigned by the record store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Milliseconds since the UNIX epoch.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Current system time.
    pub fn now() -> Self {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is not behind");
        Self(elapsed.as_millis() as u64)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }
}

/// A stored task or project entity.
///
/// `checked` and `private` default to `false` and are omitted from the
/// serialized form when unset; an absent flag and an explicit `false` are
/// the same value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record<P> {
    pub id: RecordId,
    #[serde(flatten)]
    pub payload: P,
    pub created_at: Timestamp,
    pub owner: UserId,
    pub owner_display_name: String,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub checked: bool,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub private: bool,
}

fn is_unset(flag: &bool) -> bool {
    !*flag
}

impl<P> Record<P> {
    /// Returns `true` when `user` is the record's owner.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner == *user
    }

    /// Apply a partial update to the mutable flags.
    pub fn apply(&mut self, patch: Patch) {
        if let Some(checked) = patch.checked {
            self.checked = checked;
        }
        if let Some(private) = patch.private {
            self.private = private;
        }
    }
}

/// Insert shape of a record.
///
/// Deliberately has no `checked`/`private` fields: a freshly created record
/// always starts with both unset. The record store assigns the id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewRecord<P> {
    pub payload: P,
    pub owner: UserId,
    pub owner_display_name: String,
    pub created_at: Timestamp,
}

impl<P> NewRecord<P> {
    /// Insert shape for a record created right now.
    pub fn new(payload: P, owner: UserId, owner_display_name: impl Into<String>) -> Self {
        Self {
            payload,
            owner,
            owner_display_name: owner_display_name.into(),
            created_at: Timestamp::now(),
        }
    }

    /// Override the creation time.
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Partial update of a record's mutable fields.
///
/// Only the two flags are expressible here, which is what keeps `owner`,
/// `created_at` and the payload immutable across the whole stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub checked: Option<bool>,
    pub private: Option<bool>,
}

impl Patch {
    /// Patch setting only the `checked` flag.
    pub const fn checked(checked: bool) -> Self {
        Self {
            checked: Some(checked),
            private: None,
        }
    }

    /// Patch setting only the `private` flag.
    pub const fn private(private: bool) -> Self {
        Self {
            checked: None,
            private: Some(private),
        }
    }
}
