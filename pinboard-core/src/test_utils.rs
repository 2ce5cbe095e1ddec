// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixtures for pinboard tests.

use crate::identity::{IdentityProvider, UserId};
use crate::record::{NewRecord, Payload, Project, Record, RecordId, Task, Timestamp};

/// Payloads which can produce a sample value for tests.
pub trait TestPayload: Payload {
    fn sample() -> Self;
}

impl TestPayload for Task {
    fn sample() -> Self {
        Task::new("read paper", "https://example.org")
    }
}

impl TestPayload for Project {
    fn sample() -> Self {
        Project::new("garden", "https://example.org")
    }
}

/// A public sample record owned by `owner`.
pub fn public_record<P: TestPayload>(owner: &str) -> Record<P> {
    Record {
        id: RecordId::new(1),
        payload: P::sample(),
        created_at: Timestamp::from_millis(1_000),
        owner: UserId::from(owner),
        owner_display_name: owner.to_string(),
        checked: false,
        private: false,
    }
}

/// A private sample record owned by `owner`.
pub fn private_record<P: TestPayload>(owner: &str) -> Record<P> {
    Record {
        private: true,
        ..public_record(owner)
    }
}

/// An insert shape with a controlled creation time.
pub fn draft<P: TestPayload>(owner: &str, display_name: &str, created_at_millis: u64) -> NewRecord<P> {
    NewRecord::new(P::sample(), UserId::from(owner), display_name)
        .created_at(Timestamp::from_millis(created_at_millis))
}

/// Identity collaborator fixture resolving to one fixed user, or to no
/// user at all.
#[derive(Clone, Debug, Default)]
pub struct TestIdentity {
    user: Option<(UserId, Option<String>)>,
}

impl TestIdentity {
    /// No current user; every mutation through this identity is anonymous.
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    /// A logged-in user with a resolvable display name.
    pub fn logged_in(id: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            user: Some((id.into(), Some(display_name.into()))),
        }
    }

    /// A logged-in user whose display name cannot be resolved.
    pub fn without_display_name(id: impl Into<UserId>) -> Self {
        Self {
            user: Some((id.into(), None)),
        }
    }
}

impl IdentityProvider for TestIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|(id, _)| id.clone())
    }

    fn display_name_of(&self, id: &UserId) -> Option<String> {
        self.user
            .as_ref()
            .filter(|(user_id, _)| user_id == id)
            .and_then(|(_, display_name)| display_name.clone())
    }
}
