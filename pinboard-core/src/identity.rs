// SPDX-License-Identifier: MIT OR Apache-2.0

//! User identity as seen by the tracker core.
//!
//! Identity management (signup, login, sessions, credentials) lives in an
//! external collaborator. The core only ever handles an opaque [`UserId`]
//! and a display name resolved through [`IdentityProvider`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::access;

/// Opaque identifier of a user account.
///
/// Assigned and interpreted by the identity collaborator; the core only
/// compares it for equality against record ownership.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A mutation caller resolved to a concrete identity.
///
/// The display name is carried separately from the id because the
/// super-user rule matches on it; an unresolvable name simply means the
/// actor is not a super-user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub display_name: Option<String>,
}

impl Actor {
    pub fn new(id: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: Some(display_name.into()),
        }
    }

    /// Returns `true` if this actor's display name matches the super-user
    /// rule.
    pub fn is_super_user(&self) -> bool {
        self.display_name
            .as_deref()
            .is_some_and(access::is_super_user)
    }
}

/// Interface to the external user-identity subsystem.
///
/// `current_user_id` resolves the acting caller, `display_name_of` the
/// public name shown next to records. Both can fail to resolve: an absent
/// caller is anonymous, an absent display name disables every behavior
/// that consults it.
pub trait IdentityProvider {
    /// Identity of the currently acting user, or `None` when anonymous.
    fn current_user_id(&self) -> Option<UserId>;

    /// Display name for a user id, or `None` when it cannot be resolved.
    fn display_name_of(&self, id: &UserId) -> Option<String>;
}
