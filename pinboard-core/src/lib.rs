// SPDX-License-Identifier: MIT OR Apache-2.0

#![cfg_attr(doctest, doc=include_str!("../README.md"))]

//! Core data types and access policy for the pinboard tracker.
//!
//! Two parallel collections exist, one for task records and one for project
//! records. Both share the same envelope shape ([`Record`]) and differ only
//! in their payload type, so everything downstream is written once, generic
//! over [`Payload`].
//!
//! The [`access`] module is the entire authorization policy: a visibility
//! predicate enforced at the subscription boundary and two write guards
//! evaluated atomically with each store write. It is deliberately a handful
//! of pure functions, not a configurable permissions engine.

pub mod access;
pub mod identity;
pub mod record;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use identity::{Actor, IdentityProvider, UserId};
pub use record::{Kind, NewRecord, Patch, Payload, Project, Record, RecordId, Task, Timestamp};
