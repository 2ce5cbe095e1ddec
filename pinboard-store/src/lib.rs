// SPDX-License-Identifier: MIT OR Apache-2.0

#![cfg_attr(doctest, doc=include_str!("../README.md"))]

//! Record persistence and live subscriptions for the pinboard tracker.
//!
//! The [`RecordStore`] trait is the boundary towards whatever real-time
//! database backs a deployment; [`MemoryStore`] is the reference
//! implementation used by tests and single-process setups. Confidentiality
//! is enforced here and nowhere else: a subscription never delivers a
//! private record to anyone but its owner, neither in the initial snapshot
//! nor through the live feed.

mod memory;
mod subscription;
mod traits;

pub use memory::MemoryStore;
pub use subscription::{Change, RecordEvent, Subscription};
pub use traits::{RecordStore, WriteOutcome};
