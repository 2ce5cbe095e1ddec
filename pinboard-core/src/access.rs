// SPDX-License-Identifier: MIT OR Apache-2.0

//! The access policy, in full.
//!
//! Reads are gated by [`visible_to`], applied once per subscription at the
//! store boundary. Writes are gated by [`can_edit`] (delete and
//! completion-toggle) and [`can_set_private`] (privacy-toggle), evaluated
//! by the store atomically with the write itself.
//!
//! The policy is fixed: a private record belongs entirely to its owner, a
//! public record is readable by everyone and its completion state is
//! editable by everyone. The single exception is the super-user rule below.

use crate::identity::{Actor, UserId};
use crate::record::{Kind, Payload, Record};

/// Display name granted super-user rights over the task collection.
///
/// Matched case-insensitively against the acting user's display name. The
/// rule applies to deleting and completion-toggling tasks only; it never
/// extends to project records or to privacy-toggling.
pub const SUPER_USER_NAME: &str = "Jon";

/// Returns `true` when `display_name` matches [`SUPER_USER_NAME`],
/// ignoring case.
pub fn is_super_user(display_name: &str) -> bool {
    display_name.eq_ignore_ascii_case(SUPER_USER_NAME)
}

/// Read visibility: a record is delivered to a viewer iff it is not
/// private or the viewer owns it.
///
/// Anonymous viewers (`None`) match only non-private records. This
/// predicate is the sole confidentiality enforcement in the system; no
/// other layer may leak a private record.
pub fn visible_to<P>(record: &Record<P>, viewer: Option<&UserId>) -> bool {
    !record.private || viewer.is_some_and(|user| record.is_owned_by(user))
}

/// Write guard for delete and completion-toggle.
///
/// Passes when the record is not private, or the actor owns it, or when
/// the actor is the super-user and the record is a task.
pub fn can_edit<P: Payload>(record: &Record<P>, actor: &Actor) -> bool {
    !record.private
        || record.is_owned_by(&actor.id)
        || (P::KIND == Kind::Task && actor.is_super_user())
}

/// Write guard for privacy-toggle: strict ownership, no exceptions.
pub fn can_set_private<P: Payload>(record: &Record<P>, actor: &Actor) -> bool {
    record.is_owned_by(&actor.id)
}

#[cfg(test)]
mod tests {
    use super::{can_edit, can_set_private, is_super_user, visible_to};
    use crate::identity::{Actor, UserId};
    use crate::record::{Project, Record, Task};
    use crate::test_utils::{private_record, public_record};

    #[test]
    fn super_user_name_matches_case_insensitively() {
        assert!(is_super_user("Jon"));
        assert!(is_super_user("jon"));
        assert!(is_super_user("JON"));

        assert!(!is_super_user("Jonathan"));
        assert!(!is_super_user("jo n"));
        assert!(!is_super_user(""));
    }

    #[test]
    fn public_records_are_visible_to_everyone() {
        let record: Record<Task> = public_record("u1");

        assert!(visible_to(&record, Some(&UserId::from("u1"))));
        assert!(visible_to(&record, Some(&UserId::from("u2"))));
        assert!(visible_to(&record, None));
    }

    #[test]
    fn private_records_are_visible_to_the_owner_only() {
        let record: Record<Task> = private_record("u1");

        assert!(visible_to(&record, Some(&UserId::from("u1"))));
        assert!(!visible_to(&record, Some(&UserId::from("u2"))));
        assert!(!visible_to(&record, None));
    }

    #[test]
    fn anyone_may_edit_a_public_record() {
        let task: Record<Task> = public_record("u1");
        let project: Record<Project> = public_record("u1");
        let stranger = Actor::new("u2", "Bob");

        assert!(can_edit(&task, &stranger));
        assert!(can_edit(&project, &stranger));
    }

    #[test]
    fn only_the_owner_may_edit_a_private_record() {
        let task: Record<Task> = private_record("u1");

        assert!(can_edit(&task, &Actor::new("u1", "Ann")));
        assert!(!can_edit(&task, &Actor::new("u2", "Bob")));
    }

    #[test]
    fn super_user_may_edit_private_tasks_but_not_private_projects() {
        let task: Record<Task> = private_record("u1");
        let project: Record<Project> = private_record("u1");
        let jon = Actor::new("u9", "jon");

        assert!(can_edit(&task, &jon));
        assert!(!can_edit(&project, &jon));
    }

    #[test]
    fn actor_without_display_name_is_no_super_user() {
        let task: Record<Task> = private_record("u1");
        let nameless = Actor {
            id: UserId::from("u9"),
            display_name: None,
        };

        assert!(!can_edit(&task, &nameless));
    }

    #[test]
    fn privacy_toggle_requires_strict_ownership() {
        let public: Record<Task> = public_record("u1");
        let private: Record<Task> = private_record("u1");

        assert!(can_set_private(&public, &Actor::new("u1", "Ann")));
        assert!(can_set_private(&private, &Actor::new("u1", "Ann")));

        // Neither public write access nor the super-user rule apply here.
        assert!(!can_set_private(&public, &Actor::new("u2", "Bob")));
        assert!(!can_set_private(&public, &Actor::new("u9", "Jon")));
        assert!(!can_set_private(&private, &Actor::new("u9", "Jon")));
    }
}
