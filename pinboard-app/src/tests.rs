// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use assert_matches::assert_matches;
use pinboard_core::test_utils::TestIdentity;
use pinboard_core::{Payload, Project, RecordId, Task, UserId};
use pinboard_store::{MemoryStore, RecordEvent, RecordStore, Subscription};
use tokio::time::timeout;

use crate::collection::{Collection, MethodError};
use crate::view::ClientView;
use crate::App;

fn tasks(
    store: &MemoryStore<Task>,
    identity: TestIdentity,
) -> Collection<Task, MemoryStore<Task>, TestIdentity> {
    Collection::new(store.clone(), identity)
}

fn projects(
    store: &MemoryStore<Project>,
    identity: TestIdentity,
) -> Collection<Project, MemoryStore<Project>, TestIdentity> {
    Collection::new(store.clone(), identity)
}

async fn try_next<P: Payload>(subscription: &mut Subscription<P>) -> Option<RecordEvent<P>> {
    timeout(Duration::from_millis(20), subscription.next())
        .await
        .ok()
        .flatten()
}

#[tokio::test]
async fn anonymous_callers_cannot_mutate_anything() {
    let store = MemoryStore::<Task>::new();
    let ann = tasks(&store, TestIdentity::logged_in("u1", "Ann"));
    let anonymous = tasks(&store, TestIdentity::anonymous());

    let record = ann.add(Task::new("write tests", "https://example.org")).await.unwrap();

    assert_matches!(
        anonymous.add(Task::new("sneak", "in")).await,
        Err(MethodError::NotAuthorized)
    );
    assert_matches!(
        anonymous.delete(&record.id).await,
        Err(MethodError::NotAuthorized)
    );
    assert_matches!(
        anonymous.set_checked(&record.id, true).await,
        Err(MethodError::NotAuthorized)
    );
    assert_matches!(
        anonymous.set_private(&record.id, true).await,
        Err(MethodError::NotAuthorized)
    );

    // No write happened: one record, still untouched.
    let snapshot = store.subscribe(None).await.unwrap();
    assert_eq!(snapshot.records().len(), 1);
    let current = store.find_one(&record.id).await.unwrap().unwrap();
    assert!(!current.checked);
    assert!(!current.private);
}

#[tokio::test]
async fn create_requires_a_resolvable_display_name() {
    let store = MemoryStore::<Task>::new();
    let nameless = tasks(&store, TestIdentity::without_display_name("u1"));
    let ann = tasks(&store, TestIdentity::logged_in("u2", "Ann"));

    assert_matches!(
        nameless.add(Task::new("no name", "no link")).await,
        Err(MethodError::NotAuthorized)
    );

    // Editing only consults the name for the super-user rule, so an
    // identified caller without one can still edit public records.
    let record = ann.add(Task::new("shared", "https://example.org")).await.unwrap();
    nameless.set_checked(&record.id, true).await.unwrap();
    nameless.delete(&record.id).await.unwrap();
}

#[tokio::test]
async fn owners_control_their_records_in_any_state() {
    let store = MemoryStore::<Task>::new();
    let ann = tasks(&store, TestIdentity::logged_in("u1", "Ann"));

    let record = ann.add(Task::new("own it", "https://example.org")).await.unwrap();
    assert_eq!(record.owner, UserId::from("u1"));
    assert_eq!(record.owner_display_name, "Ann");

    ann.set_private(&record.id, true).await.unwrap();
    ann.set_checked(&record.id, true).await.unwrap();
    ann.set_checked(&record.id, false).await.unwrap();
    ann.set_private(&record.id, false).await.unwrap();
    ann.set_private(&record.id, true).await.unwrap();

    // Still deletable while private.
    ann.delete(&record.id).await.unwrap();
    assert!(store.find_one(&record.id).await.unwrap().is_none());
}

#[tokio::test]
async fn strangers_may_edit_public_records_but_not_their_privacy() {
    let task_store = MemoryStore::<Task>::new();
    let project_store = MemoryStore::<Project>::new();
    let ann = tasks(&task_store, TestIdentity::logged_in("u1", "Ann"));
    let bob = tasks(&task_store, TestIdentity::logged_in("u2", "Bob"));
    let ann_projects = projects(&project_store, TestIdentity::logged_in("u1", "Ann"));
    let bob_projects = projects(&project_store, TestIdentity::logged_in("u2", "Bob"));

    let task = ann.add(Task::new("shared", "https://example.org")).await.unwrap();
    let project = ann_projects
        .add(Project::new("shared", "https://example.org"))
        .await
        .unwrap();

    bob.set_checked(&task.id, true).await.unwrap();
    bob_projects.set_checked(&project.id, true).await.unwrap();

    assert_matches!(
        bob.set_private(&task.id, true).await,
        Err(MethodError::NotAuthorized)
    );
    assert_matches!(
        bob_projects.set_private(&project.id, true).await,
        Err(MethodError::NotAuthorized)
    );

    bob.delete(&task.id).await.unwrap();
    bob_projects.delete(&project.id).await.unwrap();
}

#[tokio::test]
async fn strangers_cannot_touch_private_records() {
    let store = MemoryStore::<Task>::new();
    let ann = tasks(&store, TestIdentity::logged_in("u1", "Ann"));
    let bob = tasks(&store, TestIdentity::logged_in("u2", "Bob"));

    let record = ann.add(Task::new("secret", "https://example.org")).await.unwrap();
    ann.set_private(&record.id, true).await.unwrap();

    assert_matches!(bob.delete(&record.id).await, Err(MethodError::NotAuthorized));
    assert_matches!(
        bob.set_checked(&record.id, true).await,
        Err(MethodError::NotAuthorized)
    );
    assert_matches!(
        bob.set_private(&record.id, false).await,
        Err(MethodError::NotAuthorized)
    );

    let current = store.find_one(&record.id).await.unwrap().unwrap();
    assert!(current.private);
    assert!(!current.checked);
}

#[tokio::test]
async fn super_user_rules_apply_to_tasks_only() {
    let task_store = MemoryStore::<Task>::new();
    let project_store = MemoryStore::<Project>::new();
    let ann = tasks(&task_store, TestIdentity::logged_in("u1", "Ann"));
    let ann_projects = projects(&project_store, TestIdentity::logged_in("u1", "Ann"));
    // Lowercase on purpose; the rule matches case-insensitively.
    let jon = tasks(&task_store, TestIdentity::logged_in("u9", "jon"));
    let jon_projects = projects(&project_store, TestIdentity::logged_in("u9", "jon"));

    let task = ann.add(Task::new("guarded", "https://example.org")).await.unwrap();
    ann.set_private(&task.id, true).await.unwrap();

    // Completion-toggle and delete work on any task, even private ones.
    jon.set_checked(&task.id, true).await.unwrap();
    jon.delete(&task.id).await.unwrap();

    // Privacy stays owner-only even for the super-user.
    let task = ann.add(Task::new("mine", "https://example.org")).await.unwrap();
    assert_matches!(
        jon.set_private(&task.id, true).await,
        Err(MethodError::NotAuthorized)
    );

    // No super-user powers over projects.
    let project = ann_projects
        .add(Project::new("guarded", "https://example.org"))
        .await
        .unwrap();
    ann_projects.set_private(&project.id, true).await.unwrap();

    assert_matches!(
        jon_projects.set_checked(&project.id, true).await,
        Err(MethodError::NotAuthorized)
    );
    assert_matches!(
        jon_projects.delete(&project.id).await,
        Err(MethodError::NotAuthorized)
    );
}

#[tokio::test]
async fn missing_records_are_indistinguishable_from_forbidden_ones() {
    let store = MemoryStore::<Task>::new();
    let ann = tasks(&store, TestIdentity::logged_in("u1", "Ann"));
    let missing = RecordId::new(999);

    assert_matches!(ann.delete(&missing).await, Err(MethodError::NotAuthorized));
    assert_matches!(
        ann.set_checked(&missing, true).await,
        Err(MethodError::NotAuthorized)
    );
    assert_matches!(
        ann.set_private(&missing, true).await,
        Err(MethodError::NotAuthorized)
    );
}

#[tokio::test]
async fn privacy_flip_leaves_the_other_viewers_live_view() {
    let store = MemoryStore::<Task>::new();
    let ann = tasks(&store, TestIdentity::logged_in("u1", "Ann"));
    let bob = tasks(&store, TestIdentity::logged_in("u2", "Bob"));

    let record = ann.add(Task::new("x", "y")).await.unwrap();

    let mut ann_sub = ann.subscribe().await.unwrap();
    let mut bob_sub = bob.subscribe().await.unwrap();
    let mut ann_view = ClientView::from_snapshot(ann_sub.records().to_vec());
    let mut bob_view = ClientView::from_snapshot(bob_sub.records().to_vec());
    assert!(ann_view.contains(&record.id));
    assert!(bob_view.contains(&record.id));

    ann.set_private(&record.id, true).await.unwrap();

    assert_matches!(try_next(&mut ann_sub).await, Some(event @ RecordEvent::Changed(_)) => {
        ann_view.apply(event);
    });
    assert_matches!(try_next(&mut bob_sub).await, Some(event @ RecordEvent::Removed(_)) => {
        bob_view.apply(event);
    });

    assert!(ann_view.contains(&record.id));
    assert!(!bob_view.contains(&record.id));
    assert!(bob_view.is_empty());
}

#[tokio::test]
async fn app_facade_exposes_the_named_operations() {
    let app = App::new(
        MemoryStore::<Task>::new(),
        MemoryStore::<Project>::new(),
        TestIdentity::logged_in("u1", "Ann"),
    );

    let task = app.add_task("read paper", "https://example.org").await.unwrap();
    let project = app.add_project("garden", "https://example.org").await.unwrap();
    assert_eq!(task.payload.label, "read paper");
    assert_eq!(project.payload.project, "garden");

    app.tasks.set_checked(&task.id, true).await.unwrap();
    app.projects.set_private(&project.id, true).await.unwrap();

    app.delete_task(&task.id).await.unwrap();
    app.delete_project(&project.id).await.unwrap();

    let tasks_left = app.tasks.subscribe().await.unwrap();
    let projects_left = app.projects.subscribe().await.unwrap();
    assert!(tasks_left.records().is_empty());
    assert!(projects_left.records().is_empty());
}
