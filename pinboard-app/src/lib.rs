// SPDX-License-Identifier: MIT OR Apache-2.0

#![cfg_attr(doctest, doc=include_str!("../README.md"))]

//! Application surface of the pinboard tracker.
//!
//! [`App`] bundles the two record collections (tasks and projects) over
//! one identity collaborator and one record store per collection. The
//! collections are structurally identical; [`Collection`] implements the
//! guarded operations once, generic over the payload, and [`App`] pins the
//! two concrete instantiations plus the named convenience operations.

mod collection;
#[cfg(test)]
mod tests;
mod view;

use pinboard_core::{IdentityProvider, Project, Record, RecordId, Task};
use pinboard_store::RecordStore;

pub use collection::{Collection, MethodError};
pub use view::{ClientView, ViewState};

/// The tracker application: a task collection and a project collection
/// sharing one identity collaborator.
#[derive(Debug)]
pub struct App<TS, PS, I> {
    pub tasks: Collection<Task, TS, I>,
    pub projects: Collection<Project, PS, I>,
}

impl<TS, PS, I> App<TS, PS, I>
where
    TS: RecordStore<Task>,
    PS: RecordStore<Project>,
    I: IdentityProvider + Clone,
{
    pub fn new(task_store: TS, project_store: PS, identity: I) -> Self {
        Self {
            tasks: Collection::new(task_store, identity.clone()),
            projects: Collection::new(project_store, identity),
        }
    }

    /// Create a task owned by the current user.
    pub async fn add_task(
        &self,
        label: impl Into<String>,
        link: impl Into<String>,
    ) -> Result<Record<Task>, MethodError<TS::Error>> {
        self.tasks.add(Task::new(label, link)).await
    }

    /// Delete a task.
    pub async fn delete_task(&self, id: &RecordId) -> Result<(), MethodError<TS::Error>> {
        self.tasks.delete(id).await
    }

    /// Create a project owned by the current user.
    pub async fn add_project(
        &self,
        project: impl Into<String>,
        link: impl Into<String>,
    ) -> Result<Record<Project>, MethodError<PS::Error>> {
        self.projects.add(Project::new(project, link)).await
    }

    /// Delete a project.
    pub async fn delete_project(&self, id: &RecordId) -> Result<(), MethodError<PS::Error>> {
        self.projects.delete(id).await
    }
}
