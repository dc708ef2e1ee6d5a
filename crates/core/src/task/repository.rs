//! Task repository
//!
//! The single seam between domain logic and storage: live queries re-expose
//! the store's queries as sequences of domain tasks, mutations map the
//! domain object to a row first. Store errors propagate unchanged — no
//! translation, no retry.

use std::sync::Arc;

use async_trait::async_trait;

use super::live::LiveQuery;
use super::mapper;
use super::model::Task;
use super::store::TaskStore;
use crate::Result;

/// Repository interface for task queries and mutations
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Live sequence of all tasks, newest creation first
    fn tasks(&self) -> LiveQuery<Vec<Task>>;

    /// Live sequence of one task; `None` while it does not exist
    fn task_by_id(&self, id: i64) -> LiveQuery<Option<Task>>;

    /// Live sequence of completed tasks, newest creation first
    fn completed_tasks(&self) -> LiveQuery<Vec<Task>>;

    /// Live sequence of incomplete tasks, newest creation first
    fn incomplete_tasks(&self) -> LiveQuery<Vec<Task>>;

    /// Insert a task, returning the id it was stored under
    async fn insert_task(&self, task: &Task) -> Result<i64>;

    /// Replace an existing task's contents
    async fn update_task(&self, task: &Task) -> Result<()>;

    /// Delete a task; deleting one that is already gone is a no-op
    async fn delete_task(&self, task: &Task) -> Result<()>;

    /// Delete every task
    async fn delete_all_tasks(&self) -> Result<()>;
}

/// Repository over the local file-backed store
pub struct LocalTaskRepository {
    store: Arc<TaskStore>,
}

impl LocalTaskRepository {
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TaskRepository for LocalTaskRepository {
    fn tasks(&self) -> LiveQuery<Vec<Task>> {
        self.store
            .watch_all()
            .map(|rows| rows.iter().map(mapper::to_domain).collect())
    }

    fn task_by_id(&self, id: i64) -> LiveQuery<Option<Task>> {
        self.store
            .watch_by_id(id)
            .map(|row| row.as_ref().map(mapper::to_domain))
    }

    fn completed_tasks(&self) -> LiveQuery<Vec<Task>> {
        self.store
            .watch_completed()
            .map(|rows| rows.iter().map(mapper::to_domain).collect())
    }

    fn incomplete_tasks(&self) -> LiveQuery<Vec<Task>> {
        self.store
            .watch_incomplete()
            .map(|rows| rows.iter().map(mapper::to_domain).collect())
    }

    async fn insert_task(&self, task: &Task) -> Result<i64> {
        self.store.insert(mapper::to_row(task)).await
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        self.store.update(&mapper::to_row(task)).await
    }

    async fn delete_task(&self, task: &Task) -> Result<()> {
        self.store.delete(task.id).await.map(|_| ())
    }

    async fn delete_all_tasks(&self) -> Result<()> {
        self.store.delete_all().await
    }
}
