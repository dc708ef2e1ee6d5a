//! Task editor controller

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use todo_core::task::{Priority, Task, TaskRepository, UNASSIGNED_ID};

/// Observable state of the task editor
#[derive(Debug, Clone, Default)]
pub struct TaskEditorState {
    /// The loaded task when editing an existing one; `None` for a new task
    pub task: Option<Task>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub is_saving: bool,
}

/// Holds one task's edit state and the save/load machinery around it.
///
/// Editing an existing task subscribes to its live query and copies the
/// editable fields out of the first present emission; a brand-new task needs
/// no subscription at all. Edit intents touch exactly one field each and
/// never talk to storage; `save` is the only write path.
pub struct TaskEditorController {
    repository: Arc<dyn TaskRepository>,
    task_id: Option<i64>,
    state_tx: watch::Sender<TaskEditorState>,
    subscription: Option<JoinHandle<()>>,
}

impl TaskEditorController {
    /// `Some(id)` edits an existing task; `None` edits a brand-new one.
    pub fn new(repository: Arc<dyn TaskRepository>, task_id: Option<i64>) -> Self {
        let (state_tx, _) = watch::channel(TaskEditorState {
            is_loading: task_id.is_some(),
            ..TaskEditorState::default()
        });
        Self {
            repository,
            task_id,
            state_tx,
            subscription: None,
        }
    }

    /// Read side of the controller's state
    pub fn state(&self) -> watch::Receiver<TaskEditorState> {
        self.state_tx.subscribe()
    }

    /// Begin the live subscription.
    ///
    /// A new-task editor has nothing to load and never subscribes.
    pub fn start(&mut self) {
        let Some(id) = self.task_id else {
            return;
        };
        if let Some(handle) = self.subscription.take() {
            handle.abort();
        }

        let repository = Arc::clone(&self.repository);
        let state_tx = self.state_tx.clone();
        self.subscription = Some(tokio::spawn(async move {
            let mut query = repository.task_by_id(id);
            let mut copied = false;
            while let Some(emission) = query.next().await {
                // Absent row: not created yet or deleted meanwhile; keep
                // whatever the user is editing.
                let Some(task) = emission else {
                    continue;
                };
                state_tx.send_modify(|state| {
                    if !copied {
                        state.title = task.title.clone();
                        state.description = task.description.clone();
                        state.is_completed = task.is_completed;
                        state.due_date = task.due_date;
                        state.priority = task.priority;
                        state.is_loading = false;
                    }
                    state.task = Some(task.clone());
                });
                copied = true;
            }
            debug!("Editor subscription for task {} ended", id);
        }));
    }

    /// Replace the edited title
    pub fn on_title_change(&self, title: impl Into<String>) {
        let title = title.into();
        self.state_tx.send_modify(|state| state.title = title);
    }

    /// Replace the edited description
    pub fn on_description_change(&self, description: impl Into<String>) {
        let description = description.into();
        self.state_tx
            .send_modify(|state| state.description = description);
    }

    /// Replace the edited completion flag
    pub fn on_completed_change(&self, is_completed: bool) {
        self.state_tx
            .send_modify(|state| state.is_completed = is_completed);
    }

    /// Replace the edited due date
    pub fn on_due_date_change(&self, due_date: Option<DateTime<Utc>>) {
        self.state_tx.send_modify(|state| state.due_date = due_date);
    }

    /// Replace the edited priority
    pub fn on_priority_change(&self, priority: Priority) {
        self.state_tx.send_modify(|state| state.priority = priority);
    }

    /// Persist the current edit state.
    ///
    /// Runs on a spawned task; the returned handle is the completion signal,
    /// and whether to await it before navigating away is the caller's
    /// decision. A save failure lands in `error` and goes no further.
    pub fn save(&self) -> JoinHandle<()> {
        let repository = Arc::clone(&self.repository);
        let state_tx = self.state_tx.clone();
        tokio::spawn(async move {
            state_tx.send_modify(|state| state.is_saving = true);

            let task = {
                let state = state_tx.borrow();
                // An existing task keeps its id and creation date; a new one
                // gets the unassigned sentinel and a fresh creation date.
                let (id, created_date) = match &state.task {
                    Some(task) => (task.id, task.created_date),
                    None => (UNASSIGNED_ID, Utc::now()),
                };
                Task {
                    id,
                    title: state.title.clone(),
                    description: state.description.clone(),
                    is_completed: state.is_completed,
                    created_date,
                    due_date: state.due_date,
                    priority: state.priority,
                }
            };

            let result = if task.id == UNASSIGNED_ID {
                repository.insert_task(&task).await.map(|_| ())
            } else {
                repository.update_task(&task).await
            };

            match result {
                Ok(()) => state_tx.send_modify(|state| state.is_saving = false),
                Err(e) => state_tx.send_modify(|state| {
                    state.error = Some(e.to_string());
                    state.is_saving = false;
                }),
            }
        })
    }

    /// Cancel the live subscription and release its resources.
    pub fn destroy(&mut self) {
        if let Some(handle) = self.subscription.take() {
            handle.abort();
        }
    }
}

impl Drop for TaskEditorController {
    fn drop(&mut self) {
        self.destroy();
    }
}
