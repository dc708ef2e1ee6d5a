//! Task list controller

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use todo_core::task::{Task, TaskRepository};

/// Observable state of the task list
#[derive(Debug, Clone, Default)]
pub struct TaskListState {
    /// Current tasks, newest creation first
    pub tasks: Vec<Task>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Tuning for the list controller
#[derive(Debug, Clone, Default)]
pub struct ListControllerConfig {
    /// Debounce applied before surfacing the first successful emission.
    pub first_emission_delay: Duration,
}

/// Holds the task list's UI-facing state and its live subscription.
///
/// Loading until the first emission arrives, Ready on every emission after
/// that, Failed if the live sequence ends while still subscribed. Failed is
/// sticky: the controller never retries on its own, a new `start` call
/// begins a fresh subscription.
pub struct TaskListController {
    repository: Arc<dyn TaskRepository>,
    config: ListControllerConfig,
    state_tx: watch::Sender<TaskListState>,
    subscription: Option<JoinHandle<()>>,
}

impl TaskListController {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self::with_config(repository, ListControllerConfig::default())
    }

    pub fn with_config(repository: Arc<dyn TaskRepository>, config: ListControllerConfig) -> Self {
        let (state_tx, _) = watch::channel(TaskListState {
            is_loading: true,
            ..TaskListState::default()
        });
        Self {
            repository,
            config,
            state_tx,
            subscription: None,
        }
    }

    /// Read side of the controller's state
    pub fn state(&self) -> watch::Receiver<TaskListState> {
        self.state_tx.subscribe()
    }

    /// Begin the live subscription, or restart it after a failure.
    pub fn start(&mut self) {
        if let Some(handle) = self.subscription.take() {
            handle.abort();
        }
        self.state_tx.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        let repository = Arc::clone(&self.repository);
        let state_tx = self.state_tx.clone();
        let delay = self.config.first_emission_delay;
        self.subscription = Some(tokio::spawn(async move {
            let mut query = repository.tasks();
            let mut first = true;
            loop {
                match query.next().await {
                    Some(tasks) => {
                        if first && !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        first = false;
                        state_tx.send_modify(|state| {
                            state.tasks = tasks;
                            state.is_loading = false;
                            state.error = None;
                        });
                    }
                    None => {
                        debug!("Task list subscription ended");
                        state_tx.send_modify(|state| {
                            state.error = Some("task store closed".to_string());
                            state.is_loading = false;
                        });
                        break;
                    }
                }
            }
        }));
    }

    /// Flip a task's completion flag.
    ///
    /// Fire-and-forget: the updated list arrives through the live
    /// subscription, not through a return value.
    pub fn toggle_completion(&self, task: &Task) {
        let mut updated = task.clone();
        updated.is_completed = !updated.is_completed;
        let repository = Arc::clone(&self.repository);
        tokio::spawn(async move {
            if let Err(e) = repository.update_task(&updated).await {
                warn!("Failed to toggle completion of task {}: {}", updated.id, e);
            }
        });
    }

    /// Delete a task. Fire-and-forget, like `toggle_completion`.
    pub fn delete(&self, task: &Task) {
        let task = task.clone();
        let repository = Arc::clone(&self.repository);
        tokio::spawn(async move {
            if let Err(e) = repository.delete_task(&task).await {
                warn!("Failed to delete task {}: {}", task.id, e);
            }
        });
    }

    /// Cancel the live subscription and release its resources.
    pub fn destroy(&mut self) {
        if let Some(handle) = self.subscription.take() {
            handle.abort();
        }
    }
}

impl Drop for TaskListController {
    fn drop(&mut self) {
        self.destroy();
    }
}
