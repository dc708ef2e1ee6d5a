//! Application state
//!
//! The explicit ownership graph: one store constructed at application start,
//! one repository over it, controllers built with the shared repository
//! injected. No ambient global lookup.

use std::path::PathBuf;
use std::sync::Arc;

use todo_core::task::{LocalTaskRepository, TaskRepository, TaskStore};

use crate::controller::{TaskEditorController, TaskListController};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<TaskStore>,
    repository: Arc<dyn TaskRepository>,
}

impl AppState {
    /// Create a new AppState with the given data directory
    pub async fn new(data_dir: PathBuf) -> todo_core::Result<Self> {
        let tasks_path = data_dir.join("tasks.json");
        let store = Arc::new(TaskStore::new(tasks_path).await?);
        let repository: Arc<dyn TaskRepository> =
            Arc::new(LocalTaskRepository::new(Arc::clone(&store)));

        Ok(Self {
            inner: Arc::new(AppStateInner { store, repository }),
        })
    }

    /// Get the shared repository
    pub fn repository(&self) -> Arc<dyn TaskRepository> {
        Arc::clone(&self.inner.repository)
    }

    /// Build a list controller over the shared repository
    pub fn list_controller(&self) -> TaskListController {
        TaskListController::new(self.repository())
    }

    /// Build an editor controller; `None` edits a brand-new task
    pub fn editor_controller(&self, task_id: Option<i64>) -> TaskEditorController {
        TaskEditorController::new(self.repository(), task_id)
    }

    /// Close the underlying store; live controllers observe the shutdown
    pub async fn close(&self) {
        self.inner.store.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use todo_core::task::Task;

    #[tokio::test]
    async fn test_controllers_share_one_store() {
        let temp_dir = TempDir::new().unwrap();
        let app = AppState::new(temp_dir.path().to_path_buf()).await.unwrap();

        let editor = app.editor_controller(None);
        editor.on_title_change("Wired through");
        editor.save().await.unwrap();

        let mut list = app.list_controller();
        let mut state = list.state();
        list.start();
        let ready = state.wait_for(|s| !s.is_loading).await.unwrap();
        assert_eq!(ready.tasks.len(), 1);
        assert_eq!(ready.tasks[0].title, "Wired through");
    }

    #[tokio::test]
    async fn test_close_reaches_controllers() {
        let temp_dir = TempDir::new().unwrap();
        let app = AppState::new(temp_dir.path().to_path_buf()).await.unwrap();
        app.repository().insert_task(&Task::new("One")).await.unwrap();

        let mut list = app.list_controller();
        let mut state = list.state();
        list.start();
        state.wait_for(|s| !s.is_loading).await.unwrap();

        app.close().await;
        state.wait_for(|s| s.error.is_some()).await.unwrap();
    }
}
