//! File-backed task storage
//!
//! Stores task rows as JSON in a file on disk, keyed by id, and publishes a
//! full-table snapshot to live queries after every mutation. Mutations are
//! write-through: the file write completes before the call returns, and the
//! in-memory table is rolled back if the write fails, so observers never see
//! unpersisted state.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

use super::live::LiveQuery;
use super::model::UNASSIGNED_ID;
use super::row::TaskRow;
use crate::{Error, Result};

/// What the store pushes to its live queries.
#[derive(Clone)]
pub(crate) enum Published {
    /// Current table contents, ordered by `created_date` descending.
    Rows(Arc<Vec<TaskRow>>),
    /// The store has been closed; no further emissions.
    Closed,
}

struct Table {
    rows: HashMap<i64, TaskRow>,
    next_id: i64,
    closed: bool,
}

impl Table {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Storage("task store is closed".to_string()));
        }
        Ok(())
    }
}

/// File-backed task store with live queries
pub struct TaskStore {
    /// Path to the JSON file
    path: PathBuf,
    table: RwLock<Table>,
    published_tx: watch::Sender<Published>,
}

impl TaskStore {
    /// Open a store at the given path.
    ///
    /// If the file doesn't exist, it will be created on first write. Id
    /// assignment continues past the highest persisted id.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let rows: HashMap<i64, TaskRow> = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let rows: Vec<TaskRow> = serde_json::from_str(&content)?;
            rows.into_iter().map(|r| (r.id, r)).collect()
        } else {
            HashMap::new()
        };

        let next_id = rows.keys().max().map_or(1, |id| id + 1).max(1);
        debug!(
            "Opened task store at {} ({} tasks)",
            path.display(),
            rows.len()
        );

        let (published_tx, _) = watch::channel(Published::Rows(snapshot(&rows)));
        Ok(Self {
            path,
            table: RwLock::new(Table {
                rows,
                next_id,
                closed: false,
            }),
            published_tx,
        })
    }

    /// Insert a row, returning the id it was stored under.
    ///
    /// A row with the unassigned id gets a fresh id; a row with an assigned
    /// id replaces any existing row under that id (upsert — overwrite, not
    /// merge).
    pub async fn insert(&self, row: TaskRow) -> Result<i64> {
        let mut table = self.table.write().await;
        table.ensure_open()?;

        let mut row = row;
        if row.id == UNASSIGNED_ID {
            row.id = table.next_id;
        }
        let id = row.id;

        let replaced = table.rows.insert(id, row);
        if let Err(e) = self.persist(&table.rows).await {
            match replaced {
                Some(prev) => {
                    table.rows.insert(id, prev);
                }
                None => {
                    table.rows.remove(&id);
                }
            }
            return Err(e);
        }
        if id >= table.next_id {
            table.next_id = id + 1;
        }
        self.publish(&table);
        debug!("Inserted task {}", id);
        Ok(id)
    }

    /// Replace the full contents of an existing row.
    ///
    /// Strict semantics: updating a row that doesn't exist is
    /// [`Error::TaskNotFound`], it does not insert.
    pub async fn update(&self, row: &TaskRow) -> Result<()> {
        let mut table = self.table.write().await;
        table.ensure_open()?;

        if !table.rows.contains_key(&row.id) {
            return Err(Error::TaskNotFound(row.id));
        }
        let prev = table.rows.insert(row.id, row.clone());
        if let Err(e) = self.persist(&table.rows).await {
            if let Some(prev) = prev {
                table.rows.insert(row.id, prev);
            }
            return Err(e);
        }
        self.publish(&table);
        debug!("Updated task {}", row.id);
        Ok(())
    }

    /// Delete the row with the given id, reporting whether one existed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut table = self.table.write().await;
        table.ensure_open()?;

        let Some(prev) = table.rows.remove(&id) else {
            return Ok(false);
        };
        if let Err(e) = self.persist(&table.rows).await {
            table.rows.insert(id, prev);
            return Err(e);
        }
        self.publish(&table);
        debug!("Deleted task {}", id);
        Ok(true)
    }

    /// Delete every row.
    pub async fn delete_all(&self) -> Result<()> {
        let mut table = self.table.write().await;
        table.ensure_open()?;

        let prev = std::mem::take(&mut table.rows);
        if let Err(e) = self.persist(&table.rows).await {
            table.rows = prev;
            return Err(e);
        }
        self.publish(&table);
        info!("Cleared all tasks");
        Ok(())
    }

    /// Close the store: further mutations fail and every live query ends.
    pub async fn close(&self) {
        let mut table = self.table.write().await;
        if table.closed {
            return;
        }
        table.closed = true;
        self.published_tx.send_replace(Published::Closed);
        info!("Task store at {} closed", self.path.display());
    }

    /// Live sequence of all rows, newest creation first.
    pub fn watch_all(&self) -> LiveQuery<Vec<TaskRow>> {
        LiveQuery::new(self.published_tx.subscribe(), Box::new(|rows| rows.to_vec()))
    }

    /// Live sequence of the row with the given id; `None` while absent.
    pub fn watch_by_id(&self, id: i64) -> LiveQuery<Option<TaskRow>> {
        LiveQuery::new(
            self.published_tx.subscribe(),
            Box::new(move |rows| rows.iter().find(|r| r.id == id).cloned()),
        )
    }

    /// Live sequence of completed rows, newest creation first.
    pub fn watch_completed(&self) -> LiveQuery<Vec<TaskRow>> {
        LiveQuery::new(
            self.published_tx.subscribe(),
            Box::new(|rows| rows.iter().filter(|r| r.is_completed).cloned().collect()),
        )
    }

    /// Live sequence of incomplete rows, newest creation first.
    pub fn watch_incomplete(&self) -> LiveQuery<Vec<TaskRow>> {
        LiveQuery::new(
            self.published_tx.subscribe(),
            Box::new(|rows| rows.iter().filter(|r| !r.is_completed).cloned().collect()),
        )
    }

    /// Persist the given rows to disk. Called with the table lock held so a
    /// mutation, its write, and its publication are atomic with respect to
    /// other writers.
    async fn persist(&self, rows: &HashMap<i64, TaskRow>) -> Result<()> {
        let mut rows: Vec<&TaskRow> = rows.values().collect();
        rows.sort_by_key(|r| r.id);
        let content = serde_json::to_string_pretty(&rows)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    fn publish(&self, table: &Table) {
        self.published_tx
            .send_replace(Published::Rows(snapshot(&table.rows)));
    }
}

fn snapshot(rows: &HashMap<i64, TaskRow>) -> Arc<Vec<TaskRow>> {
    let mut rows: Vec<TaskRow> = rows.values().cloned().collect();
    rows.sort_by(|a, b| {
        b.created_date
            .cmp(&a.created_date)
            .then(b.id.cmp(&a.id))
    });
    Arc::new(rows)
}
