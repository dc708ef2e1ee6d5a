//! Live query sequences
//!
//! A [`LiveQuery`] is a subscription to the store's table: it yields the
//! current matching set immediately, then one value per table change, until
//! the store is closed or dropped. Dropping the query cancels the
//! subscription.

use tokio::sync::watch;

use super::row::TaskRow;
use super::store::Published;

/// Selects a query's result out of a full-table snapshot.
type Select<T> = Box<dyn FnMut(&[TaskRow]) -> T + Send>;

/// A live sequence of query results.
///
/// `next` emits the current value on the first call and then re-emits after
/// every table change, whether or not this query's own result changed.
pub struct LiveQuery<T> {
    rx: watch::Receiver<Published>,
    select: Select<T>,
    pending_first: bool,
    ended: bool,
}

impl<T> LiveQuery<T> {
    pub(crate) fn new(rx: watch::Receiver<Published>, select: Select<T>) -> Self {
        Self {
            rx,
            select,
            pending_first: true,
            ended: false,
        }
    }

    /// Wait for the next emission.
    ///
    /// Returns `None` once the sequence has ended (the store was closed or
    /// dropped); after that every call returns `None`.
    pub async fn next(&mut self) -> Option<T> {
        if self.ended {
            return None;
        }
        if self.pending_first {
            self.pending_first = false;
        } else if self.rx.changed().await.is_err() {
            self.ended = true;
            return None;
        }
        let published = self.rx.borrow_and_update().clone();
        match published {
            Published::Rows(rows) => Some((self.select)(&rows)),
            Published::Closed => {
                self.ended = true;
                None
            }
        }
    }

    /// Adapt the element type of this sequence.
    pub fn map<U, F>(self, mut f: F) -> LiveQuery<U>
    where
        T: 'static,
        U: 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        let mut select = self.select;
        LiveQuery {
            rx: self.rx,
            select: Box::new(move |rows| f(select(rows))),
            pending_first: self.pending_first,
            ended: self.ended,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn row(id: i64) -> TaskRow {
        TaskRow {
            id,
            title: format!("Task {}", id),
            description: String::new(),
            is_completed: false,
            created_date: id,
            due_date: None,
            priority: "MEDIUM".to_string(),
        }
    }

    fn publish(tx: &watch::Sender<Published>, rows: Vec<TaskRow>) {
        tx.send_replace(Published::Rows(Arc::new(rows)));
    }

    #[tokio::test]
    async fn test_emits_current_value_on_subscribe() {
        let (tx, rx) = watch::channel(Published::Rows(Arc::new(vec![row(1)])));
        let mut query = LiveQuery::new(rx, Box::new(|rows| rows.len()));

        assert_eq!(query.next().await, Some(1));
        drop(tx);
    }

    #[tokio::test]
    async fn test_emits_on_change() {
        let (tx, rx) = watch::channel(Published::Rows(Arc::new(Vec::new())));
        let mut query = LiveQuery::new(rx, Box::new(|rows| rows.len()));

        assert_eq!(query.next().await, Some(0));
        publish(&tx, vec![row(1), row(2)]);
        assert_eq!(query.next().await, Some(2));
    }

    #[tokio::test]
    async fn test_ends_when_sender_dropped() {
        let (tx, rx) = watch::channel(Published::Rows(Arc::new(Vec::new())));
        let mut query = LiveQuery::new(rx, Box::new(|rows| rows.len()));

        assert_eq!(query.next().await, Some(0));
        drop(tx);
        assert_eq!(query.next().await, None);
        assert_eq!(query.next().await, None);
    }

    #[tokio::test]
    async fn test_ends_on_close() {
        let (tx, rx) = watch::channel(Published::Rows(Arc::new(Vec::new())));
        let mut query = LiveQuery::new(rx, Box::new(|rows| rows.len()));

        assert_eq!(query.next().await, Some(0));
        tx.send_replace(Published::Closed);
        assert_eq!(query.next().await, None);
        assert_eq!(query.next().await, None);
    }

    #[tokio::test]
    async fn test_map_adapts_elements() {
        let (tx, rx) = watch::channel(Published::Rows(Arc::new(vec![row(3)])));
        let query = LiveQuery::new(rx, Box::new(|rows: &[TaskRow]| rows.to_vec()));
        let mut titles = query.map(|rows| {
            rows.into_iter().map(|r| r.title).collect::<Vec<_>>()
        });

        assert_eq!(titles.next().await, Some(vec!["Task 3".to_string()]));
        drop(tx);
    }
}
