//! Task module
//!
//! This module contains the task domain model, its persisted row shape,
//! the file-backed store with live queries, and the repository seam.

pub mod mapper;

mod live;
mod model;
mod repository;
mod row;
mod store;

pub use live::LiveQuery;
pub use model::*;
pub use repository::{LocalTaskRepository, TaskRepository};
pub use row::TaskRow;
pub use store::TaskStore;
