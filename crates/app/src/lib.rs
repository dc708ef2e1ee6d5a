//! View-state layer for the todo app
//!
//! Controllers subscribe to the repository's live queries, hold the
//! UI-facing state, and translate user intents into repository mutations.
//! The rendering layer consumes each controller's observable state and
//! never mutates it directly.

pub mod controller;
pub mod state;
