//! Subtasks Module
//!
//! Checkable steps on a card, editable by the card's assignees.

pub mod db;
pub mod handlers;

pub use handlers::{create_subtask, delete_subtask, update_subtask};
