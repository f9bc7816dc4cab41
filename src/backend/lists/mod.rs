//! Lists Module
//!
//! Checklists attached to a card. Lists are not ranked; they come back in
//! creation order.

pub mod db;
pub mod handlers;

pub use handlers::{create_list, delete_list, get_list, list_card_lists, update_list};
