//! Users Module
//!
//! Self-service profile edits and user search. Accounts themselves are
//! provisioned by the authentication service.

pub mod db;
pub mod handlers;

pub use handlers::{search_users, update_user};
