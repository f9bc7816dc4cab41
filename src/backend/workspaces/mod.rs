//! Workspaces Module
//!
//! Workspaces own boards and members. Creating one makes the creator its
//! admin and first member and seeds three boards, all in one transaction.

pub mod db;
pub mod handlers;

pub use handlers::{
    add_member, create_workspace, delete_workspace, get_workspace, get_workspace_members,
    list_workspaces, remove_member, rename_workspace, DEFAULT_BOARDS,
};
