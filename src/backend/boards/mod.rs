//! Boards Module
//!
//! Boards are the ordered children of a workspace. Their positions are only
//! ever written by the positioning engine; this module handles everything
//! else about them.

pub mod db;
pub mod handlers;

pub use handlers::{
    change_board_position, create_board, delete_board, get_board, list_workspace_boards,
    update_board,
};
