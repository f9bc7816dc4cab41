//! Cards Module
//!
//! Cards are the ordered children of a board. Creating, reordering, moving
//! between boards and deleting go through the positioning engine; the
//! remaining card fields and assignees are handled here.

pub mod db;
pub mod handlers;

pub use handlers::{
    add_card_member, change_card_position, create_card, delete_card, get_card,
    list_board_cards, move_card, update_card,
};
