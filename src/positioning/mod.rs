//! Ordered-collection positioning
//!
//! Keeps board and card positions a dense, gap-free ranking under every
//! parent. Planning is separated from committing:
//!
//! - **`planner`** - pure function from a snapshot and a change to a plan
//! - **`store`** - the transactional collaborator the plan is committed through
//! - **`engine`** - load, plan and commit for insert, move and remove
//! - **`memory`** - in-process store with optimistic conflict detection
//!
//! # Example
//!
//! ```rust
//! use kanban::positioning::{MemoryStore, PositioningEngine};
//! use kanban::positioning::store::{ItemAttributes, NewBoard};
//! use kanban::shared::ordering::Collection;
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), kanban::shared::error::PositionError> {
//! let store = MemoryStore::new();
//! let workspace = Uuid::new_v4();
//! store.add_parent(Collection::Boards, workspace).await;
//!
//! let engine = PositioningEngine::new(store);
//! let board = engine
//!     .insert_at_end(workspace, ItemAttributes::Board(NewBoard {
//!         title: "ToDo".to_string(),
//!         description: None,
//!     }))
//!     .await?;
//! assert_eq!(board.position, 1);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod memory;
pub mod planner;
pub mod store;

pub use engine::PositioningEngine;
pub use memory::MemoryStore;
pub use planner::{plan, Change, Plan};
pub use store::{Batch, ItemAttributes, PositionStore, RowUpdate};
