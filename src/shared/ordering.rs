//! Ordered Collections
//!
//! Boards inside a workspace and cards inside a board share the same shape:
//! every item carries a 1-based `position` within its parent, and every parent
//! caches the number of children it owns in `last_position`.
//!
//! # Invariants
//!
//! For a parent with `N` children:
//! - the positions of its children are exactly `{1, 2, ..., N}`
//! - `parent.last_position == N`
//!
//! Only the positioning engine writes either field.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Which sibling scope an ordered item lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Boards ordered inside a workspace
    Boards,
    /// Cards ordered inside a board
    Cards,
}

impl Collection {
    /// Human-readable name of the items in this collection
    pub fn item_kind(&self) -> &'static str {
        match self {
            Self::Boards => "board",
            Self::Cards => "card",
        }
    }

    /// Human-readable name of the parents in this collection
    pub fn parent_kind(&self) -> &'static str {
        match self {
            Self::Boards => "workspace",
            Self::Cards => "board",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.item_kind())
    }
}

/// A parent record owning an ordered set of children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedParent {
    pub id: Uuid,
    /// Number of children, which is also the highest position in use
    pub last_position: i32,
}

/// Where an item sits: which parent, and at which rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub parent_id: Uuid,
    pub position: i32,
}

impl Placement {
    pub fn new(parent_id: Uuid, position: i32) -> Self {
        Self { parent_id, position }
    }
}

/// An item ranked among its siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedItem {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub position: i32,
}

impl OrderedItem {
    pub fn new(id: Uuid, parent_id: Uuid, position: i32) -> Self {
        Self { id, parent_id, position }
    }

    pub fn placement(&self) -> Placement {
        Placement::new(self.parent_id, self.position)
    }
}

/// A broken ordering invariant found by [`verify_dense`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DensityViolation {
    #[error("parent {parent_id} has last_position {last_position} but owns {count} children")]
    CountMismatch {
        parent_id: Uuid,
        last_position: i32,
        count: usize,
    },

    #[error("item {item_id} belongs to parent {found}, not {expected}")]
    ForeignItem {
        item_id: Uuid,
        expected: Uuid,
        found: Uuid,
    },

    #[error("parent {parent_id} has no child at position {position}")]
    Gap { parent_id: Uuid, position: i32 },
}

/// Check that `children` form a dense, duplicate-free ranking under `parent`
///
/// `children` may be in any order.
pub fn verify_dense(
    parent: &OrderedParent,
    children: &[OrderedItem],
) -> Result<(), DensityViolation> {
    if let Some(foreign) = children.iter().find(|c| c.parent_id != parent.id) {
        return Err(DensityViolation::ForeignItem {
            item_id: foreign.id,
            expected: parent.id,
            found: foreign.parent_id,
        });
    }

    if usize::try_from(parent.last_position).ok() != Some(children.len()) {
        return Err(DensityViolation::CountMismatch {
            parent_id: parent.id,
            last_position: parent.last_position,
            count: children.len(),
        });
    }

    // With N children and N distinct values in 1..=N, every slot is filled
    let mut seen = vec![false; children.len()];
    for child in children {
        let slot = usize::try_from(child.position - 1)
            .ok()
            .filter(|slot| *slot < seen.len());
        match slot {
            Some(slot) if !seen[slot] => seen[slot] = true,
            _ => break,
        }
    }

    match seen.iter().position(|filled| !filled) {
        Some(missing) => Err(DensityViolation::Gap {
            parent_id: parent.id,
            position: missing as i32 + 1,
        }),
        None => Ok(()),
    }
}
