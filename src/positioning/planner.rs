//! Reindex Planner
//!
//! Pure planning step for ordered collections. Given a snapshot of the
//! affected parents and their children, [`plan`] decides which siblings shift
//! and where the subject item lands. It never touches storage and never
//! mutates its inputs, so every rule can be unit tested without a database.
//!
//! # Rules
//!
//! - **Insert at end**: no shifts, the new item takes `last_position + 1`.
//! - **Move within a parent** to `target` in `[1, last_position]`: siblings
//!   between the old and new rank shift by one towards the vacated slot.
//! - **Move across parents** to `target` in `[1, target.last_position + 1]`:
//!   siblings after the item in the source shift down, siblings at or after
//!   `target` in the destination shift up.
//! - **Remove**: the source half of a cross-parent move.
//!
//! Shifts are computed from the snapshot alone and returned sorted by
//! `(parent_id, from)`, so the same snapshot always yields the same plan
//! whatever order its rows were fetched in.

use serde::Serialize;
use uuid::Uuid;

use crate::shared::error::PositionError;
use crate::shared::ordering::{OrderedItem, OrderedParent, Placement};

/// One sibling changing rank inside its (unchanged) parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shift {
    pub item_id: Uuid,
    pub parent_id: Uuid,
    pub from: i32,
    pub to: i32,
}

/// A parent's `last_position` changing (or being pinned, when `from == to`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParentDelta {
    pub parent_id: Uuid,
    pub from: i32,
    pub to: i32,
}

/// What happens to the item the operation is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Subject {
    /// A new item is created at `placement`
    Insert { placement: Placement },
    /// An existing item changes placement
    Move {
        item_id: Uuid,
        from: Placement,
        to: Placement,
    },
    /// An existing item is deleted from `from`
    Remove { item_id: Uuid, from: Placement },
    /// Nothing changes
    Unchanged { item_id: Uuid, at: Placement },
}

/// The full set of row changes for one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub shifts: Vec<Shift>,
    pub parents: Vec<ParentDelta>,
    pub subject: Subject,
}

impl Plan {
    /// True when applying the plan would change nothing
    pub fn is_noop(&self) -> bool {
        matches!(self.subject, Subject::Unchanged { .. })
    }

    /// The subject's placement once the plan is applied
    pub fn final_placement(&self) -> Option<Placement> {
        match self.subject {
            Subject::Insert { placement } => Some(placement),
            Subject::Move { to, .. } => Some(to),
            Subject::Unchanged { at, .. } => Some(at),
            Subject::Remove { .. } => None,
        }
    }
}

/// The operation to plan, with the snapshot it is planned against
#[derive(Debug, Clone, Copy)]
pub enum Change<'a> {
    InsertAtEnd {
        parent: &'a OrderedParent,
    },
    MoveWithin {
        parent: &'a OrderedParent,
        siblings: &'a [OrderedItem],
        item: &'a OrderedItem,
        target: i32,
    },
    MoveAcross {
        source: &'a OrderedParent,
        source_siblings: &'a [OrderedItem],
        target_parent: &'a OrderedParent,
        target_siblings: &'a [OrderedItem],
        item: &'a OrderedItem,
        target: i32,
    },
    Remove {
        parent: &'a OrderedParent,
        siblings: &'a [OrderedItem],
        item: &'a OrderedItem,
    },
}

/// Compute the plan for `change`
pub fn plan(change: Change<'_>) -> Result<Plan, PositionError> {
    match change {
        Change::InsertAtEnd { parent } => Ok(plan_insert(parent)),
        Change::MoveWithin {
            parent,
            siblings,
            item,
            target,
        } => plan_move_within(parent, siblings, item, target),
        Change::MoveAcross {
            source,
            source_siblings,
            target_parent,
            target_siblings,
            item,
            target,
        } => plan_move_across(
            source,
            source_siblings,
            target_parent,
            target_siblings,
            item,
            target,
        ),
        Change::Remove {
            parent,
            siblings,
            item,
        } => Ok(plan_remove(parent, siblings, item)),
    }
}

fn plan_insert(parent: &OrderedParent) -> Plan {
    let position = parent.last_position + 1;
    Plan {
        shifts: Vec::new(),
        parents: vec![ParentDelta {
            parent_id: parent.id,
            from: parent.last_position,
            to: position,
        }],
        subject: Subject::Insert {
            placement: Placement::new(parent.id, position),
        },
    }
}

fn plan_move_within(
    parent: &OrderedParent,
    siblings: &[OrderedItem],
    item: &OrderedItem,
    target: i32,
) -> Result<Plan, PositionError> {
    check_range(target, parent.last_position)?;

    let current = item.position;
    let shifts = if target < current {
        shift_where(siblings, item.id, 1, |p| target <= p && p < current)
    } else if target > current {
        shift_where(siblings, item.id, -1, |p| current < p && p <= target)
    } else {
        return Ok(Plan {
            shifts: Vec::new(),
            parents: Vec::new(),
            subject: Subject::Unchanged {
                item_id: item.id,
                at: item.placement(),
            },
        });
    };

    Ok(Plan {
        shifts,
        // Pinned so concurrent operations on this parent serialize on its row
        parents: vec![ParentDelta {
            parent_id: parent.id,
            from: parent.last_position,
            to: parent.last_position,
        }],
        subject: Subject::Move {
            item_id: item.id,
            from: item.placement(),
            to: Placement::new(parent.id, target),
        },
    })
}

fn plan_move_across(
    source: &OrderedParent,
    source_siblings: &[OrderedItem],
    target_parent: &OrderedParent,
    target_siblings: &[OrderedItem],
    item: &OrderedItem,
    target: i32,
) -> Result<Plan, PositionError> {
    check_range(target, target_parent.last_position + 1)?;

    let mut shifts = shift_where(source_siblings, item.id, -1, |p| p > item.position);
    shifts.extend(shift_where(target_siblings, item.id, 1, |p| p >= target));
    shifts.sort_by_key(|s| (s.parent_id, s.from));

    Ok(Plan {
        shifts,
        parents: vec![
            ParentDelta {
                parent_id: source.id,
                from: source.last_position,
                to: source.last_position - 1,
            },
            ParentDelta {
                parent_id: target_parent.id,
                from: target_parent.last_position,
                to: target_parent.last_position + 1,
            },
        ],
        subject: Subject::Move {
            item_id: item.id,
            from: item.placement(),
            to: Placement::new(target_parent.id, target),
        },
    })
}

fn plan_remove(parent: &OrderedParent, siblings: &[OrderedItem], item: &OrderedItem) -> Plan {
    Plan {
        shifts: shift_where(siblings, item.id, -1, |p| p > item.position),
        parents: vec![ParentDelta {
            parent_id: parent.id,
            from: parent.last_position,
            to: parent.last_position - 1,
        }],
        subject: Subject::Remove {
            item_id: item.id,
            from: item.placement(),
        },
    }
}

fn check_range(target: i32, max: i32) -> Result<(), PositionError> {
    if target < 1 || target > max {
        return Err(PositionError::invalid_position(target, 1, max));
    }
    Ok(())
}

/// Shift every sibling (other than `moving`) whose position matches `affected`
fn shift_where(
    siblings: &[OrderedItem],
    moving: Uuid,
    delta: i32,
    affected: impl Fn(i32) -> bool,
) -> Vec<Shift> {
    let mut shifts: Vec<Shift> = siblings
        .iter()
        .filter(|s| s.id != moving && affected(s.position))
        .map(|s| Shift {
            item_id: s.id,
            parent_id: s.parent_id,
            from: s.position,
            to: s.position + delta,
        })
        .collect();
    shifts.sort_by_key(|s| (s.parent_id, s.from));
    shifts
}
