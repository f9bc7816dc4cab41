//! Transactional Apply collaborator
//!
//! The positioning engine reads through [`PositionStore`] and writes a single
//! [`Batch`] per operation. A store must apply a batch all-or-nothing and must
//! reject it with [`PositionError::Conflict`] when any row no longer matches
//! the state the batch was planned against.
//!
//! # Implementations
//!
//! - `MemoryStore`: in-process store for tests and embedding
//! - `PgPositionStore` (feature `ssr`): PostgreSQL transaction per batch

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::positioning::planner::{Plan, Subject};
use crate::shared::error::PositionError;
use crate::shared::ordering::{Collection, OrderedItem, OrderedParent, Placement};

/// Read and atomic-write access to ordered collections
#[async_trait]
pub trait PositionStore: Send + Sync {
    /// Look up one item of `collection`
    async fn find_item(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<OrderedItem>, PositionError>;

    /// Look up one parent of `collection` (a workspace for boards, a board for cards)
    async fn find_parent(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<OrderedParent>, PositionError>;

    /// All children of `parent_id`, sorted by position ascending
    async fn list_by_parent(
        &self,
        collection: Collection,
        parent_id: Uuid,
    ) -> Result<Vec<OrderedItem>, PositionError>;

    /// Apply every update in `batch` or none of them
    async fn apply_atomic(&self, batch: Batch) -> Result<(), PositionError>;
}

/// Fields of a new board
#[derive(Debug, Clone, PartialEq)]
pub struct NewBoard {
    pub title: String,
    pub description: Option<String>,
}

/// Fields of a new card
#[derive(Debug, Clone, PartialEq)]
pub struct NewCard {
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub image: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    /// User enrolled as the card's first assignee
    pub assignee: Option<Uuid>,
}

/// Non-positional fields of an item being inserted
#[derive(Debug, Clone, PartialEq)]
pub enum ItemAttributes {
    Board(NewBoard),
    Card(NewCard),
}

impl ItemAttributes {
    pub fn collection(&self) -> Collection {
        match self {
            Self::Board(_) => Collection::Boards,
            Self::Card(_) => Collection::Cards,
        }
    }
}

/// A row to create as part of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub id: Uuid,
    pub placement: Placement,
    pub attributes: ItemAttributes,
}

/// One guarded row write
///
/// Every variant names the state it expects to find; a mismatch fails the
/// whole batch.
#[derive(Debug, Clone, PartialEq)]
pub enum RowUpdate {
    /// Set a parent's `last_position`, expecting `expected_last`
    Parent {
        id: Uuid,
        expected_last: i32,
        last_position: i32,
    },
    /// Move an item from `expected` to `placement`
    Reposition {
        id: Uuid,
        expected: Placement,
        placement: Placement,
    },
    /// Create an item
    Insert(NewItem),
    /// Delete an item currently at `expected`
    Delete { id: Uuid, expected: Placement },
}

/// All row writes of one positioning operation
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub collection: Collection,
    pub updates: Vec<RowUpdate>,
}

impl Batch {
    /// Translate a plan into guarded row writes
    ///
    /// Parent rows come first so stores that lock rows in order take the
    /// parent locks before any child lock. `attributes` is only consulted for
    /// insert plans.
    pub fn from_plan(
        collection: Collection,
        plan: &Plan,
        insert: Option<(Uuid, ItemAttributes)>,
    ) -> Result<Self, PositionError> {
        let mut updates = Vec::with_capacity(plan.parents.len() + plan.shifts.len() + 1);

        let mut parents = plan.parents.clone();
        parents.sort_by_key(|p| p.parent_id);
        updates.extend(parents.iter().map(|p| RowUpdate::Parent {
            id: p.parent_id,
            expected_last: p.from,
            last_position: p.to,
        }));

        // Deletes go before shifts so the vacated slot is free when siblings slide into it
        if let Subject::Remove { item_id, from } = plan.subject {
            updates.push(RowUpdate::Delete {
                id: item_id,
                expected: from,
            });
        }

        updates.extend(plan.shifts.iter().map(|s| RowUpdate::Reposition {
            id: s.item_id,
            expected: Placement::new(s.parent_id, s.from),
            placement: Placement::new(s.parent_id, s.to),
        }));

        match plan.subject {
            Subject::Move { item_id, from, to } => updates.push(RowUpdate::Reposition {
                id: item_id,
                expected: from,
                placement: to,
            }),
            Subject::Insert { placement } => {
                let (id, attributes) = insert.ok_or_else(|| {
                    PositionError::persistence("insert plan submitted without item attributes")
                })?;
                if attributes.collection() != collection {
                    return Err(PositionError::persistence(format!(
                        "cannot insert a {} into {}",
                        attributes.collection().item_kind(),
                        collection
                    )));
                }
                updates.push(RowUpdate::Insert(NewItem {
                    id,
                    placement,
                    attributes,
                }));
            }
            Subject::Remove { .. } | Subject::Unchanged { .. } => {}
        }

        Ok(Self {
            collection,
            updates,
        })
    }

    /// Append several new items to the end of `parent` in one batch
    ///
    /// The parent's `last_position` moves once, from its current value to
    /// `last_position + items.len()`, and the items take the new slots in
    /// order. Returns the batch together with the placement of each item.
    pub fn append_all(
        parent: &OrderedParent,
        items: Vec<ItemAttributes>,
    ) -> Result<(Self, Vec<OrderedItem>), PositionError> {
        let collection = items
            .first()
            .map(ItemAttributes::collection)
            .ok_or_else(|| PositionError::persistence("nothing to insert"))?;
        if let Some(stray) = items.iter().find(|a| a.collection() != collection) {
            return Err(PositionError::persistence(format!(
                "cannot insert a {} into {}",
                stray.collection().item_kind(),
                collection
            )));
        }

        let count = i32::try_from(items.len())
            .map_err(|_| PositionError::persistence("too many items in one batch"))?;
        let mut updates = Vec::with_capacity(items.len() + 1);
        updates.push(RowUpdate::Parent {
            id: parent.id,
            expected_last: parent.last_position,
            last_position: parent.last_position + count,
        });

        let mut placed = Vec::with_capacity(items.len());
        for (position, attributes) in (parent.last_position + 1..).zip(items) {
            let id = Uuid::new_v4();
            placed.push(OrderedItem::new(id, parent.id, position));
            updates.push(RowUpdate::Insert(NewItem {
                id,
                placement: Placement::new(parent.id, position),
                attributes,
            }));
        }

        Ok((
            Self {
                collection,
                updates,
            },
            placed,
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}
