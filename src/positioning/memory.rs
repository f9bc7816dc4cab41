//! In-memory position store
//!
//! A [`PositionStore`] backed by hash maps behind a `tokio::sync::RwLock`.
//! Batches are applied to a working copy and swapped in only when every
//! guarded row matched and every touched parent still has unique positions,
//! which mirrors the deferred `UNIQUE (parent, position)` constraint of the
//! Postgres schema.
//!
//! Parents of the `Cards` collection are boards, which are themselves items of
//! the `Boards` collection, so inserting a board also registers it as a card
//! parent and deleting a board cascades to its cards.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::positioning::store::{Batch, ItemAttributes, PositionStore, RowUpdate};
use crate::shared::error::PositionError;
use crate::shared::ordering::{verify_dense, Collection, DensityViolation, OrderedItem, OrderedParent};

#[derive(Debug, Default, Clone)]
struct MemoryState {
    parents: HashMap<(Collection, Uuid), i32>,
    items: HashMap<(Collection, Uuid), OrderedItem>,
    attributes: HashMap<Uuid, ItemAttributes>,
}

impl MemoryState {
    fn children(&self, collection: Collection, parent_id: Uuid) -> Vec<OrderedItem> {
        let mut children: Vec<OrderedItem> = self
            .items
            .iter()
            .filter(|((c, _), item)| *c == collection && item.parent_id == parent_id)
            .map(|(_, item)| *item)
            .collect();
        children.sort_by_key(|item| (item.position, item.id));
        children
    }

    fn apply(&mut self, collection: Collection, update: &RowUpdate) -> Result<(), PositionError> {
        match update {
            RowUpdate::Parent {
                id,
                expected_last,
                last_position,
            } => {
                let current = self.parents.get_mut(&(collection, *id)).ok_or_else(|| {
                    PositionError::conflict(format!("{} {} disappeared", collection.parent_kind(), id))
                })?;
                if *current != *expected_last {
                    return Err(PositionError::conflict(format!(
                        "{} {} has last position {}, expected {}",
                        collection.parent_kind(),
                        id,
                        current,
                        expected_last
                    )));
                }
                *current = *last_position;
            }
            RowUpdate::Reposition {
                id,
                expected,
                placement,
            } => {
                let item = self.items.get_mut(&(collection, *id)).ok_or_else(|| {
                    PositionError::conflict(format!("{} {} disappeared", collection.item_kind(), id))
                })?;
                if item.placement() != *expected {
                    return Err(PositionError::conflict(format!(
                        "{} {} moved concurrently",
                        collection.item_kind(),
                        id
                    )));
                }
                item.parent_id = placement.parent_id;
                item.position = placement.position;
            }
            RowUpdate::Insert(new_item) => {
                if !self.parents.contains_key(&(collection, new_item.placement.parent_id)) {
                    return Err(PositionError::conflict(format!(
                        "{} {} disappeared",
                        collection.parent_kind(),
                        new_item.placement.parent_id
                    )));
                }
                if self.items.contains_key(&(collection, new_item.id)) {
                    return Err(PositionError::conflict(format!(
                        "{} {} already exists",
                        collection.item_kind(),
                        new_item.id
                    )));
                }
                self.items.insert(
                    (collection, new_item.id),
                    OrderedItem::new(
                        new_item.id,
                        new_item.placement.parent_id,
                        new_item.placement.position,
                    ),
                );
                self.attributes
                    .insert(new_item.id, new_item.attributes.clone());
                if collection == Collection::Boards {
                    self.parents.insert((Collection::Cards, new_item.id), 0);
                }
            }
            RowUpdate::Delete { id, expected } => {
                let current = self.items.get(&(collection, *id)).map(|item| item.placement());
                if current != Some(*expected) {
                    return Err(PositionError::conflict(format!(
                        "{} {} changed before removal",
                        collection.item_kind(),
                        id
                    )));
                }
                self.items.remove(&(collection, *id));
                self.attributes.remove(id);
                if collection == Collection::Boards {
                    self.drop_parent(Collection::Cards, *id);
                }
            }
        }
        Ok(())
    }

    fn drop_parent(&mut self, collection: Collection, parent_id: Uuid) {
        self.parents.remove(&(collection, parent_id));
        let orphans: Vec<Uuid> = self
            .children(collection, parent_id)
            .into_iter()
            .map(|item| item.id)
            .collect();
        for orphan in orphans {
            self.items.remove(&(collection, orphan));
            self.attributes.remove(&orphan);
            if collection == Collection::Boards {
                self.drop_parent(Collection::Cards, orphan);
            }
        }
    }

    /// Reject duplicate or non-positive positions under any touched parent
    fn check_unique(&self, collection: Collection, touched: &HashSet<Uuid>) -> Result<(), PositionError> {
        for parent_id in touched {
            let mut seen = HashSet::new();
            for child in self.children(collection, *parent_id) {
                if child.position < 1 || !seen.insert(child.position) {
                    return Err(PositionError::conflict(format!(
                        "{} {} would hold two {} at position {}",
                        collection.parent_kind(),
                        parent_id,
                        collection,
                        child.position
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Shared in-memory store; clones see the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty parent, e.g. a freshly created workspace
    pub async fn add_parent(&self, collection: Collection, id: Uuid) -> OrderedParent {
        let mut state = self.state.write().await;
        let last_position = *state.parents.entry((collection, id)).or_insert(0);
        OrderedParent { id, last_position }
    }

    /// Remove a parent and everything ordered beneath it
    pub async fn remove_parent(&self, collection: Collection, id: Uuid) {
        self.state.write().await.drop_parent(collection, id);
    }

    /// Children of `parent_id` in position order
    pub async fn children(&self, collection: Collection, parent_id: Uuid) -> Vec<OrderedItem> {
        self.state.read().await.children(collection, parent_id)
    }

    pub async fn attributes(&self, id: Uuid) -> Option<ItemAttributes> {
        self.state.read().await.attributes.get(&id).cloned()
    }

    /// Check the density invariants of one parent
    pub async fn verify(&self, collection: Collection, parent_id: Uuid) -> Result<(), DensityViolation> {
        let state = self.state.read().await;
        let last_position = state.parents.get(&(collection, parent_id)).copied().unwrap_or(0);
        let parent = OrderedParent {
            id: parent_id,
            last_position,
        };
        verify_dense(&parent, &state.children(collection, parent_id))
    }
}

#[async_trait]
impl PositionStore for MemoryStore {
    async fn find_item(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<OrderedItem>, PositionError> {
        Ok(self.state.read().await.items.get(&(collection, id)).copied())
    }

    async fn find_parent(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<OrderedParent>, PositionError> {
        let state = self.state.read().await;
        Ok(state
            .parents
            .get(&(collection, id))
            .map(|last_position| OrderedParent {
                id,
                last_position: *last_position,
            }))
    }

    async fn list_by_parent(
        &self,
        collection: Collection,
        parent_id: Uuid,
    ) -> Result<Vec<OrderedItem>, PositionError> {
        Ok(self.state.read().await.children(collection, parent_id))
    }

    async fn apply_atomic(&self, batch: Batch) -> Result<(), PositionError> {
        let mut state = self.state.write().await;
        let mut working = state.clone();
        let mut touched = HashSet::new();

        for update in &batch.updates {
            working.apply(batch.collection, update)?;
            match update {
                RowUpdate::Parent { id, .. } => {
                    touched.insert(*id);
                }
                RowUpdate::Reposition {
                    expected, placement, ..
                } => {
                    touched.insert(expected.parent_id);
                    touched.insert(placement.parent_id);
                }
                RowUpdate::Insert(new_item) => {
                    touched.insert(new_item.placement.parent_id);
                }
                RowUpdate::Delete { expected, .. } => {
                    touched.insert(expected.parent_id);
                }
            }
        }

        working.check_unique(batch.collection, &touched)?;
        *state = working;
        tracing::debug!(
            "Applied {} row updates to {}",
            batch.updates.len(),
            batch.collection
        );
        Ok(())
    }
}
