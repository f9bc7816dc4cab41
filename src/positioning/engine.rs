//! Positioning Engine
//!
//! The only component allowed to write `position` and `last_position`. Each
//! operation loads fresh state from the store, plans against that snapshot,
//! and submits exactly one atomic batch. The engine does not lock, retry, or
//! authorize: conflicts surface as [`PositionError::Conflict`] and callers
//! decide whether to reload and try again.

use uuid::Uuid;

use crate::positioning::planner::{self, Change};
use crate::positioning::store::{Batch, ItemAttributes, PositionStore};
use crate::shared::error::PositionError;
use crate::shared::ordering::{Collection, OrderedItem, OrderedParent};

/// Insert, move and remove operations over a [`PositionStore`]
#[derive(Debug, Clone)]
pub struct PositioningEngine<S> {
    store: S,
}

impl<S: PositionStore> PositioningEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a new item at the end of `parent_id`
    ///
    /// The collection is implied by the attributes. Returns the stored item.
    pub async fn insert_at_end(
        &self,
        parent_id: Uuid,
        attributes: ItemAttributes,
    ) -> Result<OrderedItem, PositionError> {
        let collection = attributes.collection();
        let parent = self
            .store
            .find_parent(collection, parent_id)
            .await?
            .ok_or(PositionError::ParentNotFound {
                kind: collection.parent_kind(),
                id: parent_id,
            })?;

        let plan = planner::plan(Change::InsertAtEnd { parent: &parent })?;
        let placement = plan
            .final_placement()
            .ok_or_else(|| PositionError::persistence("insert plan has no placement"))?;

        let id = Uuid::new_v4();
        let batch = Batch::from_plan(collection, &plan, Some((id, attributes)))?;
        self.submit(batch).await?;

        tracing::info!(
            "Inserted {} {} into {} {} at position {}",
            collection.item_kind(),
            id,
            collection.parent_kind(),
            parent_id,
            placement.position
        );
        Ok(OrderedItem::new(id, parent_id, placement.position))
    }

    /// Append several items to `parent_id` in one batch
    ///
    /// Either every item lands, in the given order, or none does.
    pub async fn insert_all_at_end(
        &self,
        parent_id: Uuid,
        items: Vec<ItemAttributes>,
    ) -> Result<Vec<OrderedItem>, PositionError> {
        let collection = items
            .first()
            .map(ItemAttributes::collection)
            .ok_or_else(|| PositionError::persistence("nothing to insert"))?;
        let parent = self.load_parent(collection, parent_id).await?;

        let (batch, placed) = Batch::append_all(&parent, items)?;
        self.submit(batch).await?;

        tracing::info!(
            "Inserted {} {} into {} {}",
            placed.len(),
            collection,
            collection.parent_kind(),
            parent_id
        );
        Ok(placed)
    }

    /// Move an item to `target` inside its current parent
    ///
    /// `target` must lie in `[1, last_position]`. Moving to the current
    /// position succeeds without writing anything.
    pub async fn move_within(
        &self,
        collection: Collection,
        item_id: Uuid,
        target: i32,
    ) -> Result<OrderedItem, PositionError> {
        let item = self.load_item(collection, item_id).await?;
        let parent = self.load_parent(collection, item.parent_id).await?;
        let siblings = self.store.list_by_parent(collection, parent.id).await?;

        let plan = planner::plan(Change::MoveWithin {
            parent: &parent,
            siblings: &siblings,
            item: &item,
            target,
        })?;

        if plan.is_noop() {
            tracing::debug!(
                "{} {} already at position {}",
                collection.item_kind(),
                item_id,
                target
            );
            return Ok(item);
        }

        tracing::debug!(
            "Moving {} {} from {} to {} ({} siblings shift)",
            collection.item_kind(),
            item_id,
            item.position,
            target,
            plan.shifts.len()
        );
        self.submit(Batch::from_plan(collection, &plan, None)?).await?;
        Ok(OrderedItem::new(item_id, parent.id, target))
    }

    /// Move an item into another parent at `target`
    ///
    /// `target` must lie in `[1, target_parent.last_position + 1]`. When the
    /// target parent is the item's own parent this is [`Self::move_within`].
    pub async fn move_across_parents(
        &self,
        collection: Collection,
        item_id: Uuid,
        target_parent_id: Uuid,
        target: i32,
    ) -> Result<OrderedItem, PositionError> {
        let item = self.load_item(collection, item_id).await?;
        if item.parent_id == target_parent_id {
            return self.move_within(collection, item_id, target).await;
        }

        let source = self.load_parent(collection, item.parent_id).await?;
        let target_parent = self
            .store
            .find_parent(collection, target_parent_id)
            .await?
            .ok_or(PositionError::TargetParentNotFound {
                kind: collection.parent_kind(),
                id: target_parent_id,
            })?;

        // Both snapshots are read before planning and never re-read
        let source_siblings = self.store.list_by_parent(collection, source.id).await?;
        let target_siblings = self
            .store
            .list_by_parent(collection, target_parent.id)
            .await?;

        let plan = planner::plan(Change::MoveAcross {
            source: &source,
            source_siblings: &source_siblings,
            target_parent: &target_parent,
            target_siblings: &target_siblings,
            item: &item,
            target,
        })?;

        self.submit(Batch::from_plan(collection, &plan, None)?).await?;
        tracing::info!(
            "Moved {} {} from {} {} to {} {} at position {}",
            collection.item_kind(),
            item_id,
            collection.parent_kind(),
            source.id,
            collection.parent_kind(),
            target_parent_id,
            target
        );
        Ok(OrderedItem::new(item_id, target_parent_id, target))
    }

    /// Delete an item and close the gap it leaves
    ///
    /// Returns the item as it was before removal.
    pub async fn remove(
        &self,
        collection: Collection,
        item_id: Uuid,
    ) -> Result<OrderedItem, PositionError> {
        let item = self.load_item(collection, item_id).await?;
        let parent = self.load_parent(collection, item.parent_id).await?;
        let siblings = self.store.list_by_parent(collection, parent.id).await?;

        let plan = planner::plan(Change::Remove {
            parent: &parent,
            siblings: &siblings,
            item: &item,
        })?;

        self.submit(Batch::from_plan(collection, &plan, None)?).await?;
        tracing::info!(
            "Removed {} {} from {} {} ({} siblings shifted)",
            collection.item_kind(),
            item_id,
            collection.parent_kind(),
            parent.id,
            plan.shifts.len()
        );
        Ok(item)
    }

    async fn load_item(&self, collection: Collection, id: Uuid) -> Result<OrderedItem, PositionError> {
        self.store
            .find_item(collection, id)
            .await?
            .ok_or(PositionError::ItemNotFound {
                kind: collection.item_kind(),
                id,
            })
    }

    async fn load_parent(&self, collection: Collection, id: Uuid) -> Result<OrderedParent, PositionError> {
        self.store
            .find_parent(collection, id)
            .await?
            .ok_or(PositionError::ParentNotFound {
                kind: collection.parent_kind(),
                id,
            })
    }

    async fn submit(&self, batch: Batch) -> Result<(), PositionError> {
        let collection = batch.collection;
        self.store.apply_atomic(batch).await.map_err(|e| {
            match &e {
                PositionError::Conflict { message } => {
                    tracing::warn!("Rejected {} batch: {}", collection, message)
                }
                other => tracing::error!("Failed to apply {} batch: {}", collection, other),
            }
            e
        })
    }
}
