/**
 * PostgreSQL Position Store
 *
 * Implements `PositionStore` on top of a `PgPool`.
 *
 * # Conflict Detection
 *
 * Every UPDATE and DELETE carries the expected prior values in its WHERE
 * clause. A statement that matches zero rows means another transaction got
 * there first, and the batch is abandoned with `PositionError::Conflict`.
 * Dropping the transaction without committing rolls it back, so an abandoned
 * request never leaves siblings half shifted. `apply_in` runs a batch inside a
 * transaction the caller already holds, for writes that must commit together
 * with rows outside the ordered collections.
 *
 * SQLSTATE codes mapped to `Conflict`:
 * - `40001` serialization failure
 * - `40P01` deadlock detected
 * - `23505` unique violation (deferred `(parent, position)` check at commit)
 */

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::positioning::store::{Batch, ItemAttributes, NewItem, PositionStore, RowUpdate};
use crate::shared::error::PositionError;
use crate::shared::ordering::{Collection, OrderedItem, OrderedParent};

const CONFLICT_CODES: [&str; 3] = ["40001", "40P01", "23505"];

/// Table names behind one collection
struct Tables {
    items: &'static str,
    parent_column: &'static str,
    parents: &'static str,
}

fn tables(collection: Collection) -> Tables {
    match collection {
        Collection::Boards => Tables {
            items: "boards",
            parent_column: "workspace_id",
            parents: "workspaces",
        },
        Collection::Cards => Tables {
            items: "cards",
            parent_column: "board_id",
            parents: "boards",
        },
    }
}

/// Classify a database error for the positioning engine
pub fn map_sqlx_error(err: sqlx::Error) -> PositionError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(code) = db_err.code() {
            let code: &str = &code;
            if CONFLICT_CODES.contains(&code) {
                return PositionError::conflict(db_err.message().to_string());
            }
        }
    }
    PositionError::persistence(err.to_string())
}

fn item_from_row(row: &PgRow) -> Result<OrderedItem, sqlx::Error> {
    Ok(OrderedItem {
        id: row.try_get("id")?,
        parent_id: row.try_get("parent_id")?,
        position: row.try_get("position")?,
    })
}

/// Position store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgPositionStore {
    pool: PgPool,
}

impl PgPositionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PositionStore for PgPositionStore {
    async fn find_item(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<OrderedItem>, PositionError> {
        let t = tables(collection);
        let query = format!(
            "SELECT id, {} AS parent_id, position FROM {} WHERE id = $1",
            t.parent_column, t.items
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref()
            .map(item_from_row)
            .transpose()
            .map_err(map_sqlx_error)
    }

    async fn find_parent(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<OrderedParent>, PositionError> {
        let t = tables(collection);
        let query = format!("SELECT id, last_position FROM {} WHERE id = $1", t.parents);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(|r| -> Result<OrderedParent, sqlx::Error> {
            Ok(OrderedParent {
                id: r.try_get("id")?,
                last_position: r.try_get("last_position")?,
            })
        })
        .transpose()
        .map_err(map_sqlx_error)
    }

    async fn list_by_parent(
        &self,
        collection: Collection,
        parent_id: Uuid,
    ) -> Result<Vec<OrderedItem>, PositionError> {
        let t = tables(collection);
        let query = format!(
            "SELECT id, {col} AS parent_id, position FROM {items} WHERE {col} = $1 ORDER BY position ASC, id ASC",
            col = t.parent_column,
            items = t.items
        );
        let rows = sqlx::query(&query)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(item_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlx_error)
    }

    async fn apply_atomic(&self, batch: Batch) -> Result<(), PositionError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        apply_in(&mut tx, &batch).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        tracing::debug!(
            "Committed {} row updates to {}",
            batch.updates.len(),
            batch.collection
        );
        Ok(())
    }
}

/// Apply every update of `batch` inside a transaction the caller owns
///
/// Nothing is committed here; the caller commits or drops `tx`.
pub async fn apply_in(
    tx: &mut Transaction<'_, Postgres>,
    batch: &Batch,
) -> Result<(), PositionError> {
    for update in &batch.updates {
        apply_update(tx, batch.collection, update).await?;
    }
    Ok(())
}

async fn apply_update(
    tx: &mut Transaction<'_, Postgres>,
    collection: Collection,
    update: &RowUpdate,
) -> Result<(), PositionError> {
    let t = tables(collection);
    let affected = match update {
        RowUpdate::Parent {
            id,
            expected_last,
            last_position,
        } => {
            let query = format!(
                "UPDATE {} SET last_position = $1 WHERE id = $2 AND last_position = $3",
                t.parents
            );
            sqlx::query(&query)
                .bind(last_position)
                .bind(id)
                .bind(expected_last)
                .execute(&mut **tx)
                .await
                .map_err(map_sqlx_error)?
                .rows_affected()
        }
        RowUpdate::Reposition {
            id,
            expected,
            placement,
        } => {
            let query = format!(
                "UPDATE {items} SET {col} = $1, position = $2 WHERE id = $3 AND {col} = $4 AND position = $5",
                items = t.items,
                col = t.parent_column
            );
            sqlx::query(&query)
                .bind(placement.parent_id)
                .bind(placement.position)
                .bind(id)
                .bind(expected.parent_id)
                .bind(expected.position)
                .execute(&mut **tx)
                .await
                .map_err(map_sqlx_error)?
                .rows_affected()
        }
        RowUpdate::Insert(new_item) => insert_item(tx, new_item).await?,
        RowUpdate::Delete { id, expected } => {
            let query = format!(
                "DELETE FROM {items} WHERE id = $1 AND {col} = $2 AND position = $3",
                items = t.items,
                col = t.parent_column
            );
            sqlx::query(&query)
                .bind(id)
                .bind(expected.parent_id)
                .bind(expected.position)
                .execute(&mut **tx)
                .await
                .map_err(map_sqlx_error)?
                .rows_affected()
        }
    };

    if affected != 1 {
        return Err(PositionError::conflict(format!(
            "{} row changed since it was read: {:?}",
            collection, update
        )));
    }
    Ok(())
}

async fn insert_item(
    tx: &mut Transaction<'_, Postgres>,
    new_item: &NewItem,
) -> Result<u64, PositionError> {
    match &new_item.attributes {
        ItemAttributes::Board(board) => {
            let result = sqlx::query(
                r#"
                INSERT INTO boards (id, workspace_id, title, description, position, last_position)
                VALUES ($1, $2, $3, $4, $5, 0)
                "#,
            )
            .bind(new_item.id)
            .bind(new_item.placement.parent_id)
            .bind(&board.title)
            .bind(&board.description)
            .bind(new_item.placement.position)
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;
            Ok(result.rows_affected())
        }
        ItemAttributes::Card(card) => {
            let result = sqlx::query(
                r#"
                INSERT INTO cards (id, board_id, title, description, color, image, deadline, position)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(new_item.id)
            .bind(new_item.placement.parent_id)
            .bind(&card.title)
            .bind(&card.description)
            .bind(&card.color)
            .bind(&card.image)
            .bind(card.deadline)
            .bind(new_item.placement.position)
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;

            if let Some(assignee) = card.assignee {
                sqlx::query("INSERT INTO card_members (card_id, user_id) VALUES ($1, $2)")
                    .bind(new_item.id)
                    .bind(assignee)
                    .execute(&mut **tx)
                    .await
                    .map_err(map_sqlx_error)?;
            }
            Ok(result.rows_affected())
        }
    }
}
