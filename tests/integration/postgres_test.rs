//! PostgreSQL round trips
//!
//! Run with `DATABASE_URL=... cargo test --features ssr -- --ignored`.

use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::common::database::TestDatabase;
use crate::common::{board_attributes, card_attributes};
use crate::{assert_err, assert_ok};
use kanban::backend::positions::PgPositionStore;
use kanban::backend::users::db::{search, update_profile};
use kanban::backend::workspaces::db::{boards_in_order, create_workspace};
use kanban::backend::workspaces::DEFAULT_BOARDS;
use kanban::positioning::store::{ItemAttributes, NewCard};
use kanban::positioning::{PositionStore, PositioningEngine};
use kanban::shared::error::PositionError;
use kanban::shared::ordering::{verify_dense, Collection};

async fn assert_dense_in_db(engine: &PositioningEngine<PgPositionStore>, collection: Collection, parent: Uuid) {
    let store = engine.store();
    let parent = assert_ok!(store.find_parent(collection, parent).await).expect("parent exists");
    let children = assert_ok!(store.list_by_parent(collection, parent.id).await);
    assert_ok!(verify_dense(&parent, &children));
}

async fn order(engine: &PositioningEngine<PgPositionStore>, board: Uuid) -> Vec<Uuid> {
    assert_ok!(engine.store().list_by_parent(Collection::Cards, board).await)
        .into_iter()
        .map(|c| c.id)
        .collect()
}

#[tokio::test]
#[ignore]
async fn test_insert_move_remove_round_trip() {
    let db = TestDatabase::new().await;
    let engine = PositioningEngine::new(PgPositionStore::new(db.pool().clone()));
    let workspace = db.workspace.id;

    let todo = assert_ok!(engine.insert_at_end(workspace, board_attributes("ToDo")).await);
    let done = assert_ok!(engine.insert_at_end(workspace, board_attributes("Done")).await);
    assert_eq!((todo.position, done.position), (1, 2));

    let mut cards = Vec::new();
    for title in ["a", "b", "c"] {
        cards.push(assert_ok!(engine.insert_at_end(todo.id, card_attributes(title)).await).id);
    }

    assert_ok!(engine.move_within(Collection::Cards, cards[2], 1).await);
    assert_eq!(order(&engine, todo.id).await, vec![cards[2], cards[0], cards[1]]);

    assert_ok!(
        engine
            .move_across_parents(Collection::Cards, cards[0], done.id, 1)
            .await
    );
    assert_eq!(order(&engine, todo.id).await, vec![cards[2], cards[1]]);
    assert_eq!(order(&engine, done.id).await, vec![cards[0]]);

    assert_ok!(engine.remove(Collection::Cards, cards[2]).await);
    assert_dense_in_db(&engine, Collection::Cards, todo.id).await;
    assert_dense_in_db(&engine, Collection::Cards, done.id).await;

    assert_ok!(engine.remove(Collection::Boards, todo.id).await);
    assert_dense_in_db(&engine, Collection::Boards, workspace).await;
    assert_err!(
        engine.move_within(Collection::Cards, cards[1], 1).await,
        PositionError::ItemNotFound { .. }
    );

    db.cleanup().await.expect("cleanup");
}

#[tokio::test]
#[ignore]
async fn test_card_insert_enrolls_assignee() {
    let db = TestDatabase::new().await;
    let engine = PositioningEngine::new(PgPositionStore::new(db.pool().clone()));

    let board = assert_ok!(
        engine
            .insert_at_end(db.workspace.id, board_attributes("ToDo"))
            .await
    );
    let card = assert_ok!(
        engine
            .insert_at_end(
                board.id,
                ItemAttributes::Card(NewCard {
                    title: "Assigned".to_string(),
                    description: None,
                    color: None,
                    image: None,
                    deadline: None,
                    assignee: Some(db.user_id),
                }),
            )
            .await
    );

    let assigned: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM card_members WHERE card_id = $1 AND user_id = $2)",
    )
    .bind(card.id)
    .bind(db.user_id)
    .fetch_one(db.pool())
    .await
    .expect("query");
    assert!(assigned);

    db.cleanup().await.expect("cleanup");
}

#[tokio::test]
#[ignore]
async fn test_concurrent_inserts_stay_dense() {
    let db = TestDatabase::new().await;
    let engine = PositioningEngine::new(PgPositionStore::new(db.pool().clone()));
    let board = assert_ok!(
        engine
            .insert_at_end(db.workspace.id, board_attributes("ToDo"))
            .await
    );

    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = engine.clone();
        let board_id = board.id;
        handles.push(tokio::spawn(async move {
            engine
                .insert_at_end(board_id, card_attributes(&format!("card {}", i)))
                .await
        }));
    }

    let mut inserted = 0;
    for handle in handles {
        match handle.await.expect("task") {
            Ok(_) => inserted += 1,
            Err(PositionError::Conflict { .. }) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert!(inserted >= 1);
    let parent = assert_ok!(engine.store().find_parent(Collection::Cards, board.id).await)
        .expect("board exists");
    assert_eq!(parent.last_position, inserted);
    assert_dense_in_db(&engine, Collection::Cards, board.id).await;

    db.cleanup().await.expect("cleanup");
}

#[tokio::test]
#[ignore]
async fn test_workspace_is_created_with_default_boards() {
    let db = TestDatabase::new().await;
    let engine = PositioningEngine::new(PgPositionStore::new(db.pool().clone()));

    let workspace = assert_ok!(create_workspace(db.pool(), "Seeded", db.user_id, &DEFAULT_BOARDS).await);
    assert_eq!(workspace.last_position, 3);

    let boards = assert_ok!(boards_in_order(db.pool(), workspace.id).await);
    let ranked: Vec<(&str, i32)> = boards.iter().map(|b| (b.title.as_str(), b.position)).collect();
    assert_eq!(ranked, vec![("ToDo", 1), ("Ongoing", 2), ("Finished", 3)]);
    assert_dense_in_db(&engine, Collection::Boards, workspace.id).await;

    sqlx::query("DELETE FROM workspaces WHERE id = $1")
        .bind(workspace.id)
        .execute(db.pool())
        .await
        .expect("cleanup");
    db.cleanup().await.expect("cleanup");
}

#[tokio::test]
#[ignore]
async fn test_user_search_ignores_case_on_name_and_email() {
    let db = TestDatabase::new().await;
    let marker = Uuid::new_v4().simple().to_string();
    let name = format!("Quill {}", marker);

    assert_ok!(update_profile(db.pool(), db.user_id, Some(name.as_str()), Some("quill.png")).await);

    let by_name = assert_ok!(search(db.pool(), &format!("QUILL {}", marker.to_uppercase())).await);
    assert_eq!(by_name.iter().map(|u| u.id).collect::<Vec<_>>(), vec![db.user_id]);
    assert_eq!(by_name[0].profile.as_deref(), Some("quill.png"));

    // Fixture emails are `<user id>@example.com`
    let fragment = format!("{}@EXAMPLE", db.user_id.to_string().to_uppercase());
    let by_email = assert_ok!(search(db.pool(), &fragment).await);
    assert_eq!(by_email.iter().map(|u| u.id).collect::<Vec<_>>(), vec![db.user_id]);

    let nobody = assert_ok!(search(db.pool(), &format!("%{}%nobody", marker)).await);
    assert!(nobody.is_empty());

    db.cleanup().await.expect("cleanup");
}
