//! Positioning engine scenarios over the in-memory store

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::common::{board_attributes, card_attributes, Kanban};
use crate::{assert_dense, assert_err, assert_ok};
use kanban::shared::error::PositionError;
use kanban::shared::ordering::Collection;

#[tokio::test]
async fn test_new_workspace_boards_are_ranked_in_order() {
    let kanban = Kanban::with_layout(&[0, 0, 0]).await;

    let boards: Vec<(Uuid, i32)> = kanban
        .store()
        .children(Collection::Boards, kanban.workspace)
        .await
        .into_iter()
        .map(|b| (b.id, b.position))
        .collect();
    assert_eq!(
        boards,
        vec![(kanban.boards[0], 1), (kanban.boards[1], 2), (kanban.boards[2], 3)]
    );
    assert_eq!(kanban.last_position(Collection::Boards, kanban.workspace).await, 3);
}

#[tokio::test]
async fn test_move_card_up_within_board() {
    let kanban = Kanban::with_layout(&[4]).await;
    let board = kanban.boards[0];
    let [a, b, c, d] = [kanban.cards[0][0], kanban.cards[0][1], kanban.cards[0][2], kanban.cards[0][3]];

    let moved = assert_ok!(kanban.engine.move_within(Collection::Cards, d, 2).await);
    assert_eq!(moved.position, 2);
    assert_eq!(kanban.order(board).await, vec![a, d, b, c]);
    assert_eq!(kanban.last_position(Collection::Cards, board).await, 4);
    assert_dense!(kanban.store(), Collection::Cards, board);
}

#[tokio::test]
async fn test_move_and_move_back_restores_order() {
    let kanban = Kanban::with_layout(&[5]).await;
    let board = kanban.boards[0];
    let before = kanban.order(board).await;

    for (from, to) in [(1, 5), (5, 1), (2, 4), (4, 2), (3, 3)] {
        let item = before[from as usize - 1];
        assert_ok!(kanban.engine.move_within(Collection::Cards, item, to).await);
        assert_ok!(kanban.engine.move_within(Collection::Cards, item, from).await);

        assert_eq!(kanban.order(board).await, before, "after {} -> {} -> {}", from, to, from);
        assert_eq!(kanban.last_position(Collection::Cards, board).await, 5);
        assert_dense!(kanban.store(), Collection::Cards, board);
    }
}

#[tokio::test]
async fn test_move_to_current_position_changes_nothing() {
    let kanban = Kanban::with_layout(&[3]).await;
    let board = kanban.boards[0];
    let before = kanban.store().children(Collection::Cards, board).await;
    let last_before = kanban.last_position(Collection::Cards, board).await;

    let moved = assert_ok!(kanban.engine.move_within(Collection::Cards, before[1].id, 2).await);
    assert_eq!(moved, before[1]);

    assert_eq!(kanban.store().children(Collection::Cards, board).await, before);
    assert_eq!(kanban.last_position(Collection::Cards, board).await, last_before);
}

#[tokio::test]
async fn test_move_card_down_within_board() {
    let kanban = Kanban::with_layout(&[4]).await;
    let board = kanban.boards[0];
    let [a, b, c, d] = [kanban.cards[0][0], kanban.cards[0][1], kanban.cards[0][2], kanban.cards[0][3]];

    assert_ok!(kanban.engine.move_within(Collection::Cards, a, 3).await);
    assert_eq!(kanban.order(board).await, vec![b, c, a, d]);
    assert_dense!(kanban.store(), Collection::Cards, board);
}

#[tokio::test]
async fn test_move_within_rejects_out_of_range_and_changes_nothing() {
    let kanban = Kanban::with_layout(&[3]).await;
    let board = kanban.boards[0];
    let before = kanban.order(board).await;

    assert_err!(
        kanban.engine.move_within(Collection::Cards, before[0], 5).await,
        PositionError::InvalidPosition { requested: 5, min: 1, max: 3 }
    );
    assert_err!(
        kanban.engine.move_within(Collection::Cards, before[0], 0).await,
        PositionError::InvalidPosition { .. }
    );
    assert_eq!(kanban.order(board).await, before);
}

#[tokio::test]
async fn test_move_card_to_other_board() {
    let kanban = Kanban::with_layout(&[3, 2]).await;
    let (source, target) = (kanban.boards[0], kanban.boards[1]);
    let (a, b, c) = (kanban.cards[0][0], kanban.cards[0][1], kanban.cards[0][2]);
    let (x, y) = (kanban.cards[1][0], kanban.cards[1][1]);

    let moved = assert_ok!(
        kanban
            .engine
            .move_across_parents(Collection::Cards, b, target, 2)
            .await
    );
    assert_eq!((moved.parent_id, moved.position), (target, 2));

    assert_eq!(kanban.order(source).await, vec![a, c]);
    assert_eq!(kanban.order(target).await, vec![x, b, y]);
    assert_eq!(kanban.last_position(Collection::Cards, source).await, 2);
    assert_eq!(kanban.last_position(Collection::Cards, target).await, 3);
    assert_dense!(kanban.store(), Collection::Cards, source);
    assert_dense!(kanban.store(), Collection::Cards, target);
}

#[tokio::test]
async fn test_move_into_empty_board_and_append_slot() {
    let kanban = Kanban::with_layout(&[2, 0]).await;
    let (source, target) = (kanban.boards[0], kanban.boards[1]);
    let (a, b) = (kanban.cards[0][0], kanban.cards[0][1]);

    assert_err!(
        kanban
            .engine
            .move_across_parents(Collection::Cards, a, target, 2)
            .await,
        PositionError::InvalidPosition { max: 1, .. }
    );

    assert_ok!(
        kanban
            .engine
            .move_across_parents(Collection::Cards, a, target, 1)
            .await
    );
    assert_ok!(
        kanban
            .engine
            .move_across_parents(Collection::Cards, b, target, 2)
            .await
    );
    assert!(kanban.order(source).await.is_empty());
    assert_eq!(kanban.order(target).await, vec![a, b]);
    assert_eq!(kanban.last_position(Collection::Cards, source).await, 0);
}

#[tokio::test]
async fn test_remove_closes_the_gap() {
    let kanban = Kanban::with_layout(&[4]).await;
    let board = kanban.boards[0];
    let ids = kanban.cards[0].clone();

    let removed = assert_ok!(kanban.engine.remove(Collection::Cards, ids[1]).await);
    assert_eq!(removed.position, 2);
    assert_eq!(kanban.order(board).await, vec![ids[0], ids[2], ids[3]]);
    assert_eq!(kanban.last_position(Collection::Cards, board).await, 3);
    assert_dense!(kanban.store(), Collection::Cards, board);
}

#[tokio::test]
async fn test_removing_board_drops_its_cards_and_renumbers_boards() {
    let kanban = Kanban::with_layout(&[1, 2, 1]).await;
    let doomed = kanban.boards[1];

    assert_ok!(kanban.engine.remove(Collection::Boards, doomed).await);

    let boards = kanban
        .store()
        .children(Collection::Boards, kanban.workspace)
        .await;
    assert_eq!(
        boards.iter().map(|b| (b.id, b.position)).collect::<Vec<_>>(),
        vec![(kanban.boards[0], 1), (kanban.boards[2], 2)]
    );
    assert!(kanban.order(doomed).await.is_empty());
    assert_err!(
        kanban
            .engine
            .move_within(Collection::Cards, kanban.cards[1][0], 1)
            .await,
        PositionError::ItemNotFound { .. }
    );
    assert_dense!(kanban.store(), Collection::Boards, kanban.workspace);
}

#[tokio::test]
async fn test_insert_card_into_deleted_board_is_not_found() {
    let kanban = Kanban::with_layout(&[0]).await;
    let board = kanban.boards[0];
    assert_ok!(kanban.engine.remove(Collection::Boards, board).await);

    let result = kanban.engine.insert_at_end(board, card_attributes("late")).await;
    assert_matches!(result, Err(PositionError::ParentNotFound { kind: "board", id }) if id == board);
}

#[tokio::test]
async fn test_board_insert_keeps_attributes() {
    let kanban = Kanban::with_layout(&[]).await;
    let board = assert_ok!(
        kanban
            .engine
            .insert_at_end(kanban.workspace, board_attributes("Backlog"))
            .await
    );

    assert_eq!(board.position, 1);
    assert_eq!(
        kanban.store().attributes(board.id).await,
        Some(board_attributes("Backlog"))
    );
}
