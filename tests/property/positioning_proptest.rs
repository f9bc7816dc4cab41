//! Random operation sequences against a reference model
//!
//! The model is a plain `Vec<Uuid>` per board. After every operation the
//! store must hold exactly the model's order, every board must be dense, and
//! rejected operations must leave the store untouched.

use proptest::prelude::*;
use uuid::Uuid;

use crate::common::{card_attributes, Kanban};
use kanban::shared::error::PositionError;
use kanban::shared::ordering::Collection;

const BOARDS: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    Insert { board: usize },
    MoveWithin { card: usize, target: i32 },
    MoveAcross { card: usize, board: usize, target: i32 },
    Remove { card: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..BOARDS).prop_map(|board| Op::Insert { board }),
        2 => (any::<usize>(), -1..10i32).prop_map(|(card, target)| Op::MoveWithin { card, target }),
        2 => (any::<usize>(), 0..BOARDS, -1..10i32)
            .prop_map(|(card, board, target)| Op::MoveAcross { card, board, target }),
        1 => any::<usize>().prop_map(|card| Op::Remove { card }),
    ]
}

/// Board index and slot of the `n`th card across all boards
fn locate(model: &[Vec<Uuid>], n: usize) -> Option<(usize, usize)> {
    let total: usize = model.iter().map(Vec::len).sum();
    if total == 0 {
        return None;
    }
    let mut n = n % total;
    for (b, cards) in model.iter().enumerate() {
        if n < cards.len() {
            return Some((b, n));
        }
        n -= cards.len();
    }
    None
}

fn in_range(target: i32, max: usize) -> bool {
    target >= 1 && target as usize <= max
}

async fn run(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let kanban = Kanban::with_layout(&[0; BOARDS]).await;
    let mut model: Vec<Vec<Uuid>> = vec![Vec::new(); BOARDS];

    for op in ops {
        let result: Result<(), PositionError> = match op {
            Op::Insert { board } => {
                let item = kanban
                    .engine
                    .insert_at_end(kanban.boards[board], card_attributes("card"))
                    .await;
                if let Ok(item) = &item {
                    prop_assert_eq!(item.position as usize, model[board].len() + 1);
                    model[board].push(item.id);
                }
                item.map(|_| ())
            }
            Op::MoveWithin { card, target } => {
                let Some((b, slot)) = locate(&model, card) else { continue };
                let id = model[b][slot];
                let result = kanban.engine.move_within(Collection::Cards, id, target).await;
                if in_range(target, model[b].len()) {
                    prop_assert!(result.is_ok(), "{:?}", result);
                    model[b].remove(slot);
                    model[b].insert(target as usize - 1, id);
                } else {
                    prop_assert!(
                        matches!(result, Err(PositionError::InvalidPosition { .. })),
                        "{:?}",
                        result
                    );
                }
                result.map(|_| ())
            }
            Op::MoveAcross { card, board, target } => {
                let Some((b, slot)) = locate(&model, card) else { continue };
                let id = model[b][slot];
                let result = kanban
                    .engine
                    .move_across_parents(Collection::Cards, id, kanban.boards[board], target)
                    .await;
                let max = if board == b { model[b].len() } else { model[board].len() + 1 };
                if in_range(target, max) {
                    prop_assert!(result.is_ok(), "{:?}", result);
                    model[b].remove(slot);
                    model[board].insert(target as usize - 1, id);
                } else {
                    prop_assert!(
                        matches!(result, Err(PositionError::InvalidPosition { .. })),
                        "{:?}",
                        result
                    );
                }
                result.map(|_| ())
            }
            Op::Remove { card } => {
                let Some((b, slot)) = locate(&model, card) else { continue };
                let id = model[b].remove(slot);
                kanban.engine.remove(Collection::Cards, id).await.map(|_| ())
            }
        };

        prop_assert!(
            !matches!(result, Err(PositionError::Conflict { .. })),
            "sequential operations never conflict"
        );

        for (b, board) in kanban.boards.iter().enumerate() {
            prop_assert_eq!(&kanban.order(*board).await, &model[b]);
            prop_assert_eq!(
                kanban.last_position(Collection::Cards, *board).await as usize,
                model[b].len()
            );
            prop_assert!(kanban.store().verify(Collection::Cards, *board).await.is_ok());
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_random_operations_keep_every_board_dense(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(run(ops))?;
    }

    #[test]
    fn prop_out_of_range_moves_change_nothing(target in prop_oneof![-5..1i32, 4..20i32]) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let kanban = Kanban::with_layout(&[3]).await;
            let board = kanban.boards[0];
            let before = kanban.order(board).await;

            let result = kanban.engine.move_within(Collection::Cards, before[0], target).await;
            let is_invalid = matches!(result, Err(PositionError::InvalidPosition { .. }));
            prop_assert!(is_invalid);
            prop_assert_eq!(kanban.order(board).await, before);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
