//! In-memory fixtures for engine tests

use kanban::positioning::store::{ItemAttributes, NewBoard, NewCard};
use kanban::positioning::{MemoryStore, PositioningEngine};
use kanban::shared::ordering::Collection;
use uuid::Uuid;

pub fn board_attributes(title: &str) -> ItemAttributes {
    ItemAttributes::Board(NewBoard {
        title: title.to_string(),
        description: None,
    })
}

pub fn card_attributes(title: &str) -> ItemAttributes {
    ItemAttributes::Card(NewCard {
        title: title.to_string(),
        description: None,
        color: None,
        image: None,
        deadline: None,
        assignee: None,
    })
}

/// A workspace with some boards, each holding some cards
pub struct Kanban {
    pub engine: PositioningEngine<MemoryStore>,
    pub workspace: Uuid,
    pub boards: Vec<Uuid>,
    pub cards: Vec<Vec<Uuid>>,
}

impl Kanban {
    /// `layout[i]` is the number of cards on board `i`
    pub async fn with_layout(layout: &[usize]) -> Self {
        let store = MemoryStore::new();
        let workspace = Uuid::new_v4();
        store.add_parent(Collection::Boards, workspace).await;
        let engine = PositioningEngine::new(store);

        let mut boards = Vec::new();
        let mut cards = Vec::new();
        for (b, count) in layout.iter().enumerate() {
            let board = engine
                .insert_at_end(workspace, board_attributes(&format!("Board {}", b)))
                .await
                .expect("board insert");
            let mut ids = Vec::new();
            for c in 0..*count {
                let card = engine
                    .insert_at_end(board.id, card_attributes(&format!("Card {}.{}", b, c)))
                    .await
                    .expect("card insert");
                ids.push(card.id);
            }
            boards.push(board.id);
            cards.push(ids);
        }

        Self {
            engine,
            workspace,
            boards,
            cards,
        }
    }

    pub fn store(&self) -> &MemoryStore {
        self.engine.store()
    }

    /// Card ids of a board in position order
    pub async fn order(&self, board: Uuid) -> Vec<Uuid> {
        self.store()
            .children(Collection::Cards, board)
            .await
            .into_iter()
            .map(|card| card.id)
            .collect()
    }

    pub async fn last_position(&self, collection: Collection, parent: Uuid) -> i32 {
        use kanban::positioning::PositionStore;

        self.store()
            .find_parent(collection, parent)
            .await
            .expect("parent lookup")
            .map(|p| p.last_position)
            .unwrap_or(0)
    }
}
