/// Mock transport for testing
///
/// Holds an in-memory copy of a board and applies updates to it the way the
/// server would: direct assignment, no sibling renumbering. Every request is
/// recorded, and requests for chosen ids can be made to fail.
///
/// # Example
///
/// ```
/// use kanban_client::board::BoardSnapshot;
/// use kanban_client::transport::{BoardTransport, MockTransport};
///
/// # async fn example() {
/// let transport = MockTransport::new(BoardSnapshot::default());
/// transport.fail_card(5, 403);
///
/// assert!(transport.load_board(0).await.is_ok());
/// assert!(transport.requests().len() == 1);
/// # }
/// ```

use super::transport_trait::{BoardTransport, ClientError, ClientResult};
use crate::board::BoardSnapshot;
use async_trait::async_trait;
use kanban_shared::models::{
    card::{Card, UpdateCard},
    list::{List, UpdateList},
};
use std::collections::HashMap;
use std::sync::Mutex;

/// A request seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    LoadBoard(i32),
    UpdateCard { id: i32, update: UpdateCard },
    UpdateList { id: i32, update: UpdateList },
}

#[derive(Debug, Default)]
struct MockState {
    board: BoardSnapshot,
    requests: Vec<RecordedRequest>,
    card_failures: HashMap<i32, u16>,
    list_failures: HashMap<i32, u16>,
}

/// In-memory transport
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    pub fn new(board: BoardSnapshot) -> Self {
        Self {
            state: Mutex::new(MockState {
                board,
                ..Default::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panic while holding the lock only happens in a failing test
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes every update of card `id` fail with `status`
    pub fn fail_card(&self, id: i32, status: u16) {
        self.lock().card_failures.insert(id, status);
    }

    /// Makes every update of list `id` fail with `status`
    pub fn fail_list(&self, id: i32, status: u16) {
        self.lock().list_failures.insert(id, status);
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// The mock's copy of the board
    pub fn board(&self) -> BoardSnapshot {
        self.lock().board.clone()
    }
}

fn rejected(status: u16) -> ClientError {
    ClientError::Status {
        status,
        message: "Rejected by mock".to_string(),
    }
}

fn not_found(what: String) -> ClientError {
    ClientError::Status {
        status: 404,
        message: format!("{} not found", what),
    }
}

#[async_trait]
impl BoardTransport for MockTransport {
    async fn load_board(&self, board_id: i32) -> ClientResult<BoardSnapshot> {
        let mut state = self.lock();
        state.requests.push(RecordedRequest::LoadBoard(board_id));
        Ok(state.board.clone())
    }

    async fn update_card(&self, card_id: i32, update: &UpdateCard) -> ClientResult<Card> {
        let mut state = self.lock();
        state.requests.push(RecordedRequest::UpdateCard {
            id: card_id,
            update: update.clone(),
        });

        if let Some(&status) = state.card_failures.get(&card_id) {
            return Err(rejected(status));
        }

        let mut card = state
            .board
            .find_card(card_id)
            .cloned()
            .ok_or_else(|| not_found(format!("card {}", card_id)))?;

        if let Some(title) = &update.title {
            card.title = title.clone();
        }
        if let Some(description) = &update.description {
            card.description = description.clone();
        }
        card.list_id = update.list_id.unwrap_or(card.list_id);
        card.position = update.position.unwrap_or(card.position);

        if !state.board.replace_card(card.clone()) {
            return Err(not_found(format!("list {}", card.list_id)));
        }

        Ok(card)
    }

    async fn update_list(&self, list_id: i32, update: &UpdateList) -> ClientResult<List> {
        let mut state = self.lock();
        state.requests.push(RecordedRequest::UpdateList {
            id: list_id,
            update: update.clone(),
        });

        if let Some(&status) = state.list_failures.get(&list_id) {
            return Err(rejected(status));
        }

        let view = state
            .board
            .lists
            .iter_mut()
            .find(|v| v.list.id == list_id)
            .ok_or_else(|| not_found(format!("list {}", list_id)))?;

        if let Some(title) = &update.title {
            view.list.title = title.clone();
        }
        view.list.position = update.position.unwrap_or(view.list.position);

        Ok(view.list.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::sample_board;

    #[tokio::test]
    async fn test_update_card_applies_placement() {
        let transport = MockTransport::new(sample_board());

        let card = transport
            .update_card(5, &UpdateCard::placement(2, 2))
            .await
            .unwrap();

        assert_eq!((card.list_id, card.position), (2, 2));
        assert_eq!(transport.board().find_card(5), Some(&card));
        assert_eq!(
            transport.requests(),
            vec![RecordedRequest::UpdateCard {
                id: 5,
                update: UpdateCard::placement(2, 2)
            }]
        );
    }

    #[tokio::test]
    async fn test_injected_failure_leaves_board_untouched() {
        let transport = MockTransport::new(sample_board());
        transport.fail_card(5, 403);

        let err = transport
            .update_card(5, &UpdateCard::placement(2, 2))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert_eq!(transport.board(), sample_board());
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let transport = MockTransport::new(sample_board());

        let err = transport
            .update_card(99, &UpdateCard::placement(1, 0))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));

        let err = transport
            .update_list(99, &UpdateList::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
