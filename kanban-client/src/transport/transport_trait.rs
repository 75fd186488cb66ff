/// Core transport trait and error type
///
/// # Contract
///
/// Implementations must:
/// 1. Issue exactly one request per `update_card` / `update_list` call
/// 2. Return the server's copy of the row on a 2xx response
/// 3. Map every non-2xx response and every network failure to `ClientError`
///
/// Requests are never retried or cancelled.

use crate::board::BoardSnapshot;
use async_trait::async_trait;
use kanban_shared::models::{
    card::{Card, UpdateCard},
    list::{List, UpdateList},
};
use kanban_shared::ordering::OrderError;

/// Client error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Server answered with a non-2xx status
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Request never got a response
    #[error("Request failed: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Card or list is not on the local board
    #[error("{0} is not on this board")]
    NotOnBoard(String),

    /// No local position is left for the dropped card
    #[error("Cannot place card: {0}")]
    Order(#[from] OrderError),

    /// An earlier drop has not been settled yet
    #[error("A card drop is still waiting for the server")]
    DropPending,
}

impl ClientError {
    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

/// Persists drops and loads boards
#[async_trait]
pub trait BoardTransport: Send + Sync {
    /// Loads a board with all of its lists and cards
    async fn load_board(&self, board_id: i32) -> ClientResult<BoardSnapshot>;

    /// `PATCH /api/cards/{id}`
    async fn update_card(&self, card_id: i32, update: &UpdateCard) -> ClientResult<Card>;

    /// `PATCH /api/lists/{id}`
    async fn update_list(&self, list_id: i32, update: &UpdateList) -> ClientResult<List>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_status() {
        let err = ClientError::Status {
            status: 403,
            message: "Not authorized to access this resource".to_string(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(
            err.to_string(),
            "Server returned 403: Not authorized to access this resource"
        );

        assert_eq!(ClientError::Network("refused".to_string()).status(), None);
    }
}
