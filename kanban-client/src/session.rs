/// Drag-and-drop session over a board snapshot
///
/// # Card Drag Lifecycle
///
/// ```text
/// Idle
///   └─> start_card_drag()           capture original card + whole board
///         └─> drop on own list      NoOp, no request        ─> Idle
///         └─> drop on another list  move locally (optimistic)
///               ├─> PATCH 2xx       keep, adopt server row  ─> Idle
///               └─> PATCH failed    restore whole board     ─> Idle
/// ```
///
/// [`BoardSession::drop_card`] runs both halves. Callers that render between
/// the optimistic move and the response use [`BoardSession::apply_card_drop`]
/// and [`BoardSession::settle_card_drop`] instead. Only one drop may wait
/// for the server at a time.
///
/// In-flight requests are never cancelled.
///
/// # List Drags
///
/// A list drop recomputes the full order and sends one `PATCH /lists/{id}`
/// per list concurrently. The local order changes only when every request
/// succeeded. On partial failure the server may hold a mix of old and new
/// positions; the session logs it and keeps the previous local order.

use crate::board::BoardSnapshot;
use crate::transport::{BoardTransport, ClientError, ClientResult};
use futures::future::join_all;
use kanban_shared::models::{
    card::{Card, UpdateCard},
    list::UpdateList,
};
use kanban_shared::ordering::{move_to_slot, next_position};

/// Result of a drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome<T> {
    /// Nothing to do; no request was sent
    NoOp,

    /// Server accepted the change
    Committed(T),

    /// The drop did not go through; local state is as it was before it
    RolledBack(ClientError),
}

/// State captured when a card drag starts
#[derive(Debug, Clone)]
struct CardDrag {
    original_card: Card,
    original_state: BoardSnapshot,
}

/// Optimistically applied card move awaiting the server's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCardDrop {
    pub card_id: i32,

    /// Body of the `PATCH /cards/{id}` to send
    pub update: UpdateCard,
}

/// A board plus the drag in progress, if any
#[derive(Debug, Clone)]
pub struct BoardSession {
    state: BoardSnapshot,
    drag: Option<CardDrag>,
    pending: Option<CardDrag>,
}

impl BoardSession {
    pub fn new(state: BoardSnapshot) -> Self {
        Self {
            state,
            drag: None,
            pending: None,
        }
    }

    /// Current local board, including unconfirmed moves
    pub fn state(&self) -> &BoardSnapshot {
        &self.state
    }

    /// Card being dragged, as it was when the drag started
    pub fn dragged_card(&self) -> Option<&Card> {
        self.drag.as_ref().map(|d| &d.original_card)
    }

    /// Captures the card and a snapshot of the whole board
    ///
    /// Starting a new drag replaces any drag not yet dropped.
    pub fn start_card_drag(&mut self, card_id: i32) -> ClientResult<()> {
        let original_card = self
            .state
            .find_card(card_id)
            .cloned()
            .ok_or_else(|| ClientError::NotOnBoard(format!("card {}", card_id)))?;

        self.drag = Some(CardDrag {
            original_card,
            original_state: self.state.clone(),
        });

        Ok(())
    }

    /// Optimistic half of a drop
    ///
    /// Moves the dragged card to the end of `target_list` locally and returns
    /// the request to send. Returns `Ok(None)`, and ends the drag, when
    /// nothing is being dragged, the target is the card's own list, or the
    /// target is not on this board.
    ///
    /// # Errors
    ///
    /// - `DropPending`: the previous drop is not settled; the drag is kept
    /// - `Order`: the target list has no position left; the drag ends and
    ///   the board is untouched
    pub fn apply_card_drop(&mut self, target_list: i32) -> ClientResult<Option<PendingCardDrop>> {
        if self.pending.is_some() {
            return Err(ClientError::DropPending);
        }

        let Some(drag) = self.drag.take() else {
            return Ok(None);
        };
        let card = &drag.original_card;

        if card.list_id == target_list {
            return Ok(None);
        }

        let Some(target) = self.state.list(target_list) else {
            return Ok(None);
        };
        let position = next_position(target.card_positions())?;

        if !self.state.move_card(card.id, target_list, position) {
            return Ok(None);
        }

        tracing::debug!(
            card_id = card.id,
            from = card.list_id,
            to = target_list,
            position,
            "Card moved optimistically"
        );

        let pending = PendingCardDrop {
            card_id: card.id,
            update: UpdateCard::placement(target_list, position),
        };
        self.pending = Some(drag);

        Ok(Some(pending))
    }

    /// Confirming half of a drop
    ///
    /// On success the server's copy of the card replaces the local one. On
    /// failure the whole board captured at drag start is restored.
    pub fn settle_card_drop(&mut self, result: ClientResult<Card>) -> DropOutcome<Card> {
        let Some(drag) = self.pending.take() else {
            return DropOutcome::NoOp;
        };

        match result {
            Ok(card) => {
                self.state.replace_card(card.clone());
                DropOutcome::Committed(card)
            }
            Err(e) => {
                tracing::warn!(
                    card_id = drag.original_card.id,
                    error = %e,
                    "Card move rejected, restoring board"
                );
                self.state = drag.original_state;
                DropOutcome::RolledBack(e)
            }
        }
    }

    /// Drops the dragged card on `target_list` and persists the move
    pub async fn drop_card<T>(&mut self, target_list: i32, transport: &T) -> DropOutcome<Card>
    where
        T: BoardTransport + ?Sized,
    {
        let pending = match self.apply_card_drop(target_list) {
            Ok(Some(pending)) => pending,
            Ok(None) => return DropOutcome::NoOp,
            Err(e) => return DropOutcome::RolledBack(e),
        };

        let result = transport.update_card(pending.card_id, &pending.update).await;
        self.settle_card_drop(result)
    }

    /// Drops list `dragged` onto list `target`, taking the target's slot
    ///
    /// Returns the committed order of list ids.
    pub async fn drop_list<T>(
        &mut self,
        dragged: i32,
        target: i32,
        transport: &T,
    ) -> DropOutcome<Vec<i32>>
    where
        T: BoardTransport + ?Sized,
    {
        let Some(order) = move_to_slot(&self.state.list_order(), dragged, target) else {
            return DropOutcome::NoOp;
        };

        let requests = (0..).zip(&order).map(|(position, &list_id)| {
            let update = UpdateList {
                position: Some(position),
                ..Default::default()
            };
            async move { transport.update_list(list_id, &update).await }
        });

        let failures: Vec<ClientError> = join_all(requests)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if let Some(first) = failures.into_iter().next() {
            tracing::warn!(
                board_id = self.state.board_id,
                dragged,
                error = %first,
                "List reorder failed; server order may be partially updated"
            );
            return DropOutcome::RolledBack(first);
        }

        self.state.apply_list_order(&order);
        DropOutcome::Committed(order)
    }
}
