/// Local board snapshot
///
/// A `BoardSnapshot` is a plain value: cloning it captures the whole board,
/// which is how a drag remembers what to restore.

use kanban_shared::models::{card::Card, list::List};
use kanban_shared::ordering::sort_by_position;
use serde::{Deserialize, Serialize};

/// A list with its cards, cards in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListView {
    pub list: List,
    pub cards: Vec<Card>,
}

impl ListView {
    pub fn new(list: List, mut cards: Vec<Card>) -> Self {
        sort_by_position(&mut cards, |c| (c.position, c.id));
        Self { list, cards }
    }

    pub fn card_positions(&self) -> impl Iterator<Item = i32> + '_ {
        self.cards.iter().map(|c| c.position)
    }
}

/// Lists of one board, in display order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board_id: i32,
    pub lists: Vec<ListView>,
}

impl BoardSnapshot {
    /// Builds a snapshot from flat rows; cards of unknown lists are dropped
    pub fn new(board_id: i32, lists: Vec<List>, cards: Vec<Card>) -> Self {
        let mut views: Vec<ListView> = lists
            .into_iter()
            .map(|list| {
                let own: Vec<Card> = cards.iter().filter(|c| c.list_id == list.id).cloned().collect();
                ListView::new(list, own)
            })
            .collect();
        sort_by_position(&mut views, |v| (v.list.position, v.list.id));

        Self {
            board_id,
            lists: views,
        }
    }

    pub fn list(&self, list_id: i32) -> Option<&ListView> {
        self.lists.iter().find(|v| v.list.id == list_id)
    }

    fn list_mut(&mut self, list_id: i32) -> Option<&mut ListView> {
        self.lists.iter_mut().find(|v| v.list.id == list_id)
    }

    pub fn find_card(&self, card_id: i32) -> Option<&Card> {
        self.lists
            .iter()
            .flat_map(|v| v.cards.iter())
            .find(|c| c.id == card_id)
    }

    /// List ids in display order
    pub fn list_order(&self) -> Vec<i32> {
        self.lists.iter().map(|v| v.list.id).collect()
    }

    /// Moves a card to `list_id` at `position`
    ///
    /// Other cards keep their positions. Returns false when the card or the
    /// target list is not on this board.
    pub fn move_card(&mut self, card_id: i32, list_id: i32, position: i32) -> bool {
        if self.list(list_id).is_none() {
            return false;
        }

        let Some(mut card) = self.take_card(card_id) else {
            return false;
        };
        card.list_id = list_id;
        card.position = position;

        self.put_card(card)
    }

    /// Replaces a card with the server's copy, moving it if its list changed
    pub fn replace_card(&mut self, card: Card) -> bool {
        if self.list(card.list_id).is_none() || self.take_card(card.id).is_none() {
            return false;
        }
        self.put_card(card)
    }

    fn take_card(&mut self, card_id: i32) -> Option<Card> {
        self.lists.iter_mut().find_map(|v| {
            let index = v.cards.iter().position(|c| c.id == card_id)?;
            Some(v.cards.remove(index))
        })
    }

    fn put_card(&mut self, card: Card) -> bool {
        match self.list_mut(card.list_id) {
            Some(view) => {
                view.cards.push(card);
                sort_by_position(&mut view.cards, |c| (c.position, c.id));
                true
            }
            None => false,
        }
    }

    /// Assigns positions `0..n-1` to lists in `order`, then re-sorts
    ///
    /// Lists missing from `order` keep their position.
    pub fn apply_list_order(&mut self, order: &[i32]) {
        for (position, id) in (0..).zip(order) {
            if let Some(view) = self.list_mut(*id) {
                view.list.position = position;
            }
        }
        sort_by_position(&mut self.lists, |v| (v.list.position, v.list.id));
    }
}
