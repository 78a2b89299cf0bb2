//! Ordered deck of cards awaiting display.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::{CardId, CardRecord, SwipeError};

/// Insertion order is display order; the head is the only interactive card.
#[derive(Clone, Debug, Default)]
pub struct CardQueue {
    cards: IndexMap<CardId, Rc<CardRecord>>,
}

impl CardQueue {
    pub fn new(cards: impl IntoIterator<Item = CardRecord>) -> Result<Self, SwipeError> {
        let mut queue = Self::default();
        for card in cards {
            queue.push(card)?;
        }
        Ok(queue)
    }

    /// Append a card behind the current tail.
    pub fn push(&mut self, card: CardRecord) -> Result<(), SwipeError> {
        let id = card.id();
        if self.cards.contains_key(&id) {
            return Err(SwipeError::DuplicateCardId { id });
        }
        self.cards.insert(id, Rc::new(card));
        Ok(())
    }

    pub fn head(&self) -> Option<&Rc<CardRecord>> {
        self.get(0)
    }

    pub fn get(&self, index: usize) -> Option<&Rc<CardRecord>> {
        self.cards.get_index(index).map(|(_, card)| card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<CardRecord>> + '_ {
        self.cards.values()
    }

    /// The first `count` cards, head first.
    pub fn visible(&self, count: usize) -> impl Iterator<Item = &Rc<CardRecord>> + '_ {
        self.cards.values().take(count)
    }

    pub fn ids(&self) -> Vec<CardId> {
        self.cards.keys().copied().collect()
    }

    pub fn remove_head(&mut self) -> Option<Rc<CardRecord>> {
        self.cards.shift_remove_index(0).map(|(_, card)| card)
    }

    /// Remove a card wherever it sits, keeping the order of the rest.
    pub fn remove(&mut self, id: CardId) -> Option<Rc<CardRecord>> {
        self.cards.shift_remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(ids: &[CardId]) -> CardQueue {
        CardQueue::new(
            ids.iter()
                .map(|id| CardRecord::new(*id, format!("card://{id}"), format!("Card {id}"))),
        )
        .expect("unique ids")
    }

    #[test]
    fn keeps_insertion_order() {
        let queue = deck(&[3, 1, 2]);
        assert_eq!(queue.ids(), vec![3, 1, 2]);
        assert_eq!(queue.head().map(|card| card.id()), Some(3));
        assert_eq!(queue.get(2).map(|card| card.id()), Some(2));
        assert!(queue.get(3).is_none());
        let visible: Vec<_> = queue.visible(2).map(|card| card.id()).collect();
        assert_eq!(visible, vec![3, 1]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = CardQueue::new([
            CardRecord::new(1, "a", "A"),
            CardRecord::new(1, "b", "B"),
        ]);
        assert_eq!(result.unwrap_err(), SwipeError::DuplicateCardId { id: 1 });

        let mut queue = deck(&[1]);
        assert!(queue.push(CardRecord::new(1, "c", "C")).is_err());
        assert!(queue.push(CardRecord::new(2, "c", "C")).is_ok());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn remove_head_and_by_id() {
        let mut queue = deck(&[1, 2, 3, 4]);
        assert_eq!(queue.remove_head().map(|card| card.id()), Some(1));
        assert_eq!(queue.remove(3).map(|card| card.id()), Some(3));
        assert!(queue.remove(3).is_none());
        assert_eq!(queue.ids(), vec![2, 4]);
        assert!(!queue.contains(1));
    }

    #[test]
    fn empty_queue_is_tolerated() {
        let mut queue = CardQueue::default();
        assert!(queue.is_empty());
        assert!(queue.head().is_none());
        assert!(queue.remove_head().is_none());
        assert_eq!(queue.visible(2).count(), 0);
    }
}
