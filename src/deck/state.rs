//! Working deck: membership, identity and the add/remove rules.

use serde::{Deserialize, Serialize};

use crate::data::character::CharacterId;
use crate::data::deck::Deck;
use crate::deck::catalog::CharacterCatalog;
use crate::deck::error::DeckError;

pub const MAX_DECK_SIZE: usize = 6;

/// `Unsaved` until the first successful commit; serialized as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeckId {
    #[default]
    Unsaved,
    Saved(u64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckState {
    id: DeckId,
    name: String,
    member_ids: Vec<CharacterId>,
}

impl DeckState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DeckId::Unsaved,
            name: name.into(),
            member_ids: Vec::new(),
        }
    }

    pub fn id(&self) -> DeckId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slot order. Significant for display only.
    pub fn member_ids(&self) -> &[CharacterId] {
        &self.member_ids
    }

    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.member_ids.contains(&id)
    }

    pub fn is_full(&self) -> bool {
        self.member_ids.len() >= MAX_DECK_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }

    pub fn is_saved(&self) -> bool {
        matches!(self.id, DeckId::Saved(_))
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Appends `id` to the last slot. Checked in order: capacity, duplicate, catalog membership.
    pub fn add_member(
        &mut self,
        id: CharacterId,
        catalog: &CharacterCatalog,
    ) -> Result<(), DeckError> {
        if self.is_full() {
            return Err(DeckError::DeckFull {
                capacity: MAX_DECK_SIZE,
            });
        }
        if self.contains(id) {
            return Err(DeckError::DuplicateMember(id));
        }
        if !catalog.contains(id) {
            return Err(DeckError::UnknownCharacter(id));
        }
        self.member_ids.push(id);
        Ok(())
    }

    /// Returns whether anything was removed. Removing a non-member is not an error.
    pub fn remove_member(&mut self, id: CharacterId) -> bool {
        let before = self.member_ids.len();
        self.member_ids.retain(|member| *member != id);
        self.member_ids.len() != before
    }

    pub fn clear(&mut self) {
        self.member_ids.clear();
    }

    /// Replaces the working deck with a persisted record. A record that breaks the
    /// capacity or uniqueness rules is rejected and the working deck is left as is.
    /// Catalog membership is not re-checked here.
    pub fn replace_with(&mut self, deck: &Deck) -> Result<(), DeckError> {
        if deck.member_ids.len() > MAX_DECK_SIZE {
            return Err(DeckError::DeckFull {
                capacity: MAX_DECK_SIZE,
            });
        }
        if let Some(duplicate) = first_duplicate(&deck.member_ids) {
            return Err(DeckError::DuplicateMember(duplicate));
        }
        self.id = DeckId::Saved(deck.id);
        self.name = deck.name.clone();
        self.member_ids = deck.member_ids.clone();
        Ok(())
    }

    /// First commit moves unsaved -> saved; later commits keep the same id.
    pub fn mark_saved(&mut self, id: u64) {
        if self.id == DeckId::Unsaved {
            self.id = DeckId::Saved(id);
        }
    }
}

pub(crate) fn first_duplicate(ids: &[CharacterId]) -> Option<CharacterId> {
    ids.iter()
        .enumerate()
        .find(|(index, id)| ids[..*index].contains(id))
        .map(|(_, id)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::character::{Character, Position, Rarity};
    use crate::deck::StatVector;

    fn catalog(count: u32) -> CharacterCatalog {
        (1..=count)
            .map(|id| Character {
                id,
                name: format!("c{id}"),
                position: Position::Infielder,
                rarity: Rarity::Normal,
                level: 1,
                awakening_tier: 0,
                stats: StatVector::ZERO,
            })
            .collect()
    }

    fn saved(id: u64, member_ids: Vec<CharacterId>) -> Deck {
        Deck {
            id,
            name: "saved".to_string(),
            member_ids,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn seventh_add_is_rejected_without_change() {
        let catalog = catalog(10);
        let mut deck = DeckState::new("test");
        for id in 1..=6 {
            deck.add_member(id, &catalog).expect("room left");
        }
        assert!(deck.is_full());
        assert_eq!(
            deck.add_member(7, &catalog),
            Err(DeckError::DeckFull { capacity: 6 })
        );
        assert_eq!(deck.member_ids(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn duplicate_add_is_rejected() {
        let catalog = catalog(3);
        let mut deck = DeckState::new("test");
        deck.add_member(2, &catalog).expect("first add");
        assert_eq!(deck.add_member(2, &catalog), Err(DeckError::DuplicateMember(2)));
        assert_eq!(deck.member_ids(), &[2]);
    }

    #[test]
    fn unknown_id_is_rejected_at_add_time() {
        let catalog = catalog(3);
        let mut deck = DeckState::new("test");
        assert_eq!(deck.add_member(42, &catalog), Err(DeckError::UnknownCharacter(42)));
        assert!(deck.is_empty());
    }

    #[test]
    fn insertion_order_is_preserved() {
        let catalog = catalog(5);
        let mut deck = DeckState::new("test");
        for id in [4, 1, 3] {
            deck.add_member(id, &catalog).expect("add");
        }
        assert_eq!(deck.member_ids(), &[4, 1, 3]);
        assert!(deck.remove_member(1));
        assert_eq!(deck.member_ids(), &[4, 3]);
    }

    #[test]
    fn removing_non_member_is_a_no_op() {
        let catalog = catalog(3);
        let mut deck = DeckState::new("test");
        deck.add_member(1, &catalog).expect("add");
        let before = deck.clone();
        assert!(!deck.remove_member(3));
        assert_eq!(deck, before);
    }

    #[test]
    fn clear_keeps_identity() {
        let mut deck = DeckState::new("test");
        deck.replace_with(&saved(9, vec![1, 2])).expect("valid record");
        deck.clear();
        assert!(deck.is_empty());
        assert_eq!(deck.id(), DeckId::Saved(9));
    }

    #[test]
    fn replace_with_rejects_invalid_records() {
        let mut deck = DeckState::new("working");
        assert_eq!(
            deck.replace_with(&saved(1, vec![1, 2, 1])),
            Err(DeckError::DuplicateMember(1))
        );
        assert_eq!(
            deck.replace_with(&saved(1, (1..=7).collect())),
            Err(DeckError::DeckFull { capacity: 6 })
        );
        assert_eq!(deck.id(), DeckId::Unsaved);
        assert_eq!(deck.name(), "working");
    }

    #[test]
    fn mark_saved_only_transitions_once() {
        let mut deck = DeckState::new("test");
        assert!(!deck.is_saved());
        deck.mark_saved(3);
        deck.mark_saved(8);
        assert_eq!(deck.id(), DeckId::Saved(3));
    }

    #[test]
    fn deck_id_serializes_as_null_or_number() {
        assert_eq!(serde_json::to_string(&DeckId::Unsaved).expect("json"), "null");
        assert_eq!(serde_json::to_string(&DeckId::Saved(4)).expect("json"), "4");
    }
}
