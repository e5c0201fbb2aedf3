use std::collections::HashMap;

use crate::data::character::{Character, CharacterId};

/// Character catalog in source order with an id index. Built once per session.
#[derive(Debug, Clone, Default)]
pub struct CharacterCatalog {
    characters: Vec<Character>,
    by_id: HashMap<CharacterId, usize>,
}

impl CharacterCatalog {
    /// Later duplicates of an id shadow earlier ones in the index; the validator reports them.
    pub fn new(characters: Vec<Character>) -> Self {
        let by_id = characters
            .iter()
            .enumerate()
            .map(|(index, character)| (character.id, index))
            .collect();
        Self { characters, by_id }
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.by_id.get(&id).map(|&index| &self.characters[index])
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

impl FromIterator<Character> for CharacterCatalog {
    fn from_iter<I: IntoIterator<Item = Character>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
