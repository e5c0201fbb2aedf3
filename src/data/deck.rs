use serde::{Deserialize, Serialize};

use crate::data::character::CharacterId;
use crate::data::StoreError;

pub const DEFAULT_DECKS_FILE: &str = "decks.json";

/// Persisted deck. Always has a concrete id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: u64,
    pub name: String,
    pub member_ids: Vec<CharacterId>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Partial update; `None` fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub member_ids: Option<Vec<CharacterId>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DeckFile {
    #[serde(default = "first_id")]
    pub next_id: u64,
    #[serde(default)]
    pub decks: Vec<Deck>,
}

impl Default for DeckFile {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            decks: Vec::new(),
        }
    }
}

impl DeckFile {
    /// Never hands out an id already present, even if `next_id` was edited by hand.
    pub fn allocate_id(&mut self) -> Result<u64, StoreError> {
        let highest = self.decks.iter().map(|deck| deck.id).max().unwrap_or(0);
        let floor = highest
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted(highest))?;
        let id = self.next_id.max(floor);
        self.next_id = id.checked_add(1).ok_or(StoreError::IdsExhausted(id))?;
        Ok(id)
    }
}

fn first_id() -> u64 {
    1
}
