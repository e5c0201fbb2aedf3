//! Deck editing session: loads catalogs once, owns the working deck, and
//! commits/loads it through a [`DeckGateway`].

use thiserror::Error;

use crate::data::character::CharacterId;
use crate::data::deck::{Deck, DeckUpdate};
use crate::data::store::DeckGateway;
use crate::data::StoreError;
use crate::deck::{
    evaluate, AggregateError, CharacterCatalog, Combo, DeckError, DeckEvaluation, DeckId,
    DeckState,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

pub struct DeckSession<G: DeckGateway> {
    gateway: G,
    characters: CharacterCatalog,
    combos: Vec<Combo>,
    deck: DeckState,
}

impl<G: DeckGateway> DeckSession<G> {
    pub fn open(gateway: G, deck_name: impl Into<String>) -> Result<Self, SessionError> {
        let characters = CharacterCatalog::new(gateway.fetch_characters()?);
        let combos = gateway.fetch_combos()?;
        tracing::info!(
            characters = characters.len(),
            combos = combos.len(),
            "loaded catalogs"
        );
        Ok(Self {
            gateway,
            characters,
            combos,
            deck: DeckState::new(deck_name),
        })
    }

    pub fn deck(&self) -> &DeckState {
        &self.deck
    }

    pub fn characters(&self) -> &CharacterCatalog {
        &self.characters
    }

    pub fn combos(&self) -> &[Combo] {
        &self.combos
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn add_member(&mut self, id: CharacterId) -> Result<(), DeckError> {
        self.deck.add_member(id, &self.characters)
    }

    pub fn remove_member(&mut self, id: CharacterId) -> bool {
        self.deck.remove_member(id)
    }

    pub fn clear(&mut self) {
        self.deck.clear();
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.deck.rename(name);
    }

    pub fn load_deck(&mut self, id: u64) -> Result<(), SessionError> {
        let deck = self.gateway.fetch_deck(id)?;
        self.deck.replace_with(&deck)?;
        tracing::info!(deck_id = id, members = deck.member_ids.len(), "loaded deck");
        Ok(())
    }

    /// Creates the deck on first commit, updates it in place afterwards.
    pub fn commit(&mut self) -> Result<Deck, SessionError> {
        let saved = match self.deck.id() {
            DeckId::Unsaved => self
                .gateway
                .create_deck(self.deck.name(), self.deck.member_ids())?,
            DeckId::Saved(id) => self.gateway.update_deck(
                id,
                DeckUpdate {
                    name: Some(self.deck.name().to_string()),
                    member_ids: Some(self.deck.member_ids().to_vec()),
                },
            )?,
        };
        self.deck.mark_saved(saved.id);
        tracing::info!(deck_id = saved.id, members = saved.member_ids.len(), "committed deck");
        Ok(saved)
    }

    pub fn evaluate(&self) -> Result<DeckEvaluation, AggregateError> {
        evaluate(self.deck.member_ids(), &self.characters, &self.combos)
    }
}
