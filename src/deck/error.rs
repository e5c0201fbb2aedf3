//! Conditions the deck core signals to its caller.

use thiserror::Error;

use crate::data::character::CharacterId;

/// Rejections from membership changes. The working deck is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck is full ({capacity} members)")]
    DeckFull { capacity: usize },

    #[error("character {0} is already in the deck")]
    DuplicateMember(CharacterId),

    #[error("character {0} is not in the catalog")]
    UnknownCharacter(CharacterId),
}

/// The deck cannot be folded into a total. The computation is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("deck member {0} has no catalog record")]
    UnknownCharacterReference(CharacterId),

    /// `key` names the stat or category whose sum left the `i64` range.
    #[error("'{key}' total is outside the representable range")]
    Overflow { key: &'static str },
}
