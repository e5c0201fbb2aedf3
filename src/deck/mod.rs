//! Deck aggregation core: membership rules, combo matching and stat folding.
//! Pure and synchronous; catalogs arrive already loaded.

pub mod aggregate;
pub mod catalog;
pub mod combo;
pub mod error;
pub mod evaluation;
pub mod state;
pub mod stats;

pub use aggregate::{
    aggregate, aggregate_with_breakdown, ContributionSource, ContributionTarget, StatAccumulator,
    StatContribution,
};
pub use catalog::CharacterCatalog;
pub use combo::{active_combos, Combo, ComboEffect, ALL_STATS_KEY};
pub use error::{AggregateError, DeckError};
pub use evaluation::{evaluate, ActiveComboSummary, DeckEvaluation, DisplayEffect};
pub use state::{DeckId, DeckState, MAX_DECK_SIZE};
pub use stats::{CategoryTotals, StatKey, StatVector};
