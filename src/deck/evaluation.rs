use serde::Serialize;

use crate::data::character::CharacterId;
use crate::deck::aggregate::aggregate;
use crate::deck::catalog::CharacterCatalog;
use crate::deck::combo::{active_combos, Combo, ComboEffect};
use crate::deck::error::AggregateError;
use crate::deck::stats::{CategoryTotals, StatVector};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveComboSummary {
    pub id: u32,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayEffect {
    pub combo_id: u32,
    pub key: String,
    pub value: f64,
}

/// Everything the display layer needs for one deck. Recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckEvaluation {
    pub member_ids: Vec<CharacterId>,
    pub active_combos: Vec<ActiveComboSummary>,
    pub stats: StatVector,
    pub totals: CategoryTotals,
    pub display_effects: Vec<DisplayEffect>,
}

pub fn evaluate(
    member_ids: &[CharacterId],
    characters: &CharacterCatalog,
    combos: &[Combo],
) -> Result<DeckEvaluation, AggregateError> {
    let active = active_combos(member_ids, combos);
    let stats = aggregate(member_ids, characters, &active)?;
    let totals = stats.subtotals()?;

    let display_effects = active
        .iter()
        .flat_map(|combo| {
            combo.effects.iter().filter_map(move |effect| match effect {
                ComboEffect::Display { key, value } => Some(DisplayEffect {
                    combo_id: combo.id,
                    key: key.clone(),
                    value: *value,
                }),
                _ => None,
            })
        })
        .collect();

    Ok(DeckEvaluation {
        member_ids: member_ids.to_vec(),
        active_combos: active
            .iter()
            .map(|combo| ActiveComboSummary {
                id: combo.id,
                name: combo.name.clone(),
                description: combo.description.clone(),
            })
            .collect(),
        stats,
        totals,
        display_effects,
    })
}
