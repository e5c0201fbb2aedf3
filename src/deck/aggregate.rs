//! Folds member stats and active combo effects into one deck total.

use serde::Serialize;

use crate::data::character::CharacterId;
use crate::deck::catalog::CharacterCatalog;
use crate::deck::combo::{Combo, ComboEffect};
use crate::deck::error::AggregateError;
use crate::deck::stats::{StatKey, StatVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ContributionSource {
    Member(CharacterId),
    Combo(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum ContributionTarget {
    Vector { stats: StatVector },
    Stat { key: StatKey, value: i64 },
    AllStats { value: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatContribution {
    pub source: ContributionSource,
    #[serde(flatten)]
    pub target: ContributionTarget,
}

impl StatContribution {
    pub fn member(id: CharacterId, stats: StatVector) -> Self {
        Self {
            source: ContributionSource::Member(id),
            target: ContributionTarget::Vector { stats },
        }
    }

    /// `None` for display-only effects.
    pub fn from_effect(combo_id: u32, effect: &ComboEffect) -> Option<Self> {
        let target = match *effect {
            ComboEffect::Stat { key, value } => ContributionTarget::Stat { key, value },
            ComboEffect::AllStats { value } => ContributionTarget::AllStats { value },
            ComboEffect::Display { .. } => return None,
        };
        Some(Self {
            source: ContributionSource::Combo(combo_id),
            target,
        })
    }
}

/// Running total. Purely additive: no caps, clamping or rounding. A sum outside
/// the `i64` range is an error and leaves the total as it was.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatAccumulator {
    total: StatVector,
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self {
            total: StatVector::ZERO,
        }
    }

    pub fn apply(&mut self, contribution: &StatContribution) -> Result<(), AggregateError> {
        match contribution.target {
            ContributionTarget::Vector { stats } => {
                self.total = self.total.checked_add(&stats)?;
                Ok(())
            }
            ContributionTarget::Stat { key, value } => self.total.checked_add_to(key, value),
            ContributionTarget::AllStats { value } => self.total.checked_add_uniform(value),
        }
    }

    pub fn apply_many<'a, I>(&mut self, contributions: I) -> Result<(), AggregateError>
    where
        I: IntoIterator<Item = &'a StatContribution>,
    {
        for contribution in contributions {
            self.apply(contribution)?;
        }
        Ok(())
    }

    pub fn total(&self) -> StatVector {
        self.total
    }
}

/// Contributions in application order: members in slot order, then combo effects in catalog order.
pub fn contributions(
    member_ids: &[CharacterId],
    characters: &CharacterCatalog,
    active: &[&Combo],
) -> Result<Vec<StatContribution>, AggregateError> {
    let mut out = Vec::with_capacity(member_ids.len() + active.len());
    for &id in member_ids {
        let character = characters
            .get(id)
            .ok_or(AggregateError::UnknownCharacterReference(id))?;
        out.push(StatContribution::member(id, character.stats));
    }
    for combo in active {
        out.extend(
            combo
                .effects
                .iter()
                .filter_map(|effect| StatContribution::from_effect(combo.id, effect)),
        );
    }
    Ok(out)
}

pub fn aggregate(
    member_ids: &[CharacterId],
    characters: &CharacterCatalog,
    active: &[&Combo],
) -> Result<StatVector, AggregateError> {
    aggregate_with_breakdown(member_ids, characters, active).map(|(total, _)| total)
}

pub fn aggregate_with_breakdown(
    member_ids: &[CharacterId],
    characters: &CharacterCatalog,
    active: &[&Combo],
) -> Result<(StatVector, Vec<StatContribution>), AggregateError> {
    let parts = contributions(member_ids, characters, active)?;
    let mut accumulator = StatAccumulator::new();
    accumulator.apply_many(&parts)?;
    Ok((accumulator.total(), parts))
}
