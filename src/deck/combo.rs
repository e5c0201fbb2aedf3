//! Combo definitions and activation matching.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::data::character::CharacterId;
use crate::deck::stats::StatKey;

/// Effect key that applies a value to every stat.
pub const ALL_STATS_KEY: &str = "all_stats";

/// A combo effect, classified once when the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComboEffect {
    Stat { key: StatKey, value: i64 },
    AllStats { value: i64 },
    /// Informational only; never folded into a stat.
    Display { key: String, value: f64 },
}

impl ComboEffect {
    /// A stat or all-stats key whose value is fractional or outside the `i64` range
    /// becomes `Display` rather than being rounded or clamped.
    pub fn resolve(key: &str, value: f64) -> ComboEffect {
        if let Some(exact) = exact_i64(value) {
            if key == ALL_STATS_KEY {
                return ComboEffect::AllStats { value: exact };
            }
            if let Some(stat) = StatKey::parse(key) {
                return ComboEffect::Stat {
                    key: stat,
                    value: exact,
                };
            }
        }
        ComboEffect::Display {
            key: key.to_string(),
            value,
        }
    }

    pub fn is_display(&self) -> bool {
        matches!(self, ComboEffect::Display { .. })
    }
}

/// `Some` only when `value` converts to `i64` without loss.
pub(crate) fn exact_i64(value: f64) -> Option<i64> {
    // i64::MIN is -2^63 and exact as f64; 2^63 itself is one past i64::MAX.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if value.is_finite() && value.fract() == 0.0 && (-BOUND..BOUND).contains(&value) {
        Some(value as i64)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combo {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub required_member_ids: BTreeSet<CharacterId>,
    pub effects: Vec<ComboEffect>,
}

impl Combo {
    /// Set semantics: every required id present, order and extra members irrelevant.
    pub fn is_satisfied_by(&self, member_ids: &[CharacterId]) -> bool {
        self.required_member_ids
            .iter()
            .all(|required| member_ids.contains(required))
    }
}

/// Combos whose requirements are all met, in catalog order.
pub fn active_combos<'a>(member_ids: &[CharacterId], catalog: &'a [Combo]) -> Vec<&'a Combo> {
    catalog
        .iter()
        .filter(|combo| combo.is_satisfied_by(member_ids))
        .collect()
}
