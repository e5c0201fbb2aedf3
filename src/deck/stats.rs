//! Nine-key stat vector shared by characters, combo effects and deck totals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::deck::error::AggregateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Velocity,
    Control,
    Stamina,
    Breaking,
    Contact,
    Power,
    Speed,
    Arm,
    Fielding,
}

impl StatKey {
    /// Every key in display order: pitching block, then batting block.
    pub const ALL: [StatKey; 9] = [
        StatKey::Velocity,
        StatKey::Control,
        StatKey::Stamina,
        StatKey::Breaking,
        StatKey::Contact,
        StatKey::Power,
        StatKey::Speed,
        StatKey::Arm,
        StatKey::Fielding,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Velocity => "velocity",
            Self::Control => "control",
            Self::Stamina => "stamina",
            Self::Breaking => "breaking",
            Self::Contact => "contact",
            Self::Power => "power",
            Self::Speed => "speed",
            Self::Arm => "arm",
            Self::Fielding => "fielding",
        }
    }

    /// Exact, case-sensitive match against the wire names.
    pub fn parse(raw: &str) -> Option<StatKey> {
        Self::ALL.into_iter().find(|key| key.as_str() == raw)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One signed value per [`StatKey`]. Every key is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatVector {
    pub velocity: i64,
    pub control: i64,
    pub stamina: i64,
    pub breaking: i64,
    pub contact: i64,
    pub power: i64,
    pub speed: i64,
    pub arm: i64,
    pub fielding: i64,
}

impl StatVector {
    pub const ZERO: StatVector = StatVector {
        velocity: 0,
        control: 0,
        stamina: 0,
        breaking: 0,
        contact: 0,
        power: 0,
        speed: 0,
        arm: 0,
        fielding: 0,
    };

    fn as_array(&self) -> [i64; 9] {
        [
            self.velocity,
            self.control,
            self.stamina,
            self.breaking,
            self.contact,
            self.power,
            self.speed,
            self.arm,
            self.fielding,
        ]
    }

    fn slot_mut(&mut self, key: StatKey) -> &mut i64 {
        match key {
            StatKey::Velocity => &mut self.velocity,
            StatKey::Control => &mut self.control,
            StatKey::Stamina => &mut self.stamina,
            StatKey::Breaking => &mut self.breaking,
            StatKey::Contact => &mut self.contact,
            StatKey::Power => &mut self.power,
            StatKey::Speed => &mut self.speed,
            StatKey::Arm => &mut self.arm,
            StatKey::Fielding => &mut self.fielding,
        }
    }

    pub fn get(&self, key: StatKey) -> i64 {
        self.as_array()[key.index()]
    }

    pub fn with(mut self, key: StatKey, value: i64) -> Self {
        *self.slot_mut(key) = value;
        self
    }

    /// Leaves the vector unchanged when the sum leaves the `i64` range.
    pub fn checked_add_to(&mut self, key: StatKey, value: i64) -> Result<(), AggregateError> {
        let slot = self.slot_mut(key);
        *slot = slot
            .checked_add(value)
            .ok_or(AggregateError::Overflow { key: key.as_str() })?;
        Ok(())
    }

    /// Adds `value` to all nine keys, or to none of them.
    pub fn checked_add_uniform(&mut self, value: i64) -> Result<(), AggregateError> {
        let mut next = *self;
        for key in StatKey::ALL {
            next.checked_add_to(key, value)?;
        }
        *self = next;
        Ok(())
    }

    /// Key-wise sum.
    pub fn checked_add(&self, rhs: &StatVector) -> Result<StatVector, AggregateError> {
        let mut sum = *self;
        for (key, value) in rhs.iter() {
            sum.checked_add_to(key, value)?;
        }
        Ok(sum)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKey, i64)> + '_ {
        StatKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }

    pub fn pitching_total(&self) -> Result<i64, AggregateError> {
        checked_sum(
            "pitching",
            [self.velocity, self.control, self.stamina, self.breaking],
        )
    }

    pub fn batting_total(&self) -> Result<i64, AggregateError> {
        checked_sum("batting", [self.contact, self.power, self.speed])
    }

    pub fn fielding_total(&self) -> Result<i64, AggregateError> {
        checked_sum("fielding", [self.arm, self.fielding])
    }

    pub fn overall(&self) -> Result<i64, AggregateError> {
        checked_sum("overall", self.as_array())
    }

    pub fn subtotals(&self) -> Result<CategoryTotals, AggregateError> {
        Ok(CategoryTotals {
            pitching: self.pitching_total()?,
            batting: self.batting_total()?,
            fielding: self.fielding_total()?,
            overall: self.overall()?,
        })
    }
}

fn checked_sum<const N: usize>(label: &'static str, values: [i64; N]) -> Result<i64, AggregateError> {
    values
        .into_iter()
        .try_fold(0i64, |total, value| total.checked_add(value))
        .ok_or(AggregateError::Overflow { key: label })
}

/// Display projections of a [`StatVector`]. Carries no state of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub pitching: i64,
    pub batting: i64,
    pub fielding: i64,
    pub overall: i64,
}
