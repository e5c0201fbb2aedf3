use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{read_catalog_file, StoreError};
use crate::deck::{StatKey, StatVector};

pub const DEFAULT_CHARACTERS_FILE: &str = "characters.json";

pub type CharacterId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Pitcher,
    Catcher,
    Infielder,
    Outfielder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Normal,
    Rare,
    Epic,
    Legend,
}

/// Catalog character. Read-only to the deck core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CharacterRecord", into = "CharacterRecord")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub position: Position,
    pub rarity: Rarity,
    pub level: u32,
    pub awakening_tier: u32,
    pub stats: StatVector,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchingBlock {
    pub velocity: i64,
    pub control: i64,
    pub stamina: i64,
    pub breaking: i64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BattingBlock {
    pub contact: i64,
    pub power: i64,
    pub speed: i64,
    pub arm: i64,
    pub fielding: i64,
}

/// On-disk shape: stats split into pitching and batting blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: CharacterId,
    pub name: String,
    pub position: Position,
    pub rarity: Rarity,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub awakening_tier: u32,
    #[serde(default)]
    pub pitching: PitchingBlock,
    #[serde(default)]
    pub batting: BattingBlock,
}

fn default_level() -> u32 {
    1
}

impl From<CharacterRecord> for Character {
    fn from(record: CharacterRecord) -> Self {
        let p = record.pitching;
        let b = record.batting;
        let stats = StatVector::ZERO
            .with(StatKey::Velocity, p.velocity)
            .with(StatKey::Control, p.control)
            .with(StatKey::Stamina, p.stamina)
            .with(StatKey::Breaking, p.breaking)
            .with(StatKey::Contact, b.contact)
            .with(StatKey::Power, b.power)
            .with(StatKey::Speed, b.speed)
            .with(StatKey::Arm, b.arm)
            .with(StatKey::Fielding, b.fielding);
        Character {
            id: record.id,
            name: record.name,
            position: record.position,
            rarity: record.rarity,
            level: record.level,
            awakening_tier: record.awakening_tier,
            stats,
        }
    }
}

impl From<Character> for CharacterRecord {
    fn from(character: Character) -> Self {
        let s = character.stats;
        CharacterRecord {
            id: character.id,
            name: character.name,
            position: character.position,
            rarity: character.rarity,
            level: character.level,
            awakening_tier: character.awakening_tier,
            pitching: PitchingBlock {
                velocity: s.velocity,
                control: s.control,
                stamina: s.stamina,
                breaking: s.breaking,
            },
            batting: BattingBlock {
                contact: s.contact,
                power: s.power,
                speed: s.speed,
                arm: s.arm,
                fielding: s.fielding,
            },
        }
    }
}

pub fn load_characters(path: impl AsRef<Path>) -> Result<Vec<Character>, StoreError> {
    read_catalog_file(path.as_ref(), "characters")
}
