//! Bulk character import from CSV into the data directory's character catalog.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::character::{
    BattingBlock, Character, CharacterId, CharacterRecord, PitchingBlock, Position, Rarity,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub record_index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub source_path: String,
    pub output_path: String,
    pub total_records: usize,
    pub record_count: usize,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to open import file: {0}")]
    Open(std::io::Error),

    #[error("failed to read import file: {0}")]
    Read(#[from] csv::Error),

    #[error("failed to serialize characters: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to persist import output: {0}")]
    Write(#[from] std::io::Error),
}

/// Header: id,name,position,rarity,level,awakening_tier, then the nine stat columns.
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: CharacterId,
    name: String,
    position: Position,
    rarity: Rarity,
    #[serde(default)]
    level: Option<u32>,
    #[serde(default)]
    awakening_tier: Option<u32>,
    #[serde(default)]
    velocity: i64,
    #[serde(default)]
    control: i64,
    #[serde(default)]
    stamina: i64,
    #[serde(default)]
    breaking: i64,
    #[serde(default)]
    contact: i64,
    #[serde(default)]
    power: i64,
    #[serde(default)]
    speed: i64,
    #[serde(default)]
    arm: i64,
    #[serde(default)]
    fielding: i64,
}

impl From<CsvRow> for Character {
    fn from(row: CsvRow) -> Self {
        CharacterRecord {
            id: row.id,
            name: row.name.trim().to_string(),
            position: row.position,
            rarity: row.rarity,
            level: row.level.unwrap_or(1),
            awakening_tier: row.awakening_tier.unwrap_or(0),
            pitching: PitchingBlock {
                velocity: row.velocity,
                control: row.control,
                stamina: row.stamina,
                breaking: row.breaking,
            },
            batting: BattingBlock {
                contact: row.contact,
                power: row.power,
                speed: row.speed,
                arm: row.arm,
                fielding: row.fielding,
            },
        }
        .into()
    }
}

/// Parses rows; malformed rows, blank names and repeated ids are skipped and reported.
pub fn parse_characters_csv(
    reader: impl std::io::Read,
) -> Result<(Vec<Character>, usize, Vec<SkippedRow>), ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut characters = Vec::new();
    let mut skipped = Vec::new();
    let mut seen: HashSet<CharacterId> = HashSet::new();
    let mut total = 0;

    for (record_index, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        total += 1;
        let row = match row {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                skipped.push(SkippedRow {
                    record_index,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        if row.name.trim().is_empty() {
            skipped.push(SkippedRow {
                record_index,
                reason: "empty name".to_string(),
            });
            continue;
        }
        if !seen.insert(row.id) {
            skipped.push(SkippedRow {
                record_index,
                reason: format!("duplicate id {}", row.id),
            });
            continue;
        }
        characters.push(row.into());
    }

    Ok((characters, total, skipped))
}

pub fn import_characters_csv(
    source: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<ImportReport, ImportError> {
    let source = source.as_ref();
    let output = output.as_ref();
    let file = fs::File::open(source).map_err(ImportError::Open)?;
    let (characters, total_records, skipped) = parse_characters_csv(file)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    let payload = serde_json::json!({ "characters": characters });
    fs::write(output, serde_json::to_string_pretty(&payload)?)?;

    Ok(ImportReport {
        source_path: source.display().to_string(),
        output_path: output.display().to_string(),
        total_records,
        record_count: characters.len(),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,name,position,rarity,level,awakening_tier,velocity,control,stamina,breaking,contact,power,speed,arm,fielding\n";

    #[test]
    fn parses_rows_into_flat_stats() {
        let csv = format!("{HEADER}1,Kaito,pitcher,epic,35,1,3,2,0,0,0,0,0,0,0\n2, Ren ,outfielder,rare,,,0,0,0,0,3,0,3,2,0\n");
        let (characters, total, skipped) = parse_characters_csv(csv.as_bytes()).expect("parse");
        assert_eq!(total, 2);
        assert!(skipped.is_empty());
        assert_eq!(characters[0].stats.velocity, 3);
        assert_eq!(characters[1].name, "Ren");
        assert_eq!(characters[1].level, 1);
        assert_eq!(characters[1].stats.arm, 2);
    }

    #[test]
    fn reports_bad_and_duplicate_rows() {
        let csv = format!(
            "{HEADER}1,A,pitcher,epic,1,0,0,0,0,0,0,0,0,0,0\n1,B,catcher,rare,1,0,0,0,0,0,0,0,0,0,0\n3,C,goalkeeper,rare,1,0,0,0,0,0,0,0,0,0,0\n4,,catcher,rare,1,0,0,0,0,0,0,0,0,0,0\n"
        );
        let (characters, total, skipped) = parse_characters_csv(csv.as_bytes()).expect("parse");
        assert_eq!(total, 4);
        assert_eq!(characters.len(), 1);
        let indices: Vec<usize> = skipped.iter().map(|s| s.record_index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(skipped[0].reason.contains("duplicate id 1"));
    }
}
