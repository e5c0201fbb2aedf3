//! Combo catalog records. Effects are resolved into tagged variants once, here.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::character::CharacterId;
use crate::data::{read_catalog_file, StoreError};
use crate::deck::{Combo, ComboEffect};

pub const DEFAULT_COMBOS_FILE: &str = "combos.json";

/// Combo as stored: `effects` is a plain key -> number map, kept in file order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub required_member_ids: Vec<CharacterId>,
    #[serde(default, with = "effect_entries")]
    pub effects: Vec<(String, f64)>,
}

impl ComboRecord {
    pub fn resolve(&self) -> Combo {
        Combo {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            required_member_ids: self.required_member_ids.iter().copied().collect::<BTreeSet<_>>(),
            effects: self
                .effects
                .iter()
                .map(|(key, value)| ComboEffect::resolve(key, *value))
                .collect(),
        }
    }
}

/// Map on the wire, ordered pairs in memory. A repeated key is rejected.
mod effect_entries {
    use std::fmt;

    use serde::de::{Error, MapAccess, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(entries: &[(String, f64)], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(entries.iter().map(|(key, value)| (key, value)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<(String, f64)>, D::Error> {
        deserializer.deserialize_map(EntriesVisitor)
    }

    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, f64)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of effect keys to numbers")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries: Vec<(String, f64)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, f64>()? {
                if entries.iter().any(|(existing, _)| *existing == key) {
                    return Err(A::Error::custom(format!("duplicate effect key '{key}'")));
                }
                entries.push((key, value));
            }
            Ok(entries)
        }
    }
}

pub fn load_combo_records(path: impl AsRef<Path>) -> Result<Vec<ComboRecord>, StoreError> {
    read_catalog_file(path.as_ref(), "combos")
}

pub fn load_combos(path: impl AsRef<Path>) -> Result<Vec<Combo>, StoreError> {
    Ok(load_combo_records(path)?
        .iter()
        .map(ComboRecord::resolve)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::StatKey;

    #[test]
    fn resolves_each_effect_once() {
        let raw = r#"{
            "id": 3, "name": "Battery", "required_member_ids": [1, 2, 2],
            "effects": { "all_stats": 1, "control": 2, "recoveryPercent": 5 }
        }"#;
        let record: ComboRecord = serde_json::from_str(raw).expect("parse");
        let combo = record.resolve();
        assert_eq!(combo.required_member_ids.len(), 2);
        assert!(combo.effects.contains(&ComboEffect::AllStats { value: 1 }));
        assert!(combo.effects.contains(&ComboEffect::Stat {
            key: StatKey::Control,
            value: 2
        }));
        assert!(combo.effects.contains(&ComboEffect::Display {
            key: "recoveryPercent".to_string(),
            value: 5.0
        }));
    }

    #[test]
    fn effects_keep_file_order() {
        let raw = r#"{
            "id": 4, "name": "Duo", "required_member_ids": [4, 6],
            "effects": { "fielding": 2, "arm": 1, "all_stats": 1 }
        }"#;
        let record: ComboRecord = serde_json::from_str(raw).expect("parse");
        let keys: Vec<&str> = record.effects.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["fielding", "arm", "all_stats"]);

        let resolved = record.resolve();
        assert_eq!(
            resolved.effects[0],
            ComboEffect::Stat {
                key: StatKey::Fielding,
                value: 2
            }
        );
        assert_eq!(resolved.effects[2], ComboEffect::AllStats { value: 1 });

        let written = serde_json::to_string(&record).expect("serialize");
        assert!(written.contains(r#""effects":{"fielding":2.0,"arm":1.0,"all_stats":1.0}"#));
    }

    #[test]
    fn wrapped_catalog_keeps_effect_order() {
        let payload: serde_json::Value = serde_json::from_str(
            r#"{ "combos": [ { "id": 1, "name": "Z", "required_member_ids": [1],
                 "effects": { "speed": 1, "control": 2 } } ] }"#,
        )
        .expect("parse");
        let records: Vec<ComboRecord> =
            serde_json::from_value(payload["combos"].clone()).expect("records");
        assert_eq!(records[0].effects[0].0, "speed");
    }

    #[test]
    fn repeated_effect_key_is_rejected() {
        let raw = r#"{ "id": 1, "name": "Dup", "required_member_ids": [1],
            "effects": { "power": 1, "power": 2 } }"#;
        let err = serde_json::from_str::<ComboRecord>(raw).expect_err("duplicate key");
        assert!(err.to_string().contains("duplicate effect key 'power'"));
    }
}
