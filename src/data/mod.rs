//! Catalog records, loaders and the deck persistence gateway.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub mod character;
pub mod combo;
pub mod deck;
pub mod import;
pub mod store;
pub mod validate;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unexpected layout in '{path}': {message}")]
    Layout { path: String, message: String },

    #[error("deck {0} not found")]
    DeckNotFound(u64),

    #[error("deck store lock was poisoned")]
    LockPoisoned,

    #[error("no deck ids left after {0}")]
    IdsExhausted(u64),
}

/// Catalog extensions, in lookup order.
pub const CATALOG_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// First of `default_file` with a `.json`, `.yaml` or `.yml` extension that exists
/// in `dir`. Falls back to `default_file` itself so the read error names it.
pub fn resolve_catalog_path(dir: &Path, default_file: &str) -> PathBuf {
    let default_path = dir.join(default_file);
    CATALOG_EXTENSIONS
        .iter()
        .map(|ext| default_path.with_extension(ext))
        .find(|candidate| candidate.is_file())
        .unwrap_or(default_path)
}

/// Reads a catalog from JSON or YAML (by extension). Accepts a top-level array
/// or an object wrapping the array under `key`.
pub(crate) fn read_catalog_file<T: DeserializeOwned>(
    path: &Path,
    key: &str,
) -> Result<Vec<T>, StoreError> {
    let raw = fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let payload: Value = if is_yaml {
        serde_yaml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };

    let entries = match payload {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut object) => object.remove(key).ok_or_else(|| StoreError::Layout {
            path: path.display().to_string(),
            message: format!("expected top-level array or {{ \"{key}\": [...] }}"),
        })?,
        _ => {
            return Err(StoreError::Layout {
                path: path.display().to_string(),
                message: "expected array or object".to_string(),
            })
        }
    };
    Ok(serde_json::from_value(entries)?)
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("bullpen-catalog-{name}-{stamp}"));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn catalog_lookup_prefers_json_then_yaml_then_yml() {
        let dir = temp_dir("lookup");
        assert_eq!(resolve_catalog_path(&dir, "combos.json"), dir.join("combos.json"));

        fs::write(dir.join("combos.yml"), "[]").expect("write yml");
        assert_eq!(resolve_catalog_path(&dir, "combos.json"), dir.join("combos.yml"));

        fs::write(dir.join("combos.yaml"), "[]").expect("write yaml");
        assert_eq!(resolve_catalog_path(&dir, "combos.json"), dir.join("combos.yaml"));

        fs::write(dir.join("combos.json"), "[]").expect("write json");
        assert_eq!(resolve_catalog_path(&dir, "combos.json"), dir.join("combos.json"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn wrapped_yaml_catalog_is_unwrapped_by_key() {
        let dir = temp_dir("wrapped");
        let path = dir.join("items.yaml");
        fs::write(&path, "items:\n  - 3\n  - 1\n").expect("write yaml");
        let items: Vec<u32> = read_catalog_file(&path, "items").expect("wrapped yaml");
        assert_eq!(items, vec![3, 1]);
        assert!(matches!(
            read_catalog_file::<u32>(&path, "other"),
            Err(StoreError::Layout { .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }
}
