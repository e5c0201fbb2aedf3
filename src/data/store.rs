//! Persistence gateway: the only way characters, combos and decks reach the deck core.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};

use crate::data::character::{load_characters, Character, CharacterId, DEFAULT_CHARACTERS_FILE};
use crate::data::combo::{load_combos, DEFAULT_COMBOS_FILE};
use crate::data::deck::{Deck, DeckFile, DeckUpdate, DEFAULT_DECKS_FILE};
use crate::data::{resolve_catalog_path, StoreError};
use crate::deck::Combo;

/// Request/response contract consumed by session orchestration and the API.
pub trait DeckGateway {
    fn fetch_characters(&self) -> Result<Vec<Character>, StoreError>;
    fn fetch_combos(&self) -> Result<Vec<Combo>, StoreError>;
    fn fetch_decks(&self) -> Result<Vec<Deck>, StoreError>;
    /// Assigns a new id.
    fn create_deck(&self, name: &str, member_ids: &[CharacterId]) -> Result<Deck, StoreError>;
    fn update_deck(&self, id: u64, update: DeckUpdate) -> Result<Deck, StoreError>;

    fn fetch_deck(&self, id: u64) -> Result<Deck, StoreError> {
        self.fetch_decks()?
            .into_iter()
            .find(|deck| deck.id == id)
            .ok_or(StoreError::DeckNotFound(id))
    }
}

/// Data directory holding the character and combo catalogs (`.json`, `.yaml` or
/// `.yml`) and `decks.json`. A missing decks file reads as no decks.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn characters_path(&self) -> PathBuf {
        resolve_catalog_path(&self.dir, DEFAULT_CHARACTERS_FILE)
    }

    pub fn combos_path(&self) -> PathBuf {
        resolve_catalog_path(&self.dir, DEFAULT_COMBOS_FILE)
    }

    pub fn decks_path(&self) -> PathBuf {
        self.dir.join(DEFAULT_DECKS_FILE)
    }

    fn read_deck_file(&self) -> Result<DeckFile, StoreError> {
        let path = self.decks_path();
        if !path.exists() {
            return Ok(DeckFile::default());
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_deck_file(&self, file: &DeckFile) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.decks_path();
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, serde_json::to_string_pretty(file)?)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl DeckGateway for FileStore {
    fn fetch_characters(&self) -> Result<Vec<Character>, StoreError> {
        load_characters(self.characters_path())
    }

    fn fetch_combos(&self) -> Result<Vec<Combo>, StoreError> {
        load_combos(self.combos_path())
    }

    fn fetch_decks(&self) -> Result<Vec<Deck>, StoreError> {
        Ok(self.read_deck_file()?.decks)
    }

    fn create_deck(&self, name: &str, member_ids: &[CharacterId]) -> Result<Deck, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut file = self.read_deck_file()?;
        let timestamp = now_rfc3339();
        let deck = Deck {
            id: file.allocate_id()?,
            name: name.to_string(),
            member_ids: member_ids.to_vec(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };
        file.decks.push(deck.clone());
        self.write_deck_file(&file)?;
        tracing::debug!(deck_id = deck.id, path = %self.decks_path().display(), "created deck");
        Ok(deck)
    }

    fn update_deck(&self, id: u64, update: DeckUpdate) -> Result<Deck, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut file = self.read_deck_file()?;
        let deck = file
            .decks
            .iter_mut()
            .find(|deck| deck.id == id)
            .ok_or(StoreError::DeckNotFound(id))?;
        if let Some(name) = update.name {
            deck.name = name;
        }
        if let Some(member_ids) = update.member_ids {
            deck.member_ids = member_ids;
        }
        deck.updated_at = now_rfc3339();
        let updated = deck.clone();
        self.write_deck_file(&file)?;
        tracing::debug!(deck_id = id, "updated deck");
        Ok(updated)
    }
}
