use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::character::{Character, CharacterId, Position, Rarity};
use crate::data::deck::{Deck, DeckUpdate};
use crate::data::store::DeckGateway;
use crate::data::StoreError;
use crate::deck::{
    evaluate, AggregateError, CategoryTotals, CharacterCatalog, DeckEvaluation, StatVector,
    MAX_DECK_SIZE,
};

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation failed")]
    Validation(ValidationErrorResponse),

    #[error("Deck not found")]
    DeckNotFound,

    #[error("{0}")]
    Aggregate(#[from] AggregateError),

    #[error("{0}")]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DeckNotFound(_) => ApiError::DeckNotFound,
            other => ApiError::Store(other),
        }
    }
}

pub fn health_payload() -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "bullpen-api",
        "version": env!("CARGO_PKG_VERSION")
    }))?)
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterListItem {
    pub id: CharacterId,
    pub name: String,
    pub position: Position,
    pub rarity: Rarity,
    pub level: u32,
    pub awakening_tier: u32,
    pub stats: StatVector,
    pub totals: CategoryTotals,
}

impl TryFrom<Character> for CharacterListItem {
    type Error = AggregateError;

    fn try_from(character: Character) -> Result<Self, AggregateError> {
        Ok(Self {
            id: character.id,
            name: character.name,
            position: character.position,
            rarity: character.rarity,
            level: character.level,
            awakening_tier: character.awakening_tier,
            totals: character.stats.subtotals()?,
            stats: character.stats,
        })
    }
}

pub fn characters_payload(gateway: &impl DeckGateway) -> Result<String, ApiError> {
    let list: Vec<CharacterListItem> = gateway
        .fetch_characters()?
        .into_iter()
        .map(CharacterListItem::try_from)
        .collect::<Result<_, _>>()?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({ "characters": list }))?)
}

pub fn combos_payload(gateway: &impl DeckGateway) -> Result<String, ApiError> {
    let combos = gateway.fetch_combos()?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({ "combos": combos }))?)
}

pub fn decks_payload(gateway: &impl DeckGateway) -> Result<String, ApiError> {
    let decks = gateway.fetch_decks()?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({ "decks": decks }))?)
}

#[derive(Debug, Clone, Serialize)]
pub struct DeckDetailResponse {
    pub deck: Deck,
    pub evaluation: Option<DeckEvaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_error: Option<String>,
}

/// A stored deck that no longer matches the catalog is still returned; its evaluation is omitted.
pub fn deck_get_payload(gateway: &impl DeckGateway, id: u64) -> Result<String, ApiError> {
    let deck = gateway.fetch_deck(id)?;
    let characters = CharacterCatalog::new(gateway.fetch_characters()?);
    let combos = gateway.fetch_combos()?;
    let (evaluation, evaluation_error) = match evaluate(&deck.member_ids, &characters, &combos) {
        Ok(evaluation) => (Some(evaluation), None),
        Err(err) => (None, Some(err.to_string())),
    };
    Ok(serde_json::to_string_pretty(&DeckDetailResponse {
        deck,
        evaluation,
        evaluation_error,
    })?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeckRequest {
    pub name: String,
    #[serde(default)]
    pub member_ids: Vec<CharacterId>,
}

pub fn deck_post_payload(gateway: &impl DeckGateway, body: &str) -> Result<String, ApiError> {
    let request: CreateDeckRequest = serde_json::from_str(body)?;
    let mut errors = Vec::new();
    validate_name(&request.name, &mut errors);
    validate_member_ids(&request.member_ids, &mut errors);
    into_validation_result(errors)?;

    let deck = gateway.create_deck(request.name.trim(), &request.member_ids)?;
    tracing::info!(deck_id = deck.id, "deck created via api");
    Ok(serde_json::to_string_pretty(&deck)?)
}

pub fn deck_put_payload(gateway: &impl DeckGateway, id: u64, body: &str) -> Result<String, ApiError> {
    let mut update: DeckUpdate = serde_json::from_str(body)?;
    let mut errors = Vec::new();
    if let Some(name) = &update.name {
        validate_name(name, &mut errors);
    }
    if let Some(member_ids) = &update.member_ids {
        validate_member_ids(member_ids, &mut errors);
    }
    into_validation_result(errors)?;

    update.name = update.name.map(|name| name.trim().to_string());
    let deck = gateway.update_deck(id, update)?;
    Ok(serde_json::to_string_pretty(&deck)?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    pub member_ids: Vec<CharacterId>,
}

pub fn evaluate_payload(gateway: &impl DeckGateway, body: &str) -> Result<String, ApiError> {
    let request: EvaluateRequest = serde_json::from_str(body)?;
    let mut errors = Vec::new();
    validate_member_ids(&request.member_ids, &mut errors);
    into_validation_result(errors)?;

    let characters = CharacterCatalog::new(gateway.fetch_characters()?);
    let combos = gateway.fetch_combos()?;
    let evaluation = evaluate(&request.member_ids, &characters, &combos)?;
    Ok(serde_json::to_string_pretty(&evaluation)?)
}

fn validate_name(name: &str, errors: &mut Vec<ValidationIssue>) {
    if name.trim().is_empty() {
        errors.push(ValidationIssue {
            field: "name",
            messages: vec!["must not be empty".to_string()],
        });
    }
}

fn validate_member_ids(member_ids: &[CharacterId], errors: &mut Vec<ValidationIssue>) {
    let mut messages = Vec::new();
    if member_ids.len() > MAX_DECK_SIZE {
        messages.push(format!("must contain at most {MAX_DECK_SIZE} members"));
    }
    let mut seen = HashSet::new();
    let duplicates: Vec<String> = member_ids
        .iter()
        .filter(|id| !seen.insert(**id))
        .map(|id| id.to_string())
        .collect();
    if !duplicates.is_empty() {
        messages.push(format!("duplicate member ids: {}", duplicates.join(", ")));
    }
    if !messages.is_empty() {
        errors.push(ValidationIssue {
            field: "member_ids",
            messages,
        });
    }
}

fn into_validation_result(errors: Vec<ValidationIssue>) -> Result<(), ApiError> {
    if errors.is_empty() {
        return Ok(());
    }
    Err(ApiError::Validation(ValidationErrorResponse {
        status: "error",
        message: "Validation failed",
        errors,
    }))
}
