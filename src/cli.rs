use serde::Serialize;

use crate::config::AppConfig;
use crate::data::character::{CharacterId, DEFAULT_CHARACTERS_FILE};
use crate::data::import::import_characters_csv;
use crate::data::store::{DeckGateway, FileStore};
use crate::data::validate::{validate_data_dir, ValidationSeverity};
use crate::deck::{evaluate, CharacterCatalog};
use crate::server;
use crate::session::DeckSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Evaluate,
    Decks,
    Validate,
    Import,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("evaluate") => Some(Command::Evaluate),
        Some("decks") => Some(Command::Decks),
        Some("validate") => Some(Command::Validate),
        Some("import") => Some(Command::Import),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = AppConfig::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(&config),
        Some(Command::Evaluate) => handle_evaluate(args, &config),
        Some(Command::Decks) => handle_decks(&config),
        Some(Command::Validate) => handle_validate(args, &config),
        Some(Command::Import) => handle_import(args, &config),
        None => {
            eprintln!("usage: bullpen <serve|evaluate|decks|validate|import>");
            2
        }
    }
}

fn handle_serve(config: &AppConfig) -> i32 {
    match server::run_server(config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_evaluate(args: &[String], config: &AppConfig) -> i32 {
    let raw_ids = &args[2.min(args.len())..];
    if raw_ids.is_empty() {
        eprintln!("usage: bullpen evaluate <character-id> [character-id ...]");
        return 2;
    }
    let mut ids: Vec<CharacterId> = Vec::with_capacity(raw_ids.len());
    for raw in raw_ids {
        match raw.parse::<CharacterId>() {
            Ok(id) => ids.push(id),
            Err(_) => {
                eprintln!("invalid character id '{raw}'");
                return 2;
            }
        }
    }

    let mut session = match DeckSession::open(FileStore::new(&config.data_dir), "cli") {
        Ok(session) => session,
        Err(err) => {
            eprintln!("failed to load catalogs: {err}");
            return 1;
        }
    };
    for id in ids {
        if let Err(err) = session.add_member(id) {
            eprintln!("cannot add {id}: {err}");
            return 1;
        }
    }

    match session.evaluate() {
        Ok(evaluation) => print_json(&evaluation),
        Err(err) => {
            eprintln!("evaluation failed: {err}");
            1
        }
    }
}

#[derive(Debug, Serialize)]
struct DeckLine {
    id: u64,
    name: String,
    member_ids: Vec<CharacterId>,
    overall: Option<i64>,
}

fn handle_decks(config: &AppConfig) -> i32 {
    let store = FileStore::new(&config.data_dir);
    let loaded = store.fetch_decks().and_then(|decks| {
        let characters = CharacterCatalog::new(store.fetch_characters()?);
        let combos = store.fetch_combos()?;
        Ok((decks, characters, combos))
    });
    let (decks, characters, combos) = match loaded {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("failed to load data: {err}");
            return 1;
        }
    };

    let lines: Vec<DeckLine> = decks
        .into_iter()
        .map(|deck| {
            let overall = match evaluate(&deck.member_ids, &characters, &combos) {
                Ok(evaluation) => Some(evaluation.totals.overall),
                Err(err) => {
                    tracing::warn!(deck_id = deck.id, error = %err, "deck does not match catalog");
                    None
                }
            };
            DeckLine {
                id: deck.id,
                name: deck.name,
                member_ids: deck.member_ids,
                overall,
            }
        })
        .collect();
    print_json(&lines)
}

fn handle_validate(args: &[String], config: &AppConfig) -> i32 {
    let dir = args
        .get(2)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| config.data_dir.clone());

    match validate_data_dir(&dir) {
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                if diagnostic.severity == ValidationSeverity::Error {
                    eprintln!("- {diagnostic}");
                } else {
                    println!("- {diagnostic}");
                }
            }
            if report.has_errors() {
                eprintln!(
                    "validation failed: {} error(s)",
                    report.count(ValidationSeverity::Error)
                );
                1
            } else {
                println!("validation passed: {}", dir.display());
                0
            }
        }
        Err(err) => {
            eprintln!("unable to load catalog from '{}': {err}", dir.display());
            1
        }
    }
}

fn handle_import(args: &[String], config: &AppConfig) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: bullpen import <characters.csv>");
        return 2;
    };

    let output = config.data_dir.join(DEFAULT_CHARACTERS_FILE);
    match import_characters_csv(path, &output) {
        Ok(report) => {
            for row in &report.skipped {
                eprintln!("skipped row {}: {}", row.record_index, row.reason);
            }
            println!(
                "import complete: records={}, skipped={}, source='{}'",
                report.record_count,
                report.skipped.len(),
                report.source_path
            );
            0
        }
        Err(err) => {
            eprintln!("import failed: {err}");
            1
        }
    }
}

fn print_json(value: &impl Serialize) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}
