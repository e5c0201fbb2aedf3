use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::data::character::{load_characters, Character, DEFAULT_CHARACTERS_FILE};
use crate::data::combo::{load_combo_records, ComboRecord, DEFAULT_COMBOS_FILE};
use crate::data::{resolve_catalog_path, StoreError};
use crate::deck::{ComboEffect, StatKey, ALL_STATS_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.count(ValidationSeverity::Error) > 0
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

pub fn validate_data_dir(dir: impl AsRef<Path>) -> Result<ValidationReport, StoreError> {
    let dir = dir.as_ref();
    let characters = load_characters(resolve_catalog_path(dir, DEFAULT_CHARACTERS_FILE))?;
    let combos = load_combo_records(resolve_catalog_path(dir, DEFAULT_COMBOS_FILE))?;
    Ok(validate_catalog(&characters, &combos))
}

pub fn validate_catalog(characters: &[Character], combos: &[ComboRecord]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut character_ids = HashSet::new();

    for (index, character) in characters.iter().enumerate() {
        let context = format!("characters[{index}] id={}", character.id);
        if !character_ids.insert(character.id) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("duplicate character id {}", character.id),
            );
        }
        if character.name.trim().is_empty() {
            report.push(ValidationSeverity::Error, context.clone(), "missing non-empty 'name'");
        }
        if let Some((key, value)) = character.stats.iter().find(|(_, value)| *value < 0) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("stat '{key}' is negative ({value})"),
            );
        }
        if let Err(err) = character.stats.subtotals() {
            report.push(ValidationSeverity::Error, context, err.to_string());
        }
    }

    let mut combo_ids = HashSet::new();
    for (index, combo) in combos.iter().enumerate() {
        let context = format!("combos[{index}] id={}", combo.id);
        if !combo_ids.insert(combo.id) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("duplicate combo id {}", combo.id),
            );
        }
        if combo.name.trim().is_empty() {
            report.push(ValidationSeverity::Error, context.clone(), "missing non-empty 'name'");
        }
        validate_requirements(&mut report, &context, combo, &character_ids);
        validate_effects(&mut report, &context, combo);
    }

    report
}

fn validate_requirements(
    report: &mut ValidationReport,
    context: &str,
    combo: &ComboRecord,
    character_ids: &HashSet<u32>,
) {
    let context = format!("{context}.required_member_ids");
    if combo.required_member_ids.is_empty() {
        report.push(
            ValidationSeverity::Warning,
            context.clone(),
            "empty requirement set: combo is always active",
        );
    }
    let mut seen = HashSet::new();
    for id in &combo.required_member_ids {
        if !seen.insert(*id) {
            report.push(
                ValidationSeverity::Info,
                context.clone(),
                format!("character {id} listed more than once"),
            );
        }
        if !character_ids.contains(id) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("unknown character {id}"),
            );
        }
    }
}

fn validate_effects(report: &mut ValidationReport, context: &str, combo: &ComboRecord) {
    for (key, value) in &combo.effects {
        let effect_context = format!("{context}.effects.{key}");
        let targets_stats = key == ALL_STATS_KEY || StatKey::parse(key).is_some();
        match ComboEffect::resolve(key, *value) {
            ComboEffect::Display { .. } if targets_stats && value.is_finite() && value.fract() == 0.0 => {
                report.push(
                    ValidationSeverity::Warning,
                    effect_context,
                    format!("value {value} on a stat key is outside the stat range; display-only"),
                )
            }
            ComboEffect::Display { .. } if targets_stats => report.push(
                ValidationSeverity::Warning,
                effect_context,
                format!("non-integral value {value} on a stat key is display-only"),
            ),
            ComboEffect::Display { .. } => report.push(
                ValidationSeverity::Info,
                effect_context,
                "display-only effect, not aggregated",
            ),
            _ => {}
        }
    }
}
