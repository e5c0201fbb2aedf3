use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_bullpen")
}

fn unique_temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("bullpen-cli-{name}-{stamp}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn seeded_data_dir(name: &str) -> PathBuf {
    let dir = unique_temp_dir(name);
    let seed = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    for file in ["characters.json", "combos.json", "decks.json"] {
        fs::copy(seed.join(file), dir.join(file)).expect("copy seed file");
    }
    dir
}

fn run(data_dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(bin())
        .args(args)
        .env("BULLPEN_DATA_DIR", data_dir)
        .env("RUST_LOG", "warn")
        .output()
        .expect("binary should run")
}

#[test]
fn no_command_prints_usage() {
    let output = Command::new(bin()).output().expect("binary should run");
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage: bullpen"));
}

#[test]
fn evaluate_command_emits_evaluation_json() {
    let dir = seeded_data_dir("evaluate");
    let output = run(&dir, &["evaluate", "1", "2"]);
    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("evaluate should emit json");
    assert_eq!(payload["stats"]["velocity"], 4);
    assert_eq!(payload["totals"]["overall"], 22);
}

#[test]
fn evaluate_command_reports_rejected_member() {
    let dir = seeded_data_dir("evaluate-dup");
    let output = run(&dir, &["evaluate", "1", "1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already in the deck"));
}

#[test]
fn decks_command_lists_saved_decks() {
    let dir = seeded_data_dir("decks");
    let output = run(&dir, &["decks"]);
    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("decks should emit json");
    assert_eq!(payload[0]["name"], "Opening Day");
    assert!(payload[0]["overall"].is_number());
}

#[test]
fn validate_command_passes_on_seed_data() {
    let dir = seeded_data_dir("validate");
    let output = run(&dir, &["validate"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("validation passed"));
}

#[test]
fn validate_command_fails_on_dangling_combo() {
    let dir = seeded_data_dir("validate-bad");
    fs::write(
        dir.join("combos.json"),
        r#"[{"id":1,"name":"Ghost","required_member_ids":[999],"effects":{"power":1}}]"#,
    )
    .expect("write combos");
    let output = run(&dir, &["validate"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown character 999"));
}

#[test]
fn import_command_returns_usage_without_path() {
    let dir = unique_temp_dir("import-usage");
    let output = run(&dir, &["import"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage: bullpen import"));
}

#[test]
fn import_command_writes_character_catalog() {
    let dir = unique_temp_dir("import");
    let csv_path = dir.join("roster.csv");
    fs::write(
        &csv_path,
        "id,name,position,rarity,level,awakening_tier,velocity,control,stamina,breaking,contact,power,speed,arm,fielding\n\
         1,Kaito Mori,pitcher,epic,35,1,3,2,0,0,0,0,0,0,0\n\
         2,Ren Aoki,outfielder,rare,20,0,0,0,0,0,3,0,3,2,0\n",
    )
    .expect("write csv");

    let output = run(&dir, &["import", csv_path.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("records=2"));

    let written = fs::read_to_string(dir.join("characters.json")).expect("catalog written");
    let payload: serde_json::Value = serde_json::from_str(&written).expect("valid json");
    assert_eq!(payload["characters"][1]["batting"]["speed"], 3);
}
