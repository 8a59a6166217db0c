use std::fs;
use std::path::{Path, PathBuf};

use arc_consolidate::{
    pipeline, DocumentSink, Error, GameData, JsonDirSource, JsonFileSink, Settings, SourceKind,
};
use chrono::NaiveDate;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 2).unwrap()
}

fn build_into(input: &Path, output: &Path) -> arc_consolidate::Result<()> {
    let out = pipeline::run(&JsonDirSource::new(input), &Settings::default(), date())?;
    JsonFileSink::new(output).store(&out.data)
}

#[test]
fn build_writes_document() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out/game_data.json");
    build_into(&fixtures(), &output).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.ends_with("}\n"));
    assert!(!dir.path().join("out/game_data.json.tmp").exists());

    let data: GameData = serde_json::from_str(&text).unwrap();
    assert_eq!(data.last_updated, "2025-12-02");
    assert_eq!(data.weapons.len(), 4);
    assert_eq!(data.modifications.len(), 2);
    assert_eq!(data.ammo.len(), 1);
}

#[test]
fn rebuild_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    build_into(&fixtures(), &first).unwrap();
    build_into(&fixtures(), &second).unwrap();
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn rebuild_replaces_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("game_data.json");
    fs::write(&output, "stale").unwrap();
    build_into(&fixtures(), &output).unwrap();
    assert!(fs::read_to_string(&output).unwrap().starts_with('{'));
}

#[test]
fn missing_category_writes_nothing() {
    let input = tempfile::tempdir().unwrap();
    for kind in [SourceKind::Weapons, SourceKind::Equipment, SourceKind::Materials] {
        fs::copy(fixtures().join(kind.file_name()), input.path().join(kind.file_name())).unwrap();
    }
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("game_data.json");

    let err = build_into(input.path(), &output).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingSource { kind: SourceKind::Modifications, .. }
    ));
    assert!(!output.exists());
}

#[test]
fn images_are_optional() {
    let input = tempfile::tempdir().unwrap();
    for kind in SourceKind::ALL {
        fs::copy(fixtures().join(kind.file_name()), input.path().join(kind.file_name())).unwrap();
    }
    let out = pipeline::run(&JsonDirSource::new(input.path()), &Settings::default(), date()).unwrap();
    assert!(out.data.weapons.iter().all(|w| w.image.is_none()));
}
