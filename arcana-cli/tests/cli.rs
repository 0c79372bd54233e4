//! End-to-end runs of the `arcana` binary against a temporary database.

use std::path::Path;
use std::process::{Command, Output};

const HANDBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<spellbook name="Player's Handbook">
    <spell level="3" school="evocation">
        <name>Fireball</name>
        <range>150 feet</range>
        <duration>Instantaneous</duration>
        <casting-time>1 action</casting-time>
        <description>A bright streak flashes from your pointing finger.</description>
        <casters><sorcerer/><wizard/></casters>
        <components><verbal/><somatic/><material>bat guano</material></components>
    </spell>
    <spell level="1" school="abjuration" ritual="true">
        <name>Alarm</name>
        <range>30 feet</range>
        <duration>8 hours</duration>
        <casting-time>1 minute</casting-time>
        <description>You set an alarm against unwanted intrusion.</description>
        <casters><ranger/><wizard/></casters>
        <components><verbal/><somatic/></components>
    </spell>
</spellbook>"#;

fn arcana(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_arcana"))
        .arg("--db")
        .arg(db)
        .args(args)
        .env_remove("ARCANA_DB")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn installed() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("books");
    std::fs::create_dir(&source).unwrap();
    std::fs::write(source.join("phb.xml"), HANDBOOK).unwrap();

    let db = dir.path().join("data").join("arcana.db");
    let output = arcana(&db, &["install", source.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(db.exists());
    (dir, db)
}

#[test]
fn install_then_find_by_caster_and_level() {
    let (_dir, db) = installed();

    let output = arcana(&db, &["find", "--caster", "wizard", "--level", "3"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Fireball"));
    assert!(!text.contains("Alarm"));
}

#[test]
fn find_reports_sort_order() {
    let (_dir, db) = installed();

    let output = arcana(&db, &["find", "--caster", "wizard", "--sort", "level:desc"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("2 spell(s) found, sorted by level desc."));
    let fireball = text.find("Fireball").unwrap();
    let alarm = text.find("Alarm").unwrap();
    assert!(fireball < alarm);
}

#[test]
fn find_shows_full_entry() {
    let (_dir, db) = installed();

    let output = arcana(&db, &["find", "--ritual", "yes", "--show", "1"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Alarm"));
    assert!(text.contains("unwanted intrusion"));
}

#[test]
fn invalid_criteria_fail_without_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("missing.db");

    let output = arcana(&db, &["find", "--level", "three"]);
    assert!(!output.status.success());
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("three"), "{err}");
    assert!(!db.exists());
}

#[test]
fn find_without_database_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("missing.db");

    let output = arcana(&db, &["find", "--name", "fire"]);
    assert!(!output.status.success());
    assert!(!db.exists());
}

#[test]
fn info_reports_totals() {
    let (_dir, db) = installed();

    let output = arcana(&db, &["info"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Player's Handbook"));
    assert!(text.contains('2'));
}

#[test]
fn failed_install_keeps_existing_catalog() {
    let (dir, db) = installed();

    // The same book in two files collides on (book, name).
    let twice = dir.path().join("twice");
    std::fs::create_dir(&twice).unwrap();
    std::fs::write(twice.join("a.xml"), HANDBOOK).unwrap();
    std::fs::write(twice.join("b.xml"), HANDBOOK).unwrap();

    let output = arcana(&db, &["install", twice.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Duplicate spell"));

    let output = arcana(&db, &["info"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("There are 2 spells in the database."));
}

#[test]
fn install_with_bad_source_keeps_existing_catalog() {
    let (dir, db) = installed();

    let broken = dir.path().join("broken");
    std::fs::create_dir(&broken).unwrap();
    std::fs::write(broken.join("bad.xml"), "<spellbook name=\"X\"><spell>").unwrap();

    let output = arcana(&db, &["install", broken.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad.xml"));

    let output = arcana(&db, &["find", "--name", "fire"]);
    assert!(stdout(&output).contains("Fireball"));
}

#[test]
fn clean_empties_the_catalog() {
    let (_dir, db) = installed();

    assert!(arcana(&db, &["clean"]).status.success());
    let output = arcana(&db, &["find", "--name", "fire"]);
    assert!(output.status.success());
    assert!(!stdout(&output).contains("Fireball"));
}

#[test]
fn convert_writes_sbk_files() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("books");
    let dest = dir.path().join("out");
    std::fs::create_dir(&source).unwrap();
    std::fs::write(source.join("phb.xml"), HANDBOOK).unwrap();

    let output = arcana(
        &dir.path().join("unused.db"),
        &["convert", source.to_str().unwrap(), dest.to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let sbk = std::fs::read_to_string(dest.join("phb.sbk")).unwrap();
    assert!(sbk.starts_with("book: Player's Handbook\nguild: N\n"));
    assert!(sbk.contains("name: Fireball\n"));
    assert!(sbk.contains("^^^"));
}
